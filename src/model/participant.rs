use std::fmt;

use serde::{Deserialize, Serialize};

/// Someone who can appear on a roster or author a chat message.
///
/// The local user is its own variant so a team member who happens to share
/// the local user's display name is never mistaken for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "name")]
pub enum Participant {
    LocalUser,
    Member(String),
}

impl Participant {
    pub fn member(name: impl Into<String>) -> Self {
        Participant::Member(name.into())
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Participant::LocalUser)
    }

    /// Name to show for this participant, given the local user's display name.
    pub fn display_name<'a>(&'a self, local_name: &'a str) -> &'a str {
        match self {
            Participant::LocalUser => local_name,
            Participant::Member(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::LocalUser => f.write_str("<local user>"),
            Participant::Member(name) => f.write_str(name),
        }
    }
}
