use serde::{Deserialize, Serialize};

use crate::model::participant::Participant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub author: Participant,
    pub text: String,
    /// Local "HH:MM" at the moment the message was sent.
    pub time: String,
}

impl ChatMessage {
    pub fn is_from_local_user(&self) -> bool {
        self.author.is_local()
    }
}
