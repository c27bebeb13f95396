use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::fixture::{Fixture, FixtureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Destructive,
}

/// A user-facing event for the presentation layer to show and dismiss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
    /// Suggested time on screen.
    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
    pub fixture: Option<FixtureId>,
}

impl Notification {
    pub fn registered(fixture: &Fixture) -> Self {
        Self {
            title: "Registered for the match".to_string(),
            description: format!(
                "{}, {} at {}",
                fixture.opponent,
                fixture.day_label(),
                fixture.time_label()
            ),
            kind: NotificationKind::Success,
            duration: Duration::from_millis(4000),
            fixture: Some(fixture.id),
        }
    }

    pub fn unregistered(fixture: &Fixture) -> Self {
        Self {
            title: "Registration cancelled".to_string(),
            description: format!(
                "You are no longer registered for the match against {}",
                fixture.opponent
            ),
            kind: NotificationKind::Destructive,
            duration: Duration::from_millis(3000),
            fixture: Some(fixture.id),
        }
    }

    pub fn reminder(fixture: &Fixture) -> Self {
        Self {
            title: "Match reminder".to_string(),
            description: format!(
                "Match against {} at {}. {}",
                fixture.opponent,
                fixture.time_label(),
                fixture.venue
            ),
            kind: NotificationKind::Info,
            duration: Duration::from_millis(6000),
            fixture: Some(fixture.id),
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
