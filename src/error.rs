use std::path::PathBuf;

use crate::model::FixtureId;

/// Invalid or missing environment configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    NotPositive { name: &'static str, value: String },
}

/// Failure while loading fixtures, chat history or reference data.
#[derive(thiserror::Error, Debug)]
pub enum SeedError {
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid season JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid date or time in fixture {id}: {source}")]
    DateTime { id: FixtureId, source: chrono::ParseError },

    #[error("fixture {id} has {roster} players seeded but only {max_players} places")]
    OverCapacity { id: FixtureId, roster: usize, max_players: usize },

    #[error("fixture id {id} appears more than once")]
    DuplicateId { id: FixtureId },

    #[error("invalid iCalendar data: {0}")]
    Ical(String),

    #[error("invalid DTSTART in calendar event: {0:?}")]
    EventStart(String),
}

/// Failure while forwarding a notification to a webhook.
#[derive(thiserror::Error, Debug)]
pub enum WebhookError {
    #[error("failed to post to webhook: {0}")]
    Request(#[from] ureq::Error),
}
