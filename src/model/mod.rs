pub mod chat_message;
pub mod fixture;
pub mod notification;
pub mod participant;
pub mod reference;

pub use chat_message::ChatMessage;
pub use fixture::{Fixture, FixtureId, Side};
pub use notification::{Notification, NotificationKind};
pub use participant::Participant;
pub use reference::{PlayerStats, ReferenceData, StandingsRow};
