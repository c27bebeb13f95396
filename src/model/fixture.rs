use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::participant::Participant;

/// Spots-left threshold at or below which a fixture is shown as urgent.
pub const NEAR_CAPACITY_SPOTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureId(pub u32);

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

/// A scheduled match with a capacity-bounded roster.
///
/// The roster keeps insertion order and never holds the same participant
/// twice; it only changes through the roster engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: FixtureId,
    pub opponent: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub venue: String,
    pub side: Side,
    pub max_players: usize,
    roster: Vec<Participant>,
}

impl Fixture {
    /// Create a fixture with an empty roster.
    pub fn new(
        id: FixtureId,
        opponent: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        venue: impl Into<String>,
        side: Side,
        max_players: usize,
    ) -> Self {
        Self {
            id,
            opponent: opponent.into(),
            date,
            time,
            venue: venue.into(),
            side,
            max_players,
            roster: Vec::new(),
        }
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub(crate) fn roster_mut(&mut self) -> &mut Vec<Participant> {
        &mut self.roster
    }

    pub fn spots_left(&self) -> usize {
        self.max_players.saturating_sub(self.roster.len())
    }

    pub fn is_full(&self) -> bool {
        self.spots_left() == 0
    }

    pub fn is_near_capacity(&self) -> bool {
        self.spots_left() <= NEAR_CAPACITY_SPOTS
    }

    pub fn is_registered(&self, participant: &Participant) -> bool {
        self.roster.contains(participant)
    }

    /// Kick-off as a local wall-clock instant.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Date as shown to players, e.g. "20 November".
    pub fn day_label(&self) -> String {
        self.date.format("%-d %B").to_string()
    }

    /// Kick-off time as shown to players, e.g. "18:00".
    pub fn time_label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}
