use tracing::{debug, info};

use crate::model::{Fixture, FixtureId, Notification, Participant};

/// Result of a roster operation.
///
/// Only `Changed` mutates the store, and it is the only variant that carries
/// a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterOutcome {
    Changed(Notification),
    AlreadyRegistered,
    NotRegistered,
    Full,
    UnknownFixture,
}

impl RosterOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, RosterOutcome::Changed(_))
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            RosterOutcome::Changed(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_notification(self) -> Option<Notification> {
        match self {
            RosterOutcome::Changed(n) => Some(n),
            _ => None,
        }
    }
}

/// In-memory fixtures in seed order.
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    fixtures: Vec<Fixture>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fixture, replacing and returning any fixture with the same id.
    pub fn insert(&mut self, fixture: Fixture) -> Option<Fixture> {
        match self.fixtures.iter_mut().find(|f| f.id == fixture.id) {
            Some(existing) => Some(std::mem::replace(existing, fixture)),
            None => {
                self.fixtures.push(fixture);
                None
            }
        }
    }

    pub fn get(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures.iter()
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Append `participant` to the fixture's roster if there is room and they
    /// are not already on it. Unknown ids, duplicates and full rosters are
    /// no-ops.
    pub fn register(&mut self, id: FixtureId, participant: &Participant) -> RosterOutcome {
        let Some(fixture) = self.fixtures.iter_mut().find(|f| f.id == id) else {
            debug!(fixture = %id, "register: unknown fixture");
            return RosterOutcome::UnknownFixture;
        };
        if fixture.is_registered(participant) {
            debug!(fixture = %id, player = %participant, "register: already on roster");
            return RosterOutcome::AlreadyRegistered;
        }
        if fixture.is_full() {
            debug!(fixture = %id, player = %participant, "register: roster full");
            return RosterOutcome::Full;
        }

        fixture.roster_mut().push(participant.clone());
        info!(
            fixture = %id,
            player = %participant,
            spots_left = fixture.spots_left(),
            "Player registered"
        );
        RosterOutcome::Changed(Notification::registered(fixture))
    }

    /// Remove `participant` from the fixture's roster, keeping everyone else
    /// in order. Unknown ids and absent players are no-ops.
    pub fn unregister(&mut self, id: FixtureId, participant: &Participant) -> RosterOutcome {
        let Some(fixture) = self.fixtures.iter_mut().find(|f| f.id == id) else {
            debug!(fixture = %id, "unregister: unknown fixture");
            return RosterOutcome::UnknownFixture;
        };
        let Some(pos) = fixture.roster().iter().position(|p| p == participant) else {
            debug!(fixture = %id, player = %participant, "unregister: not on roster");
            return RosterOutcome::NotRegistered;
        };

        fixture.roster_mut().remove(pos);
        info!(
            fixture = %id,
            player = %participant,
            spots_left = fixture.spots_left(),
            "Player unregistered"
        );
        RosterOutcome::Changed(Notification::unregistered(fixture))
    }
}

impl FromIterator<Fixture> for FixtureStore {
    fn from_iter<I: IntoIterator<Item = Fixture>>(iter: I) -> Self {
        let mut store = FixtureStore::new();
        for fixture in iter {
            store.insert(fixture);
        }
        store
    }
}
