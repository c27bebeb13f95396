use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::chat::ChatLog;
use crate::config::Config;
use crate::model::{ChatMessage, Fixture, FixtureId, Notification, Participant, ReferenceData};
use crate::reminder::{ReminderLedger, ReminderScheduler};
use crate::roster::{FixtureStore, RosterOutcome};
use crate::seed::Season;

/// Source of the current local wall-clock time.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub fn local_clock() -> Clock {
    Arc::new(|| Local::now().naive_local())
}

/// Everything the intents and the reminder timer mutate. Held under one lock
/// so a reminder check never sees a half-applied intent.
#[derive(Debug, Default)]
struct State {
    fixtures: FixtureStore,
    chat: ChatLog,
    reminders: ReminderLedger,
}

/// A fixture with the values the presentation layer derives its badges and
/// buttons from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureView {
    #[serde(flatten)]
    pub fixture: Fixture,
    pub spots_left: usize,
    pub near_capacity: bool,
    pub is_registered: bool,
    /// Whether the register intent should be offered at all.
    pub can_register: bool,
}

impl FixtureView {
    fn of(fixture: &Fixture) -> Self {
        let is_registered = fixture.is_registered(&Participant::LocalUser);
        Self {
            spots_left: fixture.spots_left(),
            near_capacity: fixture.is_near_capacity(),
            is_registered,
            can_register: !is_registered && !fixture.is_full(),
            fixture: fixture.clone(),
        }
    }
}

/// The owning context for the team's state and its reminder timer.
///
/// All intents are attributed to the local user. Dropping the dashboard stops
/// the reminder timer.
pub struct Dashboard {
    state: Arc<Mutex<State>>,
    reference: ReferenceData,
    local_user_name: String,
    clock: Clock,
    notifications: mpsc::UnboundedSender<Notification>,
    scheduler: ReminderScheduler,
}

impl Dashboard {
    /// Start with the local clock. Must be called within a tokio runtime.
    pub fn start(config: &Config, season: Season) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        Self::start_with_clock(config, season, local_clock())
    }

    /// Start with a custom clock. The first reminder check runs before this returns.
    pub fn start_with_clock(
        config: &Config,
        season: Season,
        clock: Clock,
    ) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(State {
            fixtures: season.fixtures,
            chat: season.chat,
            reminders: ReminderLedger::new(),
        }));

        let scheduler = {
            let state = Arc::clone(&state);
            let clock = Arc::clone(&clock);
            ReminderScheduler::start(
                config.reminder_period,
                move || {
                    let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
                    let State { fixtures, reminders, .. } = &mut *guard;
                    reminders.check(fixtures, clock())
                },
                tx.clone(),
            )
        };

        info!(local_user = %config.local_user_name, "Dashboard started");
        let dashboard = Self {
            state,
            reference: season.reference,
            local_user_name: config.local_user_name.clone(),
            clock,
            notifications: tx,
            scheduler,
        };
        (dashboard, rx)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            warn!("Notification receiver dropped");
        }
    }

    /// Put the local user on a fixture's roster. A full fixture is rejected
    /// here without reaching the roster engine.
    #[instrument(skip(self), fields(fixture = %id))]
    pub fn register_for_fixture(&self, id: FixtureId) -> RosterOutcome {
        let mut state = self.lock();
        let full = state
            .fixtures
            .get(id)
            .is_some_and(|f| f.is_full() && !f.is_registered(&Participant::LocalUser));
        if full {
            warn!("Register intent rejected: fixture is full");
            return RosterOutcome::Full;
        }

        let outcome = state.fixtures.register(id, &Participant::LocalUser);
        if let Some(n) = outcome.notification() {
            self.publish(n.clone());
            // A registration inside the window is reminded now, not at the next tick.
            let State { fixtures, reminders, .. } = &mut *state;
            for reminder in reminders.check(fixtures, (self.clock)()) {
                self.publish(reminder);
            }
        }
        outcome
    }

    /// Take the local user off a fixture's roster and re-arm its reminder.
    #[instrument(skip(self), fields(fixture = %id))]
    pub fn unregister_from_fixture(&self, id: FixtureId) -> RosterOutcome {
        let mut state = self.lock();
        let outcome = state.fixtures.unregister(id, &Participant::LocalUser);
        if let Some(n) = outcome.notification() {
            state.reminders.forget(id);
            self.publish(n.clone());
        }
        outcome
    }

    /// Post to the team chat as the local user. Whitespace-only text is ignored.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub fn send_chat_message(&self, text: &str) -> Option<ChatMessage> {
        let at = (self.clock)().time();
        self.lock().chat.send(Participant::LocalUser, text, at).cloned()
    }

    pub fn fixtures(&self) -> Vec<FixtureView> {
        self.lock().fixtures.iter().map(FixtureView::of).collect()
    }

    pub fn fixture(&self, id: FixtureId) -> Option<FixtureView> {
        self.lock().fixtures.get(id).map(FixtureView::of)
    }

    pub fn chat(&self) -> Vec<ChatMessage> {
        self.lock().chat.messages().to_vec()
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn local_user_name(&self) -> &str {
        &self.local_user_name
    }

    pub fn reminders_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Stop the reminder timer. Intents keep working.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
    }
}
