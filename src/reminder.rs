use std::collections::HashSet;
use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use crate::model::{FixtureId, Notification, Participant};
use crate::roster::FixtureStore;

/// How far ahead of kick-off a reminder may fire.
pub const REMINDER_WINDOW_HOURS: i64 = 24;

/// Whether a fixture starting at `starts_at` is inside the (0, 24h] window at `now`.
pub fn in_reminder_window(starts_at: NaiveDateTime, now: NaiveDateTime) -> bool {
    let until = starts_at - now;
    until > TimeDelta::zero() && until <= TimeDelta::hours(REMINDER_WINDOW_HOURS)
}

/// Tracks which fixtures the local user has already been reminded about.
#[derive(Debug, Clone, Default)]
pub struct ReminderLedger {
    reminded: HashSet<FixtureId>,
}

impl ReminderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one reminder pass at local time `now`.
    ///
    /// Returns one reminder for each fixture the local user is registered for
    /// that has just entered the window. A fixture is reminded at most once
    /// until [`ReminderLedger::forget`] re-arms it.
    pub fn check(&mut self, store: &FixtureStore, now: NaiveDateTime) -> Vec<Notification> {
        let local = Participant::LocalUser;
        self.reminded
            .retain(|id| store.get(*id).is_some_and(|f| f.is_registered(&local)));

        let mut due = Vec::new();
        for fixture in store.iter() {
            if !fixture.is_registered(&local) || !in_reminder_window(fixture.starts_at(), now) {
                continue;
            }
            if !self.reminded.insert(fixture.id) {
                debug!(fixture = %fixture.id, "Reminder already sent");
                continue;
            }
            info!(fixture = %fixture.id, opponent = %fixture.opponent, "Reminder due");
            due.push(Notification::reminder(fixture));
        }
        due
    }

    /// Allow a fresh reminder for `id`, e.g. after the local user unregistered.
    pub fn forget(&mut self, id: FixtureId) {
        self.reminded.remove(&id);
    }

    pub fn is_reminded(&self, id: FixtureId) -> bool {
        self.reminded.contains(&id)
    }
}

/// Periodic reminder timer.
///
/// The first check runs inside [`ReminderScheduler::start`]; later checks run
/// on a tokio task every `period`. Stopping or dropping the scheduler aborts
/// the task, so no check runs after that.
#[derive(Debug)]
pub struct ReminderScheduler {
    handle: Option<JoinHandle<()>>,
}

impl ReminderScheduler {
    /// Must be called from within a tokio runtime.
    pub fn start<F>(
        period: Duration,
        mut check: F,
        notifications: mpsc::UnboundedSender<Notification>,
    ) -> Self
    where
        F: FnMut() -> Vec<Notification> + Send + 'static,
    {
        for n in check() {
            if notifications.send(n).is_err() {
                debug!("Notification receiver dropped before the first check");
            }
        }

        // interval_at panics on a zero period.
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                for n in check() {
                    if notifications.send(n).is_err() {
                        debug!("Notification receiver dropped; stopping reminder timer");
                        return;
                    }
                }
            }
        });
        info!(period_secs = period.as_secs(), "Reminder scheduler started");
        Self { handle: Some(handle) }
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Reminder scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
