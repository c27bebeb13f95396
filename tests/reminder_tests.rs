use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tokio::sync::mpsc;

use team_dashboard::model::{Fixture, FixtureId, Notification, NotificationKind, Participant, Side};
use team_dashboard::reminder::{ReminderLedger, ReminderScheduler, in_reminder_window};
use team_dashboard::roster::FixtureStore;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 19).unwrap().and_hms_opt(22, 0, 0).unwrap()
}

fn fixture_at(id: u32, opponent: &str, start: NaiveDateTime) -> Fixture {
    Fixture::new(FixtureId(id), opponent, start.date(), start.time(), "Luch Stadium", Side::Home, 11)
}

fn store_with_local_user(hours_ahead: i64) -> FixtureStore {
    let mut store: FixtureStore = [fixture_at(1, "Spartak", now() + TimeDelta::hours(hours_ahead))]
        .into_iter()
        .collect();
    store.register(FixtureId(1), &Participant::LocalUser);
    store
}

#[test]
fn window_is_open_above_zero_and_closed_at_twenty_four_hours() {
    let start = now();
    assert!(!in_reminder_window(start, now()));
    assert!(in_reminder_window(start, now() - TimeDelta::minutes(1)));
    assert!(in_reminder_window(start, now() - TimeDelta::hours(24)));
    assert!(!in_reminder_window(start, now() - TimeDelta::hours(24) - TimeDelta::seconds(1)));
    assert!(!in_reminder_window(start, now() + TimeDelta::hours(1)));
}

#[test]
fn reminds_exactly_once_while_inside_window() {
    let store = store_with_local_user(20);
    let mut ledger = ReminderLedger::new();

    let first = ledger.check(&store, now());
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].kind, NotificationKind::Info);
    assert_eq!(first[0].description, "Match against Spartak at 18:00. Luch Stadium");

    let second = ledger.check(&store, now() + TimeDelta::hours(1));
    assert!(second.is_empty(), "got {:?}", second);
    assert!(ledger.is_reminded(FixtureId(1)));
}

#[test]
fn ignores_fixtures_outside_window_or_without_local_user() {
    let mut ledger = ReminderLedger::new();
    assert!(ledger.check(&store_with_local_user(30), now()).is_empty());
    assert!(ledger.check(&store_with_local_user(-2), now()).is_empty());

    let mut store: FixtureStore = [fixture_at(1, "Dynamo", now() + TimeDelta::hours(5))].into_iter().collect();
    store.register(FixtureId(1), &Participant::member("Anna"));
    assert!(ledger.check(&store, now()).is_empty());
}

#[test]
fn fixture_entering_window_later_is_reminded_then() {
    let store = store_with_local_user(30);
    let mut ledger = ReminderLedger::new();
    assert!(ledger.check(&store, now()).is_empty());
    assert_eq!(ledger.check(&store, now() + TimeDelta::hours(7)).len(), 1);
}

#[test]
fn re_registering_re_arms_the_reminder() {
    let mut store = store_with_local_user(20);
    let mut ledger = ReminderLedger::new();
    assert_eq!(ledger.check(&store, now()).len(), 1);
    assert!(ledger.check(&store, now()).is_empty());

    store.unregister(FixtureId(1), &Participant::LocalUser);
    ledger.forget(FixtureId(1));
    store.register(FixtureId(1), &Participant::LocalUser);

    assert_eq!(ledger.check(&store, now()).len(), 1);
    assert!(ledger.check(&store, now()).is_empty());
}

#[test]
fn unregistration_seen_by_a_check_also_re_arms() {
    let mut store = store_with_local_user(20);
    let mut ledger = ReminderLedger::new();
    assert_eq!(ledger.check(&store, now()).len(), 1);

    store.unregister(FixtureId(1), &Participant::LocalUser);
    assert!(ledger.check(&store, now()).is_empty());
    assert!(!ledger.is_reminded(FixtureId(1)));

    store.register(FixtureId(1), &Participant::LocalUser);
    assert_eq!(ledger.check(&store, now()).len(), 1);
}

fn start_scheduler(
    store: FixtureStore,
    period: Duration,
) -> (ReminderScheduler, mpsc::UnboundedReceiver<Notification>, Arc<Mutex<usize>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let checks = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&checks);
    let mut ledger = ReminderLedger::new();
    let scheduler = ReminderScheduler::start(
        period,
        move || {
            *counter.lock().unwrap() += 1;
            ledger.check(&store, now())
        },
        tx,
    );
    (scheduler, rx, checks)
}

#[tokio::test(start_paused = true)]
async fn first_check_runs_on_start_then_every_period() {
    let period = Duration::from_secs(3600);
    let (scheduler, mut rx, checks) = start_scheduler(store_with_local_user(20), period);

    assert_eq!(*checks.lock().unwrap(), 1);
    let reminder = rx.try_recv().expect("reminder from the initial check");
    assert_eq!(reminder.fixture, Some(FixtureId(1)));

    tokio::time::sleep(period * 3 + Duration::from_secs(1)).await;
    assert_eq!(*checks.lock().unwrap(), 4);
    assert!(rx.try_recv().is_err(), "no repeated reminder expected");
    assert!(scheduler.is_running());
}

#[tokio::test(start_paused = true)]
async fn stopping_cancels_further_checks() {
    let period = Duration::from_secs(60);
    let (mut scheduler, mut rx, checks) = start_scheduler(store_with_local_user(20), period);
    assert!(rx.recv().await.is_some());

    scheduler.stop();
    assert!(!scheduler.is_running());
    tokio::time::sleep(period * 5).await;
    assert_eq!(*checks.lock().unwrap(), 1);
    // The aborted task has dropped its sender.
    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn dropping_scheduler_closes_notification_stream() {
    let (scheduler, mut rx, checks) = start_scheduler(store_with_local_user(40), Duration::from_secs(60));
    assert!(rx.try_recv().is_err());

    drop(scheduler);
    assert!(rx.recv().await.is_none());
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(*checks.lock().unwrap(), 1);
}
