use chrono::{NaiveDate, NaiveTime};

use team_dashboard::model::{Fixture, FixtureId, NotificationKind, Participant, Side};
use team_dashboard::roster::{FixtureStore, RosterOutcome};

fn fixture(id: u32, opponent: &str, max_players: usize) -> Fixture {
    Fixture::new(
        FixtureId(id),
        opponent,
        NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
        NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        "Luch Stadium",
        Side::Home,
        max_players,
    )
}

fn names(store: &FixtureStore, id: u32) -> Vec<String> {
    store
        .get(FixtureId(id))
        .unwrap()
        .roster()
        .iter()
        .map(|p| p.display_name("You").to_string())
        .collect()
}

#[test]
fn fills_roster_in_order_until_capacity() {
    let mut store: FixtureStore = [fixture(1, "Rivals", 2)].into_iter().collect();
    let id = FixtureId(1);

    assert!(store.register(id, &Participant::member("A")).is_changed());
    assert_eq!(names(&store, 1), ["A"]);
    assert_eq!(store.get(id).unwrap().spots_left(), 1);

    assert!(store.register(id, &Participant::member("B")).is_changed());
    assert_eq!(names(&store, 1), ["A", "B"]);
    assert_eq!(store.get(id).unwrap().spots_left(), 0);
    assert!(store.get(id).unwrap().is_full());

    assert_eq!(store.register(id, &Participant::member("C")), RosterOutcome::Full);
    assert_eq!(names(&store, 1), ["A", "B"]);
}

#[test]
fn full_squad_of_eleven_refuses_twelfth_without_notification() {
    let mut store: FixtureStore = [fixture(1, "Spartak", 11)].into_iter().collect();
    for i in 0..11 {
        store.register(FixtureId(1), &Participant::member(format!("Player {i}")));
    }
    let before = names(&store, 1);

    let outcome = store.register(FixtureId(1), &Participant::LocalUser);
    assert_eq!(outcome, RosterOutcome::Full);
    assert!(outcome.notification().is_none());
    assert_eq!(names(&store, 1), before);
    assert_eq!(store.get(FixtureId(1)).unwrap().roster().len(), 11);
}

#[test]
fn registering_twice_is_idempotent() {
    let mut store: FixtureStore = [fixture(1, "Dynamo", 11)].into_iter().collect();
    let first = store.register(FixtureId(1), &Participant::LocalUser);
    let second = store.register(FixtureId(1), &Participant::LocalUser);

    assert!(first.is_changed());
    assert_eq!(second, RosterOutcome::AlreadyRegistered);
    assert!(second.notification().is_none());
    assert_eq!(store.get(FixtureId(1)).unwrap().roster(), [Participant::LocalUser]);
}

#[test]
fn unregister_keeps_order_and_ignores_absent_players() {
    let mut store: FixtureStore = [fixture(1, "Zenit", 11)].into_iter().collect();
    for name in ["Anna", "Maria", "Elena"] {
        store.register(FixtureId(1), &Participant::member(name));
    }

    let outcome = store.unregister(FixtureId(1), &Participant::member("Maria"));
    assert!(outcome.is_changed());
    assert_eq!(names(&store, 1), ["Anna", "Elena"]);

    assert_eq!(store.unregister(FixtureId(1), &Participant::member("Maria")), RosterOutcome::NotRegistered);
    assert_eq!(names(&store, 1), ["Anna", "Elena"]);
}

#[test]
fn unknown_fixture_is_a_no_op() {
    let mut store: FixtureStore = [fixture(1, "Zenit", 11)].into_iter().collect();
    assert_eq!(store.register(FixtureId(99), &Participant::LocalUser), RosterOutcome::UnknownFixture);
    assert_eq!(store.unregister(FixtureId(99), &Participant::LocalUser), RosterOutcome::UnknownFixture);
    assert!(store.get(FixtureId(1)).unwrap().roster().is_empty());
}

#[test]
fn local_user_is_distinct_from_member_with_same_name() {
    let mut store: FixtureStore = [fixture(1, "Lokomotiv", 11)].into_iter().collect();
    store.register(FixtureId(1), &Participant::member("You"));

    let f = store.get(FixtureId(1)).unwrap();
    assert!(!f.is_registered(&Participant::LocalUser));
    assert!(store.register(FixtureId(1), &Participant::LocalUser).is_changed());
    assert_eq!(store.get(FixtureId(1)).unwrap().roster().len(), 2);
}

#[test]
fn notifications_describe_the_change() {
    let mut store: FixtureStore = [fixture(1, "Spartak", 11)].into_iter().collect();

    let joined = store.register(FixtureId(1), &Participant::LocalUser).into_notification().unwrap();
    assert_eq!(joined.kind, NotificationKind::Success);
    assert_eq!(joined.description, "Spartak, 20 November at 18:00");
    assert_eq!(joined.fixture, Some(FixtureId(1)));

    let left = store.unregister(FixtureId(1), &Participant::LocalUser).into_notification().unwrap();
    assert_eq!(left.kind, NotificationKind::Destructive);
    assert!(left.description.contains("Spartak"), "description was: {}", left.description);
}

#[test]
fn spots_left_never_negative_and_near_capacity_threshold() {
    let mut store: FixtureStore = [fixture(1, "CSKA", 4)].into_iter().collect();
    let f = store.get(FixtureId(1)).unwrap();
    assert_eq!(f.spots_left(), 4);
    assert!(!f.is_near_capacity());

    for name in ["A", "B", "C", "D", "E", "F"] {
        store.register(FixtureId(1), &Participant::member(name));
        let f = store.get(FixtureId(1)).unwrap();
        assert!(f.roster().len() <= f.max_players);
        assert_eq!(f.spots_left(), f.max_players - f.roster().len());
    }
    let f = store.get(FixtureId(1)).unwrap();
    assert_eq!(f.spots_left(), 0);
    assert!(f.is_near_capacity());
}

#[test]
fn insert_replaces_fixture_with_same_id() {
    let mut store = FixtureStore::new();
    assert!(store.insert(fixture(1, "Old", 11)).is_none());
    let replaced = store.insert(fixture(1, "New", 11)).expect("previous fixture returned");
    assert_eq!(replaced.opponent, "Old");
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(FixtureId(1)).unwrap().opponent, "New");
}

#[test]
fn near_capacity_starts_at_two_spots_left() {
    let mut store: FixtureStore = [fixture(1, "Lokomotiv", 5)].into_iter().collect();
    for name in ["A", "B"] {
        store.register(FixtureId(1), &Participant::member(name));
    }
    let f = store.get(FixtureId(1)).unwrap();
    assert_eq!(f.spots_left(), 3);
    assert!(!f.is_near_capacity());

    store.register(FixtureId(1), &Participant::member("C"));
    let f = store.get(FixtureId(1)).unwrap();
    assert_eq!(f.spots_left(), 2);
    assert!(f.is_near_capacity());
    assert!(!f.is_full());
}
