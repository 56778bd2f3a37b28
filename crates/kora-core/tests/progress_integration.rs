//! Integration tests for the progress store over real backends.

use chrono::{Duration, Utc};
use kora_core::{
    Config, CoreError, Database, Event, MemoryStore, NodeStatus, ProgressRecord, ProgressStore,
    SkillCatalog,
};

#[test]
fn test_focus_then_first_node_scenario() {
    let store = ProgressStore::with_defaults(MemoryStore::new());
    let fresh = store.load();
    assert_eq!(fresh.points(), 0);
    assert!(fresh.completed_node_ids().is_empty());
    assert_eq!(fresh.stability_charge(), 100);

    let focused = store.record_focus_completion(&fresh, 25).unwrap();
    assert_eq!(focused.focus_minutes(), 25);
    assert_eq!(focused.points(), 10);

    let first = store.catalog().first().unwrap().id.clone();
    let done = store.complete_node(&focused, &first).unwrap();
    assert_eq!(done.points(), 35);
    assert_eq!(done.completed_node_ids(), &[first.clone()]);
}

#[test]
fn test_roundtrip_through_sqlite_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("kora.db");
    let now = Utc::now();

    let record = {
        let store = ProgressStore::with_defaults(Database::open_at(&path).unwrap());
        let mut record = store.load_at(now);
        for id in ["adhd-1", "adhd-2", "adhd-3"] {
            record = store.complete_node(&record, id).unwrap();
        }
        record = store.adjust_stability(&record, -40);
        record = store
            .set_cycle_anchor(&record, now - Duration::days(30), now)
            .unwrap();
        store.persist(&record).unwrap();
        record
    };

    let store = ProgressStore::with_defaults(Database::open_at(&path).unwrap());
    let loaded = store.load();
    assert_eq!(loaded, record);
    assert_eq!(loaded.cycle_day(), 3);
    assert_eq!(
        store.catalog().next_available(&loaded).map(|n| n.id.as_str()),
        Some("anger-1")
    );
}

#[test]
fn test_surfaces_share_record_through_backend() {
    let backend = MemoryStore::new();
    let dashboard = ProgressStore::with_defaults(&backend);
    let journey = ProgressStore::with_defaults(&backend);
    let now = Utc::now();

    dashboard
        .update(now, |s, r| s.record_focus_completion(r, 25))
        .unwrap();
    let after = journey.update(now, |s, r| s.complete_node(r, "adhd-1")).unwrap();

    assert_eq!(after.focus_minutes(), 25);
    assert_eq!(after.points(), 35);
    assert_eq!(dashboard.load(), after);
}

#[test]
fn test_stale_writer_loses_update() {
    let backend = MemoryStore::new();
    let a = ProgressStore::with_defaults(&backend);
    let b = ProgressStore::with_defaults(&backend);

    let a_view = a.load();
    let b_view = b.load();
    a.persist(&a.award_points(&a_view, 5).unwrap()).unwrap();
    b.persist(&b.award_points(&b_view, 7).unwrap()).unwrap();

    assert_eq!(a.load().points(), 7);
}

#[test]
fn test_custom_policy_and_catalog() {
    let mut config = Config::default();
    config.rewards.focus_completion_bonus = 1;
    config.rewards.node_completion_bonus = 10;
    config.storage.progress_key = "progress_v2".into();

    let backend = MemoryStore::new();
    let store = ProgressStore::new(&backend, SkillCatalog::default(), &config);
    let record = store.record_focus_completion(&store.load(), 50).unwrap();
    let record = store.complete_node(&record, "adhd-1").unwrap();
    store.persist(&record).unwrap();

    assert_eq!(record.points(), 11);
    assert!(kora_core::KeyValueStore::get(&backend, "progress_v2").unwrap().is_some());
    assert!(kora_core::KeyValueStore::get(&backend, "orbital_kora_progress")
        .unwrap()
        .is_none());
}

#[test]
fn test_locked_node_leaves_store_untouched() {
    let store = ProgressStore::with_defaults(MemoryStore::new());
    let now = Utc::now();
    let result = store.update(now, |s, r| s.complete_node(r, "mastery-1"));
    assert!(matches!(result, Err(CoreError::NodeLocked { .. })));
    assert_eq!(store.load(), ProgressRecord::default());
}

#[test]
fn test_statuses_and_events_follow_completion() {
    let store = ProgressStore::with_defaults(MemoryStore::new());
    let before = store.load();
    let after = store.complete_node(&before, "adhd-1").unwrap();

    let statuses: Vec<NodeStatus> = store
        .catalog()
        .statuses(&after)
        .iter()
        .map(|s| s.status)
        .collect();
    assert_eq!(statuses[0], NodeStatus::Completed);
    assert_eq!(statuses[1], NodeStatus::Available);
    assert!(statuses[2..].iter().all(|s| *s == NodeStatus::Locked));

    let events = Event::between(&before, &after, store.catalog(), Utc::now());
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::NodeUnlocked { node_id, .. } if node_id == "adhd-2")));
    assert!((store.catalog().progress_fraction(&after) - 1.0 / 11.0).abs() < 1e-9);
}
