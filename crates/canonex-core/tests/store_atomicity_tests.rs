//! Store Atomicity Tests
//!
//! ## Scenarios Covered
//!
//! 1. A failing repository leaves the published snapshot untouched
//! 2. A failing notification sink does not undo the commit
//! 3. Every committed change set reaches the repository
//! 4. Readers holding an old snapshot keep a consistent view

mod common;

use std::sync::{Arc, Mutex};

use canonex_core::{
    CanonError, ChangeSet, DisplacementEvent, EngineConfig, ExError, ExErrorKind,
    ExampleRepository, ExampleStore, GroupingKey, NoopSink, NotificationSink, NullRepository,
};
use common::intent_example;

/// Records change sets; fails once `fail` is set
#[derive(Default)]
struct RecordingRepository {
    commits: Mutex<Vec<ChangeSet>>,
    fail: Mutex<bool>,
}

impl RecordingRepository {
    fn fail_from_now(&self) {
        *self.fail.lock().unwrap() = true;
    }

    fn commits(&self) -> Vec<ChangeSet> {
        self.commits.lock().unwrap().clone()
    }
}

impl ExampleRepository for RecordingRepository {
    fn commit(&self, changes: &ChangeSet) -> Result<(), ExError> {
        if *self.fail.lock().unwrap() {
            return Err(ExError::new(ExErrorKind::Persistence).with_message("disk unavailable"));
        }
        self.commits.lock().unwrap().push(changes.clone());
        Ok(())
    }
}

struct FailingSink;

impl NotificationSink for FailingSink {
    fn notify(&self, _event: &DisplacementEvent) -> Result<(), ExError> {
        Err(ExError::new(ExErrorKind::Io).with_message("socket closed"))
    }
}

#[test]
fn test_repository_failure_keeps_previous_state() {
    // GIVEN A canonical for "greet" and B not canonical
    let repo = Arc::new(RecordingRepository::default());
    let store = ExampleStore::new(EngineConfig::default(), repo.clone(), Arc::new(NoopSink));
    let ids = store
        .bulk_insert(vec![
            intent_example("hello", "greet"),
            intent_example("welcome", "greet"),
        ])
        .unwrap();
    store.set_canonical(&ids[0], true).unwrap();

    // WHEN the repository starts failing and B is marked
    repo.fail_from_now();
    let result = store.set_canonical(&ids[1], true);

    // THEN the write fails and A is still the holder
    assert!(matches!(result, Err(CanonError::Persistence { .. })));
    assert!(store.get(&ids[0]).unwrap().canonical);
    assert!(!store.get(&ids[1]).unwrap().canonical);
    assert_eq!(
        store.canonical_holders().unwrap(),
        vec![(GroupingKey::intent("greet"), ids[0].clone())]
    );
}

#[test]
fn test_sink_failure_does_not_roll_back() {
    // GIVEN a store whose sink always fails
    let store = ExampleStore::new(
        EngineConfig::default(),
        Arc::new(NullRepository),
        Arc::new(FailingSink),
    );
    let ids = store
        .bulk_insert(vec![
            intent_example("hello", "greet"),
            intent_example("welcome", "greet"),
        ])
        .unwrap();
    store.set_canonical(&ids[0], true).unwrap();

    // WHEN a displacement happens
    let events = store.set_canonical(&ids[1], true).unwrap();

    // THEN the write stands
    assert_eq!(events.len(), 1);
    assert!(store.get(&ids[1]).unwrap().canonical);
    assert!(!store.get(&ids[0]).unwrap().canonical);
}

#[test]
fn test_change_sets_describe_each_write() {
    let repo = Arc::new(RecordingRepository::default());
    let store = ExampleStore::new(EngineConfig::default(), repo.clone(), Arc::new(NoopSink));

    let a = store.insert(intent_example("hello", "greet")).unwrap();
    let b = store.insert(intent_example("welcome", "greet")).unwrap();
    store.set_canonical(&a, true).unwrap();
    store.set_canonical(&b, true).unwrap();
    store.delete(&a).unwrap();

    let commits = repo.commits();
    assert_eq!(commits.len(), 5);
    assert_eq!(commits[3].claimed, vec![(GroupingKey::intent("greet"), b.clone())]);
    let flipped: Vec<_> = commits[3].upserted.iter().map(|e| e.id.clone()).collect();
    assert_eq!(flipped, vec![b, a.clone()]);
    assert_eq!(commits[4].deleted, vec![a]);
}

#[test]
fn test_noop_writes_are_not_committed() {
    let repo = Arc::new(RecordingRepository::default());
    let store = ExampleStore::new(EngineConfig::default(), repo.clone(), Arc::new(NoopSink));
    let a = store.insert(intent_example("hello", "greet")).unwrap();
    store.set_canonical(&a, true).unwrap();

    store.set_canonical(&a, true).unwrap();

    assert_eq!(repo.commits().len(), 2);
}

#[test]
fn test_old_snapshot_stays_consistent() {
    // GIVEN a snapshot taken while A held "greet"
    let store = ExampleStore::in_memory();
    let a = store.insert(intent_example("hello", "greet")).unwrap();
    let b = store.insert(intent_example("welcome", "greet")).unwrap();
    store.set_canonical(&a, true).unwrap();
    let before = store.snapshot().unwrap();

    // WHEN B takes the key
    store.set_canonical(&b, true).unwrap();

    // THEN the old snapshot still shows A as holder and flag owner
    assert_eq!(before.index().holder(&GroupingKey::intent("greet")), Some(a.as_str()));
    assert!(before.get(&a).unwrap().canonical);
    assert!(!before.get(&b).unwrap().canonical);
    canonex_core::rules::invariants::verify(&before).unwrap();
}
