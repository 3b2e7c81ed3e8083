//! Edit Guard Tests
//!
//! Canonical examples reject structural edits and deletion until unmarked.

mod common;

use canonex_core::view::{DELETE_BLOCKED_TOOLTIP, EDIT_BLOCKED_TOOLTIP};
use canonex_core::{CanonError, EditKind, ExError, ExErrorKind, ExamplePatch};
use common::{insert, intent_example, store_with_sink};

#[test]
fn test_update_and_delete_rejected_while_canonical() {
    // GIVEN E1 canonical for intent "x"
    let (store, _sink) = store_with_sink();
    let e1 = insert(&store, intent_example("old", "x"));
    store.set_canonical(&e1, true).unwrap();

    // WHEN its text is edited
    let update = store.update(&e1, ExamplePatch::new().text("new"));

    // THEN the edit is rejected with the attempted kind
    match update {
        Err(CanonError::EditRejected { example_id, kind }) => {
            assert_eq!(example_id, e1);
            assert_eq!(kind, EditKind::StructuralEdit);
        }
        other => panic!("expected EditRejected, got {:?}", other),
    }

    // AND deletion is rejected too
    match store.delete(&e1) {
        Err(CanonError::EditRejected { kind, .. }) => assert_eq!(kind, EditKind::Delete),
        other => panic!("expected EditRejected, got {:?}", other),
    }

    // AND nothing changed
    let example = store.get(&e1).unwrap();
    assert_eq!(example.text, "old");
    assert!(example.canonical);
}

#[test]
fn test_edit_allowed_after_unmark() {
    // GIVEN a canonical example that is then unmarked
    let (store, _sink) = store_with_sink();
    let id = insert(&store, intent_example("old", "x"));
    store.set_canonical(&id, true).unwrap();
    store.set_canonical(&id, false).unwrap();

    // WHEN it is edited and deleted
    let updated = store
        .update(&id, ExamplePatch::new().text("new").intent(Some("y".to_string())))
        .unwrap();
    assert_eq!(updated.text, "new");
    assert_eq!(updated.intent.as_deref(), Some("y"));
    store.delete(&id).unwrap();

    // THEN it is gone
    assert!(matches!(
        store.get(&id),
        Err(CanonError::ExampleNotFound { .. })
    ));
}

#[test]
fn test_displaced_example_becomes_editable() {
    // GIVEN B displaced by A
    let (store, _sink) = store_with_sink();
    let b = insert(&store, intent_example("first", "greet"));
    let a = insert(&store, intent_example("second", "greet"));
    store.set_canonical(&b, true).unwrap();
    store.set_canonical(&a, true).unwrap();

    // THEN B can be deleted, A cannot
    assert!(store.view(&b).unwrap().can_delete);
    store.delete(&b).unwrap();
    assert!(store.delete(&a).is_err());
}

#[test]
fn test_rejection_maps_to_stable_error_code() {
    let (store, _sink) = store_with_sink();
    let id = insert(&store, intent_example("hello", "greet"));
    store.set_canonical(&id, true).unwrap();

    let err: ExError = store.delete(&id).unwrap_err().into();

    assert_eq!(err.kind(), ExErrorKind::EditRejected);
    assert_eq!(err.code(), "ERR_EDIT_REJECTED");
    assert_eq!(err.entity_id(), Some(id.as_str()));
    assert!(!err.kind().is_retryable());
}

#[test]
fn test_view_exposes_disabled_affordances() {
    let (store, _sink) = store_with_sink();
    let id = insert(&store, intent_example("hello", "intenttest"));
    store.set_canonical(&id, true).unwrap();

    let view = store.view(&id).unwrap();

    assert!(!view.can_edit);
    assert!(!view.can_delete);
    assert_eq!(view.edit_tooltip.as_deref(), Some(EDIT_BLOCKED_TOOLTIP));
    assert_eq!(view.delete_tooltip.as_deref(), Some(DELETE_BLOCKED_TOOLTIP));
    assert_eq!(
        view.canonical_tooltip.as_deref(),
        Some("This example is canonical for the intent intenttest")
    );
}

#[test]
fn test_invalid_patch_rejected_on_plain_example() {
    let (store, _sink) = store_with_sink();
    let id = insert(&store, intent_example("hello", "greet"));

    let result = store.update(&id, ExamplePatch::new().text("   "));

    assert!(matches!(result, Err(CanonError::InvalidInput { .. })));
    assert_eq!(store.get(&id).unwrap().text, "hello");
}
