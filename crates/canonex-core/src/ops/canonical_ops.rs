//! Canonical toggle
//!
//! `set_canonical` is the only operation that writes the canonical index.
//! It resolves every precondition before the first mutation, so an error
//! leaves the corpus exactly as it was.

use chrono::Utc;

use super::corpus::Corpus;
use crate::errors::{CanonError, Result};
use crate::model::{DisplacementEvent, GroupingKey};

/// What a single `set_canonical` call changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalChange {
    /// One event per key taken from a previous holder, in key resolution order
    pub events: Vec<DisplacementEvent>,
    /// Keys newly mapped to the target (already-held keys are not repeated)
    pub claimed: Vec<GroupingKey>,
    /// Keys whose mapping was removed (unmark only)
    pub released: Vec<GroupingKey>,
    /// Examples whose `canonical` flag changed, target first
    pub flipped: Vec<String>,
}

impl CanonicalChange {
    pub fn is_noop(&self) -> bool {
        self.claimed.is_empty() && self.released.is_empty() && self.flipped.is_empty()
    }
}

/// Mark or unmark an example as canonical for all of its grouping keys
///
/// Marking claims every key of the example. A previous holder of a claimed
/// key loses that key only; it stays canonical while it still holds another
/// key. Unmarking releases every key the example holds and never displaces.
///
/// Re-marking an example that already holds all its keys changes nothing
/// and reports no displacement.
///
/// # Errors
/// * `ExampleNotFound` - unknown id
/// * `InvalidInput` - marking an example that has no grouping key
/// * `InvariantViolation` - the index names a holder that does not exist
pub fn set_canonical(corpus: &mut Corpus, id: &str, on: bool) -> Result<CanonicalChange> {
    let keys = corpus.grouping_keys(id)?;
    if on {
        mark(corpus, id, keys)
    } else {
        Ok(unmark(corpus, id, &keys))
    }
}

fn unmark(corpus: &mut Corpus, id: &str, keys: &[GroupingKey]) -> CanonicalChange {
    let mut change = CanonicalChange::default();

    for key in keys {
        if corpus.index.release_if_held_by(key, id) {
            change.released.push(key.clone());
        }
    }

    if let Some(example) = corpus.examples.get_mut(id) {
        if example.canonical {
            example.canonical = false;
            example.updated_at = Utc::now();
            change.flipped.push(id.to_string());
        }
    }

    change
}

fn mark(corpus: &mut Corpus, id: &str, keys: Vec<GroupingKey>) -> Result<CanonicalChange> {
    if keys.is_empty() {
        return Err(CanonError::invalid(format!(
            "Example {} has no intent or entities to be canonical for",
            id
        )));
    }

    // Resolve phase: no mutation until every previous holder is known to exist
    let mut to_claim = Vec::new();
    let mut events = Vec::new();
    let mut displaced: Vec<String> = Vec::new();
    for key in keys {
        match corpus.index.holder(&key) {
            Some(holder) if holder == id => {}
            Some(holder) => {
                if !corpus.contains(holder) {
                    return Err(CanonError::InvariantViolation {
                        key: key.to_string(),
                        reason: format!("holder {} does not exist", holder),
                    });
                }
                let holder = holder.to_string();
                events.push(DisplacementEvent::new(
                    holder.clone(),
                    id.to_string(),
                    key.clone(),
                ));
                if !displaced.contains(&holder) {
                    displaced.push(holder);
                }
                to_claim.push(key);
            }
            None => to_claim.push(key),
        }
    }

    // Apply phase
    let mut change = CanonicalChange {
        events,
        ..CanonicalChange::default()
    };

    for key in to_claim {
        corpus.index.claim(key.clone(), id.to_string());
        change.claimed.push(key);
    }

    let now = Utc::now();
    if let Some(target) = corpus.examples.get_mut(id) {
        if !target.canonical {
            target.canonical = true;
            target.updated_at = now;
            change.flipped.push(id.to_string());
        }
    }

    for prev in displaced {
        let still_holds = corpus.holds_any_key(&prev);
        if let Some(example) = corpus.examples.get_mut(&prev) {
            if example.canonical != still_holds {
                example.canonical = still_holds;
                example.updated_at = now;
                change.flipped.push(prev);
            }
        }
    }

    Ok(change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntitySpan, NewExample};
    use crate::ops::example_ops::insert_example;

    fn greet(corpus: &mut Corpus, text: &str) -> String {
        insert_example(corpus, NewExample::new(text).with_intent("greet")).unwrap()
    }

    #[test]
    fn test_mark_first_holder_has_no_displacement() {
        let mut corpus = Corpus::new();
        let a = greet(&mut corpus, "hello");

        let change = set_canonical(&mut corpus, &a, true).unwrap();

        assert!(change.events.is_empty());
        assert_eq!(change.claimed, vec![GroupingKey::intent("greet")]);
        assert_eq!(change.flipped, vec![a.clone()]);
        assert!(corpus.get(&a).unwrap().canonical);
    }

    #[test]
    fn test_mark_displaces_previous_holder() {
        let mut corpus = Corpus::new();
        let b = greet(&mut corpus, "hello");
        let a = greet(&mut corpus, "welcome");
        set_canonical(&mut corpus, &b, true).unwrap();

        let change = set_canonical(&mut corpus, &a, true).unwrap();

        assert_eq!(
            change.events,
            vec![DisplacementEvent::new(
                b.clone(),
                a.clone(),
                GroupingKey::intent("greet")
            )]
        );
        assert!(corpus.get(&a).unwrap().canonical);
        assert!(!corpus.get(&b).unwrap().canonical);
        assert_eq!(change.flipped, vec![a, b]);
    }

    #[test]
    fn test_remark_is_noop() {
        let mut corpus = Corpus::new();
        let a = greet(&mut corpus, "hello");
        set_canonical(&mut corpus, &a, true).unwrap();

        let change = set_canonical(&mut corpus, &a, true).unwrap();
        assert!(change.is_noop());
        assert!(change.events.is_empty());
    }

    #[test]
    fn test_unmark_releases_all_keys_without_events() {
        let mut corpus = Corpus::new();
        let a = insert_example(
            &mut corpus,
            NewExample::new("to paris")
                .with_intent("greet")
                .with_entity(EntitySpan::new("city", "paris", 3, 8)),
        )
        .unwrap();
        set_canonical(&mut corpus, &a, true).unwrap();

        let change = set_canonical(&mut corpus, &a, false).unwrap();

        assert!(change.events.is_empty());
        assert_eq!(change.released.len(), 2);
        assert!(corpus.index().is_empty());
        assert!(!corpus.get(&a).unwrap().canonical);
    }

    #[test]
    fn test_partial_displacement_keeps_unrelated_key() {
        let mut corpus = Corpus::new();
        // b holds intent greet and entity city=paris
        let b = insert_example(
            &mut corpus,
            NewExample::new("hi paris")
                .with_intent("greet")
                .with_entity(EntitySpan::new("city", "paris", 3, 8)),
        )
        .unwrap();
        let a = greet(&mut corpus, "hello");
        set_canonical(&mut corpus, &b, true).unwrap();

        set_canonical(&mut corpus, &a, true).unwrap();

        assert!(corpus.get(&b).unwrap().canonical);
        assert_eq!(
            corpus.canonical_keys(&b).unwrap(),
            vec![GroupingKey::entity_value("city", "paris")]
        );
        assert_eq!(
            corpus.index().holder(&GroupingKey::intent("greet")),
            Some(a.as_str())
        );
    }

    #[test]
    fn test_mark_without_keys_is_rejected() {
        let mut corpus = Corpus::new();
        let a = insert_example(&mut corpus, NewExample::new("no intent")).unwrap();

        let result = set_canonical(&mut corpus, &a, true);
        assert!(matches!(result, Err(CanonError::InvalidInput { .. })));
        assert!(!corpus.get(&a).unwrap().canonical);
    }

    #[test]
    fn test_unknown_id_leaves_corpus_untouched() {
        let mut corpus = Corpus::new();
        let a = greet(&mut corpus, "hello");
        set_canonical(&mut corpus, &a, true).unwrap();
        let before = corpus.index().clone();

        let result = set_canonical(&mut corpus, "missing", true);

        assert!(matches!(result, Err(CanonError::ExampleNotFound { .. })));
        assert_eq!(corpus.index(), &before);
    }

    #[test]
    fn test_dangling_holder_aborts_before_mutation() {
        let mut corpus = Corpus::new();
        let a = greet(&mut corpus, "hello");
        corpus.restore_claim(GroupingKey::intent("greet"), "ghost".to_string());

        let result = set_canonical(&mut corpus, &a, true);

        assert!(matches!(result, Err(CanonError::InvariantViolation { .. })));
        assert_eq!(
            corpus.index().holder(&GroupingKey::intent("greet")),
            Some("ghost")
        );
        assert!(!corpus.get(&a).unwrap().canonical);
    }
}
