//! Canonical invariant checks
//!
//! The index can map a key to only one id, so "two holders for one key" is
//! ruled out by construction. What can still go wrong is disagreement between
//! the index and the examples:
//! - a key mapped to an example that no longer exists
//! - a key mapped to an example that does not derive that key
//! - an example whose `canonical` flag does not match whether it holds a key
//!
//! Each finder returns every violation it sees; `verify` turns the first one
//! into an `InvariantViolation` error.

use crate::changes::ChangeSet;
use crate::errors::{CanonError, Result};
use crate::model::GroupingKey;
use crate::ops::Corpus;

/// Keys mapped to an example id that is not in the corpus
///
/// Returns list of (key, holder_id) tuples
pub fn find_dangling_holders(corpus: &Corpus) -> Vec<(GroupingKey, String)> {
    corpus
        .index()
        .entries()
        .into_iter()
        .filter(|(_, holder)| !corpus.contains(holder))
        .map(|(k, holder)| (k.clone(), holder.to_string()))
        .collect()
}

/// Keys mapped to an example that does not participate in the key
///
/// Returns list of (key, holder_id) tuples
pub fn find_foreign_holders(corpus: &Corpus) -> Vec<(GroupingKey, String)> {
    corpus
        .index()
        .entries()
        .into_iter()
        .filter(|(key, holder)| {
            corpus
                .get(holder)
                .is_ok_and(|ex| !ex.participates_in(key, corpus.scope()))
        })
        .map(|(k, holder)| (k.clone(), holder.to_string()))
        .collect()
}

/// Examples whose `canonical` flag disagrees with the index
///
/// Returns list of (example_id, flag) tuples
pub fn find_flag_mismatches(corpus: &Corpus) -> Vec<(String, bool)> {
    corpus
        .list_examples()
        .into_iter()
        .filter(|ex| ex.canonical != corpus.holds_any_key(&ex.id))
        .map(|ex| (ex.id.clone(), ex.canonical))
        .collect()
}

/// Verify the whole corpus
///
/// Used after hydration and by the `check` command.
///
/// # Errors
///
/// Returns `InvariantViolation` describing the first violation found.
pub fn verify(corpus: &Corpus) -> Result<()> {
    if let Some((key, holder)) = find_dangling_holders(corpus).into_iter().next() {
        return Err(dangling(&key, &holder));
    }
    if let Some((key, holder)) = find_foreign_holders(corpus).into_iter().next() {
        return Err(foreign(&key, &holder));
    }
    if let Some((id, flag)) = find_flag_mismatches(corpus).into_iter().next() {
        return Err(mismatch(&id, flag));
    }
    Ok(())
}

/// Verify only what a change set touched
///
/// Cost is proportional to the change, not to the corpus.
///
/// # Errors
///
/// Returns `InvariantViolation` describing the first violation found.
pub fn verify_changes(corpus: &Corpus, changes: &ChangeSet) -> Result<()> {
    for key in changes.touched_keys() {
        let Some(holder) = corpus.index().holder(key) else {
            continue;
        };
        let example = corpus.get(holder).map_err(|_| dangling(key, holder))?;
        if !example.participates_in(key, corpus.scope()) {
            return Err(foreign(key, holder));
        }
    }

    for id in changes.touched_ids() {
        if let Ok(example) = corpus.get(id) {
            if example.canonical != corpus.holds_any_key(id) {
                return Err(mismatch(id, example.canonical));
            }
        }
    }

    for id in &changes.deleted {
        if let Some((key, _)) = corpus
            .index()
            .entries()
            .into_iter()
            .find(|(_, holder)| *holder == id.as_str())
        {
            return Err(dangling(key, id));
        }
    }

    Ok(())
}

fn dangling(key: &GroupingKey, holder: &str) -> CanonError {
    CanonError::InvariantViolation {
        key: key.to_string(),
        reason: format!("holder {} does not exist", holder),
    }
}

fn foreign(key: &GroupingKey, holder: &str) -> CanonError {
    CanonError::InvariantViolation {
        key: key.to_string(),
        reason: format!("holder {} does not belong to this key", holder),
    }
}

fn mismatch(id: &str, flag: bool) -> CanonError {
    CanonError::InvariantViolation {
        key: id.to_string(),
        reason: format!(
            "example flag canonical={} disagrees with the canonical index",
            flag
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Example, NewExample};
    use crate::ops::{canonical_ops, example_ops};

    #[test]
    fn test_consistent_corpus_verifies() {
        let mut corpus = Corpus::new();
        let a = example_ops::insert_example(&mut corpus, NewExample::new("hi").with_intent("greet"))
            .unwrap();
        canonical_ops::set_canonical(&mut corpus, &a, true).unwrap();

        assert!(verify(&corpus).is_ok());
    }

    #[test]
    fn test_dangling_holder_detected() {
        let mut corpus = Corpus::new();
        corpus.restore_claim(GroupingKey::intent("greet"), "ghost".to_string());

        assert_eq!(find_dangling_holders(&corpus).len(), 1);
        assert!(matches!(
            verify(&corpus),
            Err(CanonError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_foreign_holder_detected() {
        let mut corpus = Corpus::new();
        corpus
            .insert_example(Example::new("a".to_string(), "hi".to_string()).with_intent("greet"))
            .unwrap();
        corpus.restore_claim(GroupingKey::intent("bye"), "a".to_string());

        assert_eq!(
            find_foreign_holders(&corpus),
            vec![(GroupingKey::intent("bye"), "a".to_string())]
        );
    }

    #[test]
    fn test_flag_mismatch_detected() {
        let mut corpus = Corpus::new();
        let mut ex = Example::new("a".to_string(), "hi".to_string()).with_intent("greet");
        ex.canonical = true;
        corpus.insert_example(ex).unwrap();

        assert_eq!(find_flag_mismatches(&corpus), vec![("a".to_string(), true)]);
        assert!(verify(&corpus).is_err());
    }

    #[test]
    fn test_verify_changes_catches_deleted_holder() {
        let mut corpus = Corpus::new();
        corpus.restore_claim(GroupingKey::intent("greet"), "a".to_string());
        let mut changes = ChangeSet::new();
        changes.deleted.push("a".to_string());

        assert!(verify_changes(&corpus, &changes).is_err());
    }
}
