//! Edit guard
//!
//! Policy gate consulted before structural edits and deletes. A canonical
//! example is frozen: the only way to change it is to unmark it first.

use serde::{Deserialize, Serialize};

use crate::errors::{CanonError, Result};
use crate::model::Example;

/// Kind of mutation being attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Change of text, intent or entities
    StructuralEdit,
    Delete,
}

impl EditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditKind::StructuralEdit => "edit",
            EditKind::Delete => "delete",
        }
    }
}

impl std::fmt::Display for EditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless mutation gate
#[derive(Debug, Clone, Copy, Default)]
pub struct EditGuard;

impl EditGuard {
    /// Check whether `example` may undergo a mutation of `kind`
    pub fn can_mutate(example: &Example, _kind: EditKind) -> bool {
        !example.canonical
    }

    /// Like [`EditGuard::can_mutate`], surfacing the rejection as an error
    ///
    /// # Errors
    ///
    /// Returns `EditRejected` carrying `kind` if the example is canonical.
    pub fn check(example: &Example, kind: EditKind) -> Result<()> {
        if Self::can_mutate(example, kind) {
            Ok(())
        } else {
            Err(CanonError::EditRejected {
                example_id: example.id.clone(),
                kind,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_canonical_example_is_mutable() {
        let ex = Example::new("ex-1".to_string(), "hello".to_string());
        assert!(EditGuard::can_mutate(&ex, EditKind::StructuralEdit));
        assert!(EditGuard::can_mutate(&ex, EditKind::Delete));
        assert!(EditGuard::check(&ex, EditKind::Delete).is_ok());
    }

    #[test]
    fn test_canonical_example_is_frozen() {
        let mut ex = Example::new("ex-1".to_string(), "hello".to_string());
        ex.canonical = true;

        assert!(!EditGuard::can_mutate(&ex, EditKind::StructuralEdit));
        assert_eq!(
            EditGuard::check(&ex, EditKind::Delete),
            Err(CanonError::EditRejected {
                example_id: "ex-1".to_string(),
                kind: EditKind::Delete,
            })
        );
    }
}
