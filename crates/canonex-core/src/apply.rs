//! Functional-boundary apply function
//!
//! `apply()` is the single entry point for corpus mutations.
//!
//! ## Atomicity Contract
//!
//! - **All-or-nothing**: either the command succeeds and a new valid corpus is
//!   returned, or it fails and the corpus the caller cloned from is untouched
//! - **No panics**: invalid input returns typed errors
//! - **Described**: every success carries the `ChangeSet` a repository needs
//!   to persist it
//!
//! ## Example
//!
//! ```
//! use canonex_core::{apply, Command, Corpus, NewExample};
//!
//! let cmd = Command::Insert {
//!     example: NewExample::new("hello").with_intent("greet"),
//! };
//! let (corpus, outcome) = apply(Corpus::new(), cmd).unwrap();
//! assert_eq!(corpus.len(), 1);
//! assert_eq!(outcome.changes.upserted.len(), 1);
//! ```

use crate::changes::ChangeSet;
use crate::commands::{Command, CommandResult};
use crate::errors::Result;
use crate::ops::{canonical_ops, example_ops, Corpus};

/// What a successful `apply` produced besides the new corpus
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub result: CommandResult,
    pub changes: ChangeSet,
}

/// Apply a command to a corpus, returning the new corpus state
///
/// Takes ownership of `state`. Callers that must keep the previous state on
/// failure pass a clone (as `ExampleStore` does with its published snapshot).
///
/// # Errors
///
/// Returns the error of the failing operation: `ExampleNotFound`,
/// `EditRejected`, `InvalidInput` or `InvariantViolation`.
pub fn apply(mut state: Corpus, cmd: Command) -> Result<(Corpus, Outcome)> {
    let mut changes = ChangeSet::new();

    let result = match cmd {
        Command::Insert { example } => {
            let id = example_ops::insert_example(&mut state, example)?;
            changes.upsert(state.get(&id)?.clone());
            CommandResult::Inserted(id)
        }

        Command::BulkInsert { examples } => {
            let ids = example_ops::bulk_insert(&mut state, examples)?;
            for id in &ids {
                changes.upsert(state.get(id)?.clone());
            }
            CommandResult::BulkInserted(ids)
        }

        Command::Update { example_id, patch } => {
            let untouched = patch.is_empty();
            let example = example_ops::update_example(&mut state, &example_id, patch)?;
            if !untouched {
                changes.upsert(example.clone());
            }
            CommandResult::Updated(example)
        }

        Command::Delete { example_id } => {
            example_ops::delete_example(&mut state, &example_id)?;
            changes.deleted.push(example_id);
            CommandResult::Deleted
        }

        Command::SetCanonical { example_id, on } => {
            let change = canonical_ops::set_canonical(&mut state, &example_id, on)?;
            for id in &change.flipped {
                changes.upsert(state.get(id)?.clone());
            }
            changes.released = change.released;
            changes.claimed = change
                .claimed
                .into_iter()
                .map(|key| (key, example_id.clone()))
                .collect();
            CommandResult::CanonicalSet(change.events)
        }
    };

    Ok((state, Outcome { result, changes }))
}
