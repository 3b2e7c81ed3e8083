//! Command inventory for the `apply()` boundary

use crate::model::{DisplacementEvent, Example, ExamplePatch, NewExample};

/// Every write the example store accepts
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Insert one example
    Insert { example: NewExample },

    /// Insert many examples, preserving order (batch import path)
    BulkInsert { examples: Vec<NewExample> },

    /// Structural edit of a non-canonical example
    Update {
        example_id: String,
        patch: ExamplePatch,
    },

    /// Delete a non-canonical example
    Delete { example_id: String },

    /// Mark (`on = true`) or unmark an example as canonical
    SetCanonical { example_id: String, on: bool },
}

impl Command {
    /// Operation name used in logs and error context
    pub fn op_name(&self) -> &'static str {
        match self {
            Command::Insert { .. } => "insert",
            Command::BulkInsert { .. } => "bulk_insert",
            Command::Update { .. } => "update",
            Command::Delete { .. } => "delete",
            Command::SetCanonical { .. } => "set_canonical",
        }
    }

    /// Target example of single-example commands
    pub fn example_id(&self) -> Option<&str> {
        match self {
            Command::Update { example_id, .. }
            | Command::Delete { example_id }
            | Command::SetCanonical { example_id, .. } => Some(example_id),
            Command::Insert { .. } | Command::BulkInsert { .. } => None,
        }
    }
}

/// Result of a successfully applied command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Inserted(String),
    BulkInserted(Vec<String>),
    Updated(Example),
    Deleted,
    /// Displacement events in key resolution order (possibly empty)
    CanonicalSet(Vec<DisplacementEvent>),
}
