//! Presentation capability view
//!
//! Derives what a UI may offer for an example (edit/delete affordances,
//! canonical marker, tooltips) from committed state. Nothing here mutates.

use serde::Serialize;

use crate::errors::Result;
use crate::guard::{EditGuard, EditKind};
use crate::model::GroupingKey;
use crate::ops::Corpus;

pub const EDIT_BLOCKED_TOOLTIP: &str = "Cannot edit a canonical example. Unmark it first.";
pub const DELETE_BLOCKED_TOOLTIP: &str = "Cannot delete a canonical example. Unmark it first.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleView {
    pub example_id: String,
    pub canonical: bool,
    pub canonical_keys: Vec<GroupingKey>,
    pub can_edit: bool,
    pub can_delete: bool,
    /// `This example is canonical for the intent greet`
    pub canonical_tooltip: Option<String>,
    pub edit_tooltip: Option<String>,
    pub delete_tooltip: Option<String>,
}

impl ExampleView {
    /// Build the view of one example
    ///
    /// # Errors
    ///
    /// Returns `ExampleNotFound` if no example has this id.
    pub fn for_example(corpus: &Corpus, id: &str) -> Result<Self> {
        let example = corpus.get(id)?;
        let canonical_keys = corpus.canonical_keys(id)?;
        let can_edit = EditGuard::can_mutate(example, EditKind::StructuralEdit);
        let can_delete = EditGuard::can_mutate(example, EditKind::Delete);

        let canonical_tooltip = if canonical_keys.is_empty() {
            None
        } else {
            let described: Vec<String> = canonical_keys.iter().map(GroupingKey::describe).collect();
            Some(format!(
                "This example is canonical for {}",
                described.join(" and ")
            ))
        };

        Ok(Self {
            example_id: example.id.clone(),
            canonical: example.canonical,
            canonical_keys,
            can_edit,
            can_delete,
            canonical_tooltip,
            edit_tooltip: (!can_edit).then(|| EDIT_BLOCKED_TOOLTIP.to_string()),
            delete_tooltip: (!can_delete).then(|| DELETE_BLOCKED_TOOLTIP.to_string()),
        })
    }
}
