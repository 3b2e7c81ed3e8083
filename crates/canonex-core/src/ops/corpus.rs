use std::collections::HashMap;

use crate::canonical_index::CanonicalIndex;
use crate::errors::{CanonError, Result};
use crate::model::{EntityScope, Example, GroupingKey};

/// In-memory training corpus
///
/// Holds the examples, their insertion order and the canonical index. Not
/// synchronized itself; `ExampleStore` publishes immutable snapshots of it.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Map of example id to example
    pub(crate) examples: HashMap<String, Example>,
    /// Example ids in insertion order
    pub(crate) order: Vec<String>,
    pub(crate) index: CanonicalIndex,
    scope: EntityScope,
}

impl Corpus {
    /// Create an empty corpus with global entity scope
    pub fn new() -> Self {
        Self::with_scope(EntityScope::Global)
    }

    pub fn with_scope(scope: EntityScope) -> Self {
        Self {
            examples: HashMap::new(),
            order: Vec::new(),
            index: CanonicalIndex::new(),
            scope,
        }
    }

    pub fn scope(&self) -> EntityScope {
        self.scope
    }

    /// Get an example by ID
    ///
    /// # Errors
    ///
    /// Returns `ExampleNotFound` if no example has this id.
    pub fn get(&self, id: &str) -> Result<&Example> {
        self.examples.get(id).ok_or_else(|| CanonError::not_found(id))
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Result<&mut Example> {
        self.examples
            .get_mut(id)
            .ok_or_else(|| CanonError::not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.examples.contains_key(id)
    }

    /// List all examples in insertion order
    pub fn list_examples(&self) -> Vec<&Example> {
        self.order
            .iter()
            .filter_map(|id| self.examples.get(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn index(&self) -> &CanonicalIndex {
        &self.index
    }

    /// Grouping keys of an example under this corpus' scope
    ///
    /// # Errors
    ///
    /// Returns `ExampleNotFound` if no example has this id.
    pub fn grouping_keys(&self, id: &str) -> Result<Vec<GroupingKey>> {
        Ok(self.get(id)?.grouping_keys(self.scope))
    }

    /// Keys the example currently holds, in resolution order
    ///
    /// # Errors
    ///
    /// Returns `ExampleNotFound` if no example has this id.
    pub fn canonical_keys(&self, id: &str) -> Result<Vec<GroupingKey>> {
        let keys = self.grouping_keys(id)?;
        Ok(self
            .index
            .held_among(&keys, id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Check whether the example holds any of its grouping keys
    pub(crate) fn holds_any_key(&self, id: &str) -> bool {
        self.examples.get(id).is_some_and(|ex| {
            ex.grouping_keys(self.scope)
                .iter()
                .any(|k| self.index.is_held_by(k, id))
        })
    }

    /// Insert an example, keeping insertion order
    ///
    /// Used by the insert operations and by hydration. Does not touch the
    /// canonical index.
    ///
    /// # Errors
    ///
    /// Returns `ExampleAlreadyExists` if the id is taken.
    pub fn insert_example(&mut self, example: Example) -> Result<()> {
        if self.examples.contains_key(&example.id) {
            return Err(CanonError::ExampleAlreadyExists {
                example_id: example.id,
            });
        }
        self.order.push(example.id.clone());
        self.examples.insert(example.id.clone(), example);
        Ok(())
    }

    /// Restore a persisted key mapping (hydration only)
    ///
    /// Consistency with the examples' flags is checked afterwards by
    /// `rules::invariants::verify`.
    pub fn restore_claim(&mut self, key: GroupingKey, example_id: String) {
        self.index.claim(key, example_id);
    }

    pub(crate) fn remove_example(&mut self, id: &str) -> Result<Example> {
        let example = self
            .examples
            .remove(id)
            .ok_or_else(|| CanonError::not_found(id))?;
        self.order.retain(|existing| existing != id);
        Ok(example)
    }
}
