//! Canonical index
//!
//! Maps each grouping key to the id of the example currently canonical for
//! it. A key with no entry has no canonical holder. Because the map holds at
//! most one id per key, uniqueness per key is structural; what the rest of the
//! kernel must keep consistent is the agreement between this map and the
//! examples' `canonical` flags.

use std::collections::HashMap;

use crate::model::GroupingKey;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalIndex {
    holders: HashMap<GroupingKey, String>,
}

impl CanonicalIndex {
    pub fn new() -> Self {
        Self {
            holders: HashMap::new(),
        }
    }

    /// Current holder of `key`, if any
    pub fn holder(&self, key: &GroupingKey) -> Option<&str> {
        self.holders.get(key).map(String::as_str)
    }

    /// Check whether `example_id` holds `key`
    pub fn is_held_by(&self, key: &GroupingKey, example_id: &str) -> bool {
        self.holder(key) == Some(example_id)
    }

    /// Map `key` to `example_id`, returning the previous holder
    pub(crate) fn claim(&mut self, key: GroupingKey, example_id: String) -> Option<String> {
        self.holders.insert(key, example_id)
    }

    /// Remove the mapping for `key` if `example_id` holds it
    ///
    /// Returns true if a mapping was removed.
    pub(crate) fn release_if_held_by(&mut self, key: &GroupingKey, example_id: &str) -> bool {
        if self.is_held_by(key, example_id) {
            self.holders.remove(key);
            true
        } else {
            false
        }
    }

    /// Of `keys`, those held by `example_id` (order preserved)
    pub fn held_among<'k>(
        &self,
        keys: &'k [GroupingKey],
        example_id: &str,
    ) -> Vec<&'k GroupingKey> {
        keys.iter()
            .filter(|k| self.is_held_by(k, example_id))
            .collect()
    }

    /// All (key, holder) pairs, ordered by key
    pub fn entries(&self) -> Vec<(&GroupingKey, &str)> {
        let mut entries: Vec<_> = self
            .holders
            .iter()
            .map(|(k, id)| (k, id.as_str()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }
}
