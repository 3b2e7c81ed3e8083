//! Change sets handed to the persistence collaborator
//!
//! A `ChangeSet` is the complete, ordered description of one committed write.
//! Repositories must apply it atomically: deletes, then upserts, then key
//! releases, then key claims.

use crate::model::{Example, GroupingKey};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Examples inserted or modified (full records)
    pub upserted: Vec<Example>,
    /// Ids of examples removed
    pub deleted: Vec<String>,
    /// Keys whose mapping was removed
    pub released: Vec<GroupingKey>,
    /// Keys mapped to a (new) holder
    pub claimed: Vec<(GroupingKey, String)>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.upserted.is_empty()
            && self.deleted.is_empty()
            && self.released.is_empty()
            && self.claimed.is_empty()
    }

    /// Record an upsert, replacing an earlier record of the same example
    pub(crate) fn upsert(&mut self, example: Example) {
        if let Some(existing) = self.upserted.iter_mut().find(|e| e.id == example.id) {
            *existing = example;
        } else {
            self.upserted.push(example);
        }
    }

    /// Ids of every example this change set touches
    pub fn touched_ids(&self) -> impl Iterator<Item = &str> {
        self.upserted
            .iter()
            .map(|e| e.id.as_str())
            .chain(self.deleted.iter().map(String::as_str))
    }

    /// Keys whose holder may have changed
    pub fn touched_keys(&self) -> impl Iterator<Item = &GroupingKey> {
        self.released
            .iter()
            .chain(self.claimed.iter().map(|(k, _)| k))
    }

    /// Fold a later change set into this one
    ///
    /// A later release or claim of a key supersedes an earlier claim of it,
    /// so applying the merged set yields the same index as applying both.
    pub fn merge(&mut self, other: ChangeSet) {
        for example in other.upserted {
            self.upsert(example);
        }
        for id in &other.deleted {
            self.upserted.retain(|e| &e.id != id);
        }
        self.deleted.extend(other.deleted);
        for key in other.released {
            self.claimed.retain(|(k, _)| *k != key);
            if !self.released.contains(&key) {
                self.released.push(key);
            }
        }
        for (key, id) in other.claimed {
            self.claimed.retain(|(k, _)| *k != key);
            self.claimed.push((key, id));
        }
    }
}
