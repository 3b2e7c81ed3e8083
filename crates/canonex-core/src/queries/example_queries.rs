//! Read path over a corpus snapshot
//!
//! A `QueryFacade` borrows one immutable snapshot, so every answer it gives
//! reflects the same committed state.

use crate::errors::Result;
use crate::model::{Example, GroupingKey};
use crate::ops::Corpus;

/// Filter for [`QueryFacade::list`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub only_canonical: bool,
    pub intent: Option<String>,
    /// Case-insensitive substring match on the text
    pub text_contains: Option<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn only_canonical(mut self, only: bool) -> Self {
        self.only_canonical = only;
        self
    }

    pub fn intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn text_contains(mut self, needle: impl Into<String>) -> Self {
        self.text_contains = Some(needle.into());
        self
    }

    fn matches(&self, example: &Example, needle: Option<&str>) -> bool {
        if self.only_canonical && !example.canonical {
            return false;
        }
        if let Some(intent) = &self.intent {
            if example.intent.as_deref() != Some(intent.as_str()) {
                return false;
            }
        }
        if let Some(needle) = needle {
            if !example.text.to_lowercase().contains(needle) {
                return false;
            }
        }
        true
    }
}

/// All examples sharing a grouping key
#[derive(Debug, Clone, PartialEq)]
pub struct KeyGroup<'a> {
    pub key: GroupingKey,
    /// Id of the canonical holder, if any
    pub holder: Option<&'a str>,
    /// Members in insertion order
    pub examples: Vec<&'a Example>,
}

impl KeyGroup<'_> {
    /// The holder's record, if any
    pub fn canonical(&self) -> Option<&Example> {
        let holder = self.holder?;
        self.examples.iter().copied().find(|e| e.id == holder)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueryFacade<'a> {
    corpus: &'a Corpus,
}

impl<'a> QueryFacade<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    /// Get an example by id
    ///
    /// # Errors
    ///
    /// Returns `ExampleNotFound` if no example has this id.
    pub fn get(&self, id: &str) -> Result<&'a Example> {
        self.corpus.get(id)
    }

    /// List examples in insertion order
    pub fn list(&self, filter: &ListFilter) -> Vec<&'a Example> {
        let needle = filter.text_contains.as_ref().map(|n| n.to_lowercase());
        self.corpus
            .list_examples()
            .into_iter()
            .filter(|e| filter.matches(e, needle.as_deref()))
            .collect()
    }

    /// All examples participating in `key`, with its canonical holder
    pub fn list_by_grouping_key(&self, key: &GroupingKey) -> KeyGroup<'a> {
        let scope = self.corpus.scope();
        KeyGroup {
            key: key.clone(),
            holder: self.corpus.index().holder(key),
            examples: self
                .corpus
                .list_examples()
                .into_iter()
                .filter(|e| e.participates_in(key, scope))
                .collect(),
        }
    }

    /// Every (key, holder id) pair, ordered by key
    pub fn canonical_holders(&self) -> Vec<(GroupingKey, String)> {
        self.corpus
            .index()
            .entries()
            .into_iter()
            .map(|(k, id)| (k.clone(), id.to_string()))
            .collect()
    }

    /// Keys the example currently holds
    ///
    /// # Errors
    ///
    /// Returns `ExampleNotFound` if no example has this id.
    pub fn canonical_keys(&self, id: &str) -> Result<Vec<GroupingKey>> {
        self.corpus.canonical_keys(id)
    }
}
