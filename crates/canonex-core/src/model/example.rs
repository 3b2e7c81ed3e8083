use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::grouping_key::{EntityScope, GroupingKey};
use crate::errors::{CanonError, Result};

/// An extraction span inside an example's text
///
/// `start`/`end` are character offsets, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitySpan {
    pub entity: String,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

impl EntitySpan {
    pub fn new(
        entity: impl Into<String>,
        value: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            entity: entity.into(),
            value: value.into(),
            start,
            end,
        }
    }
}

/// A training example of the NLU corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// Unique identifier (UUID v7), immutable for the example's lifetime
    pub id: String,

    /// Utterance text
    pub text: String,

    /// Intent the example belongs to
    pub intent: Option<String>,

    /// Extraction spans, in the order they were annotated
    pub entities: Vec<EntitySpan>,

    /// True while the example holds at least one grouping key
    pub canonical: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Example {
    /// Create a new, non-canonical example with no intent and no entities
    pub fn new(id: String, text: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            text,
            intent: None,
            entities: Vec::new(),
            canonical: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_entities(mut self, entities: Vec<EntitySpan>) -> Self {
        self.entities = entities;
        self
    }

    /// Grouping keys this example participates in, in resolution order
    ///
    /// Intent key first, then one key per distinct (entity, value) pair in
    /// the order the entities appear.
    pub fn grouping_keys(&self, scope: EntityScope) -> Vec<GroupingKey> {
        let mut keys = Vec::with_capacity(1 + self.entities.len());

        if let Some(intent) = &self.intent {
            keys.push(GroupingKey::intent(intent.clone()));
        }

        for span in &self.entities {
            let key = match (scope, &self.intent) {
                (EntityScope::PerIntent, Some(intent)) => {
                    GroupingKey::scoped_entity_value(intent.clone(), &span.entity, &span.value)
                }
                _ => GroupingKey::entity_value(&span.entity, &span.value),
            };
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        keys
    }

    /// Check whether `key` is among this example's grouping keys
    pub fn participates_in(&self, key: &GroupingKey, scope: EntityScope) -> bool {
        self.grouping_keys(scope).contains(key)
    }
}

/// Input for inserting a new example; the store assigns the id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewExample {
    pub text: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
}

impl NewExample {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_entity(mut self, span: EntitySpan) -> Self {
        self.entities.push(span);
        self
    }
}

/// Structural edit of an example
///
/// `intent: Some(None)` clears the intent. The canonical flag is not part of
/// a patch; it only changes through `set_canonical`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExamplePatch {
    pub text: Option<String>,
    pub intent: Option<Option<String>>,
    pub entities: Option<Vec<EntitySpan>>,
}

impl ExamplePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn intent(mut self, intent: Option<String>) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn entities(mut self, entities: Vec<EntitySpan>) -> Self {
        self.entities = Some(entities);
        self
    }

    /// True if the patch touches nothing
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.intent.is_none() && self.entities.is_none()
    }
}

/// Validate the structural fields of an example
///
/// # Errors
///
/// Returns `InvalidInput` if the text is blank, the intent is blank, or an
/// entity span is empty, reversed, outside the text, or has a blank name.
pub(crate) fn validate_fields(
    text: &str,
    intent: Option<&str>,
    entities: &[EntitySpan],
) -> Result<()> {
    if text.trim().is_empty() {
        return Err(CanonError::invalid(
            "Example text cannot be empty or whitespace-only",
        ));
    }

    if let Some(intent) = intent {
        if intent.trim().is_empty() {
            return Err(CanonError::invalid(
                "Intent cannot be empty or whitespace-only",
            ));
        }
    }

    let text_len = text.chars().count();
    for span in entities {
        if span.entity.trim().is_empty() {
            return Err(CanonError::invalid("Entity name cannot be empty"));
        }
        if span.start >= span.end || span.end > text_len {
            return Err(CanonError::invalid(format!(
                "Entity span {}..{} for '{}' is outside the text (length {})",
                span.start, span.end, span.entity, text_len
            )));
        }
    }

    Ok(())
}
