//! Import format v0 schema
//!
//! ```yaml
//! schema_version: 0
//! examples:
//!   - text: "fly to paris"
//!     intent: travel
//!     entities:
//!       - { entity: city, start: 7, end: 12 }
//!     canonical: true
//! ```

use canonex_core::{EntitySpan, NewExample};
use serde::{Deserialize, Serialize};

/// Top-level import file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    /// Examples in insertion order
    #[serde(default)]
    pub examples: Vec<ImportExample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportExample {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<ImportEntity>,

    /// Request canonical status for every key of this example
    #[serde(default)]
    pub canonical: bool,
}

/// Entity span; `value` defaults to the covered text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportEntity {
    pub entity: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Character offset, inclusive
    pub start: usize,

    /// Character offset, exclusive
    pub end: usize,
}

impl ImportEntity {
    /// The entity value, falling back to `text[start..end]` (in chars)
    pub fn resolved_value(&self, text: &str) -> String {
        match &self.value {
            Some(value) => value.clone(),
            None => text
                .chars()
                .skip(self.start)
                .take(self.end.saturating_sub(self.start))
                .collect(),
        }
    }
}

impl ImportExample {
    pub fn to_new_example(&self) -> NewExample {
        let mut example = NewExample::new(self.text.clone());
        if let Some(intent) = &self.intent {
            example = example.with_intent(intent.clone());
        }
        for span in &self.entities {
            example = example.with_entity(EntitySpan::new(
                span.entity.clone(),
                span.resolved_value(&self.text),
                span.start,
                span.end,
            ));
        }
        example
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_defaults_to_covered_text() {
        let span = ImportEntity {
            entity: "city".to_string(),
            value: None,
            start: 7,
            end: 12,
        };
        assert_eq!(span.resolved_value("fly to paris"), "paris");

        let explicit = ImportEntity {
            value: Some("Paris".to_string()),
            ..span
        };
        assert_eq!(explicit.resolved_value("fly to paris"), "Paris");
    }

    #[test]
    fn test_to_new_example() {
        let example = ImportExample {
            text: "fly to paris".to_string(),
            intent: Some("travel".to_string()),
            entities: vec![ImportEntity {
                entity: "city".to_string(),
                value: None,
                start: 7,
                end: 12,
            }],
            canonical: false,
        };

        let new = example.to_new_example();
        assert_eq!(new.intent.as_deref(), Some("travel"));
        assert_eq!(new.entities, vec![EntitySpan::new("city", "paris", 7, 12)]);
    }
}
