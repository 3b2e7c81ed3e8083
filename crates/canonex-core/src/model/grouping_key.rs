use serde::{Deserialize, Serialize};

/// How entity-value grouping keys are scoped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityScope {
    /// One canonical holder per (entity, value) across every intent
    #[default]
    Global,
    /// One canonical holder per (intent, entity, value)
    PerIntent,
}

/// The unit over which canonical uniqueness is enforced
///
/// Derived from an example, never stored on it. Ordering is total so that
/// holder listings are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupingKey {
    Intent {
        intent: String,
    },
    EntityValue {
        /// Qualifying intent; always `None` under `EntityScope::Global`
        intent: Option<String>,
        entity: String,
        value: String,
    },
}

impl GroupingKey {
    pub fn intent(name: impl Into<String>) -> Self {
        GroupingKey::Intent {
            intent: name.into(),
        }
    }

    /// Globally scoped entity-value key
    pub fn entity_value(entity: impl Into<String>, value: impl Into<String>) -> Self {
        GroupingKey::EntityValue {
            intent: None,
            entity: entity.into(),
            value: value.into(),
        }
    }

    /// Entity-value key qualified by an intent (`EntityScope::PerIntent`)
    pub fn scoped_entity_value(
        intent: impl Into<String>,
        entity: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        GroupingKey::EntityValue {
            intent: Some(intent.into()),
            entity: entity.into(),
            value: value.into(),
        }
    }

    pub fn is_intent(&self) -> bool {
        matches!(self, GroupingKey::Intent { .. })
    }

    /// Human description used in notifications and tooltips
    ///
    /// `the intent greet`, `the entity city with value paris`
    pub fn describe(&self) -> String {
        match self {
            GroupingKey::Intent { intent } => format!("the intent {}", intent),
            GroupingKey::EntityValue {
                intent: None,
                entity,
                value,
            } => format!("the entity {} with value {}", entity, value),
            GroupingKey::EntityValue {
                intent: Some(intent),
                entity,
                value,
            } => format!(
                "the entity {} with value {} in the intent {}",
                entity, value, intent
            ),
        }
    }

    /// Stable storage encoding (JSON with a `kind` tag)
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the key cannot be encoded.
    pub fn encode(&self) -> crate::errors::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Inverse of [`GroupingKey::encode`]
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the text is not a valid encoded key.
    pub fn decode(text: &str) -> crate::errors::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl std::fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingKey::Intent { intent } => write!(f, "intent:{}", intent),
            GroupingKey::EntityValue {
                intent: None,
                entity,
                value,
            } => write!(f, "entity:{}={}", entity, value),
            GroupingKey::EntityValue {
                intent: Some(intent),
                entity,
                value,
            } => write!(f, "entity:{}/{}={}", intent, entity, value),
        }
    }
}
