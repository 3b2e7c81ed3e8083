//! Engine configuration
//!
//! ```toml
//! entity_scope = "per_intent"
//! verify_invariants_on_commit = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CanonError, Result};
use crate::model::EntityScope;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Scope of entity-value grouping keys
    pub entity_scope: EntityScope,

    /// Re-check the index against the touched examples before every commit
    pub verify_invariants_on_commit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entity_scope: EntityScope::Global,
            verify_invariants_on_commit: true,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document; absent fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the document is not valid TOML or names an
    /// unknown field.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CanonError::Configuration {
            reason: e.to_string(),
        })
    }

    /// Load a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CanonError::Configuration {
            reason: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }
}
