//! Import digest canonicalization
//!
//! Computes a stable SHA256 digest of an import batch. Formatting, key
//! order and the source format (JSON or YAML) do not affect it.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::import::format_v0::ImportV0;

#[derive(Serialize)]
struct CanonicalBatch<'a> {
    schema_version: u32,
    examples: Vec<CanonicalExample<'a>>,
}

#[derive(Serialize)]
struct CanonicalExample<'a> {
    text: &'a str,
    intent: Option<&'a str>,
    entities: Vec<(&'a str, String, usize, usize)>,
    canonical: bool,
}

/// Compute the hex SHA256 digest of a batch
pub fn compute_import_digest(batch: &ImportV0) -> String {
    let canonical = CanonicalBatch {
        schema_version: batch.schema_version,
        examples: batch
            .examples
            .iter()
            .map(|e| CanonicalExample {
                text: &e.text,
                intent: e.intent.as_deref(),
                entities: e
                    .entities
                    .iter()
                    .map(|s| (s.entity.as_str(), s.resolved_value(&e.text), s.start, s.end))
                    .collect(),
                canonical: e.canonical,
            })
            .collect(),
    };

    let mut hasher = Sha256::new();
    // Serializing plain structs of strings and integers cannot fail
    if let Ok(json) = serde_json::to_vec(&canonical) {
        hasher.update(&json);
    }
    hex::encode(hasher.finalize())
}
