//! Import parser with validation
//!
//! Parses JSON or YAML and validates the schema version, texts and entity
//! spans before anything reaches the store.

#![allow(clippy::result_large_err)]

use std::fs;
use std::path::Path;

use crate::errors::{import_validation, io_error, Result};
use crate::import::format_v0::ImportV0;

/// Source format of an import file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Yaml,
}

impl ImportFormat {
    /// Pick the format from a file extension; anything but `.json` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ImportFormat::Json,
            _ => ImportFormat::Yaml,
        }
    }
}

/// Parse an import file from a path
pub fn parse_import_file(path: &Path) -> Result<ImportV0> {
    let content = fs::read_to_string(path).map_err(|e| io_error("import_read", e))?;
    parse_import_str(&content, ImportFormat::from_path(path))
}

/// Parse an import document from a string
pub fn parse_import_str(content: &str, format: ImportFormat) -> Result<ImportV0> {
    let batch: ImportV0 = match format {
        ImportFormat::Json => serde_json::from_str(content)
            .map_err(|e| import_validation(&format!("JSON parse error: {}", e)))?,
        ImportFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| import_validation(&format!("YAML parse error: {}", e)))?,
    };

    validate_batch(&batch)?;

    Ok(batch)
}

fn validate_batch(batch: &ImportV0) -> Result<()> {
    if batch.schema_version != 0 {
        return Err(import_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            batch.schema_version
        )));
    }

    for (position, example) in batch.examples.iter().enumerate() {
        if example.text.trim().is_empty() {
            return Err(import_validation(&format!(
                "Example {} has empty text",
                position
            )));
        }

        if let Some(intent) = &example.intent {
            if intent.trim().is_empty() {
                return Err(import_validation(&format!(
                    "Example {} has an empty intent",
                    position
                )));
            }
        }

        if example.canonical && example.intent.is_none() && example.entities.is_empty() {
            return Err(import_validation(&format!(
                "Example {} is marked canonical but has no intent or entities",
                position
            )));
        }

        let text_len = example.text.chars().count();
        for span in &example.entities {
            if span.entity.trim().is_empty() {
                return Err(import_validation(&format!(
                    "Example {} has an entity without a name",
                    position
                )));
            }
            if span.start >= span.end || span.end > text_len {
                return Err(import_validation(&format!(
                    "Example {}: entity {} span {}..{} is outside the text (length {})",
                    position, span.entity, span.start, span.end, text_len
                )));
            }
        }
    }

    Ok(())
}
