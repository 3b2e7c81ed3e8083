use chrono::Utc;
use uuid::Uuid;

use super::corpus::Corpus;
use crate::errors::{CanonError, Result};
use crate::guard::{EditGuard, EditKind};
use crate::model::example::validate_fields;
use crate::model::{Example, ExamplePatch, NewExample};

/// Insert a new example
///
/// Generates a UUID v7 id. The example starts non-canonical, so no index
/// work is needed.
///
/// # Errors
/// * `InvalidInput` - blank text or intent, or an invalid entity span
pub fn insert_example(corpus: &mut Corpus, new: NewExample) -> Result<String> {
    validate_fields(&new.text, new.intent.as_deref(), &new.entities)?;
    let id = Uuid::now_v7().to_string();
    corpus.insert_example(build(id.clone(), new))?;
    Ok(id)
}

/// Insert a batch of examples, preserving input order
///
/// The whole batch is validated before anything is inserted.
///
/// # Errors
/// * `InvalidInput` - if any example in the batch is invalid; the reason
///   names the offending position
pub fn bulk_insert(corpus: &mut Corpus, batch: Vec<NewExample>) -> Result<Vec<String>> {
    for (position, new) in batch.iter().enumerate() {
        validate_fields(&new.text, new.intent.as_deref(), &new.entities).map_err(
            |err| match err {
                CanonError::InvalidInput { reason } => {
                    CanonError::invalid(format!("batch item {}: {}", position, reason))
                }
                other => other,
            },
        )?;
    }

    let mut ids = Vec::with_capacity(batch.len());
    for new in batch {
        let id = Uuid::now_v7().to_string();
        corpus.insert_example(build(id.clone(), new))?;
        ids.push(id);
    }
    Ok(ids)
}

fn build(id: String, new: NewExample) -> Example {
    let mut example = Example::new(id, new.text).with_entities(new.entities);
    example.intent = new.intent;
    example
}

/// Apply a structural patch to an example
///
/// An empty patch is a no-op and is allowed even on canonical examples.
///
/// # Errors
/// * `ExampleNotFound` - unknown id
/// * `EditRejected` - the example is canonical
/// * `InvalidInput` - the patched example would be invalid (e.g. new text
///   shorter than an existing entity span)
pub fn update_example(corpus: &mut Corpus, id: &str, patch: ExamplePatch) -> Result<Example> {
    let current = corpus.get(id)?;
    if patch.is_empty() {
        return Ok(current.clone());
    }

    EditGuard::check(current, EditKind::StructuralEdit)?;

    let text = patch.text.unwrap_or_else(|| current.text.clone());
    let intent = patch.intent.unwrap_or_else(|| current.intent.clone());
    let entities = patch.entities.unwrap_or_else(|| current.entities.clone());
    validate_fields(&text, intent.as_deref(), &entities)?;

    let example = corpus.get_mut(id)?;
    example.text = text;
    example.intent = intent;
    example.entities = entities;
    example.updated_at = Utc::now();

    Ok(example.clone())
}

/// Delete an example
///
/// # Errors
/// * `ExampleNotFound` - unknown id
/// * `EditRejected` - the example is canonical for any key
pub fn delete_example(corpus: &mut Corpus, id: &str) -> Result<()> {
    let example = corpus.get(id)?;
    EditGuard::check(example, EditKind::Delete)?;
    corpus.remove_example(id)?;
    Ok(())
}
