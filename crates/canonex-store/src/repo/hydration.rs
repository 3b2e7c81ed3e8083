//! Hydration layer - rebuilds a Corpus from SQLite
//!
//! Examples load in insertion order and claims in key order, so two loads
//! of the same database produce identical corpora.

#![allow(clippy::result_large_err)]

use canonex_core::errors::ExError;
use canonex_core::rules::invariants;
use canonex_core::{Corpus, EngineConfig};
use rusqlite::Connection;

use crate::errors::Result;
use crate::repo::SqliteRepo;

/// Load every example and canonical claim into a new corpus
///
/// The result is verified before it is returned; a database whose claims
/// disagree with its examples yields `InvariantViolation`.
pub fn load_corpus(conn: &Connection, config: &EngineConfig) -> Result<Corpus> {
    let mut corpus = Corpus::with_scope(config.entity_scope);

    for example in SqliteRepo::list_examples(conn)? {
        corpus.insert_example(example).map_err(ExError::from)?;
    }
    for (key, example_id) in SqliteRepo::list_claims(conn)? {
        corpus.restore_claim(key, example_id);
    }

    invariants::verify(&corpus).map_err(|e| ExError::from(e).with_op("hydrate"))?;

    tracing::debug!(
        component = module_path!(),
        op = "hydrate",
        examples = corpus.len(),
        claims = corpus.index().len(),
        "Corpus loaded"
    );

    Ok(corpus)
}
