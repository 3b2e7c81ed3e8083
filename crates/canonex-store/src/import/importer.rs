//! Importer orchestration
//!
//! Feeds a parsed batch through the store's write path:
//! 1. Bulk-insert every example in file order
//! 2. Mark the examples flagged `canonical: true`, in file order, so a later
//!    entry wins a key shared with an earlier one
//! 3. Run the seeding policy over the inserted ids

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::time::Instant;

use canonex_core::errors::ExError;
use canonex_core::{
    log_op_end, log_op_error, log_op_start, CanonicalSeedPolicy, DisplacementEvent,
    ExampleStore,
};

use crate::errors::Result;
use crate::import::digest::compute_import_digest;
use crate::import::format_v0::{ImportExample, ImportV0};
use crate::import::parser::parse_import_file;

/// What an import did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Digest of the imported batch
    pub digest: String,
    /// New example ids, in file order
    pub inserted: Vec<String>,
    /// Ids marked canonical because the file asked for it
    pub marked: Vec<String>,
    /// Ids marked canonical by the seeding policy
    pub seeded: Vec<String>,
    /// Displacements caused by the explicit marks, then by seeding
    pub displaced: Vec<DisplacementEvent>,
}

/// Import a parsed batch into `store`
pub fn import_batch(
    store: &ExampleStore,
    batch: &ImportV0,
    policy: &dyn CanonicalSeedPolicy,
) -> Result<ImportReport> {
    let start = Instant::now();
    log_op_start!("import", batch_len = batch.examples.len());

    let result = run_import(store, batch, policy);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => {
            log_op_end!(
                "import",
                duration_ms = duration_ms,
                digest = %report.digest,
                displaced_len = report.displaced.len()
            );
        }
        Err(e) => {
            log_op_error!("import", e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

/// Parse and import a JSON or YAML file
pub fn import_file(
    store: &ExampleStore,
    path: &Path,
    policy: &dyn CanonicalSeedPolicy,
) -> Result<ImportReport> {
    let batch = parse_import_file(path)?;
    import_batch(store, &batch, policy)
}

fn run_import(
    store: &ExampleStore,
    batch: &ImportV0,
    policy: &dyn CanonicalSeedPolicy,
) -> Result<ImportReport> {
    let digest = compute_import_digest(batch);

    let new_examples = batch
        .examples
        .iter()
        .map(ImportExample::to_new_example)
        .collect();
    let inserted = store.bulk_insert(new_examples).map_err(ExError::from)?;

    let mut marked = Vec::new();
    let mut displaced = Vec::new();
    for (example, id) in batch.examples.iter().zip(&inserted) {
        if example.canonical {
            displaced.extend(store.set_canonical(id, true).map_err(ExError::from)?);
            marked.push(id.clone());
        }
    }

    let seeding = store
        .seed_canonical(&inserted, policy)
        .map_err(ExError::from)?;
    displaced.extend(seeding.displaced);

    Ok(ImportReport {
        digest,
        inserted,
        marked,
        seeded: seeding.seeded,
        displaced,
    })
}
