//! Batch import of training examples
//!
//! Provides:
//! - Import format v0 schema (JSON or YAML)
//! - Parser with validation
//! - Digest canonicalization
//! - Importer orchestration against an `ExampleStore`

pub mod digest;
pub mod format_v0;
pub mod importer;
pub mod parser;

pub use digest::compute_import_digest;
pub use format_v0::{ImportEntity, ImportExample, ImportV0};
pub use importer::{import_batch, import_file, ImportReport};
pub use parser::{parse_import_file, parse_import_str, ImportFormat};
