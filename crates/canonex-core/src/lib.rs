//! Canonex Core - canonical-example invariant engine
//!
//! This crate keeps a corpus of NLU training examples and enforces that at
//! most one example is canonical per grouping key, including:
//! - Example and grouping-key models (intent keys, entity-value keys)
//! - The canonical index with displacement of previous holders
//! - The edit guard that freezes canonical examples
//! - A functional `apply()` boundary producing persistable change sets
//! - `ExampleStore`: snapshot reads and a single serialized write path
//! - Query facade, presentation view and the canonical seeding policy hook

pub mod apply;
pub mod canonical_index;
pub mod changes;
pub mod commands;
pub mod config;
pub mod errors;
pub mod guard;
pub mod logging_facility;
pub mod model;
pub mod notify;
pub mod ops;
pub mod policy;
pub mod queries;
pub mod rules;
pub mod store;
pub mod view;

// Used by the exported logging macros
pub use canonex_core_types;

// Re-export commonly used types
pub use apply::{apply, Outcome};
pub use canonical_index::CanonicalIndex;
pub use changes::ChangeSet;
pub use commands::{Command, CommandResult};
pub use config::EngineConfig;
pub use errors::{CanonError, ExError, ExErrorKind, Result};
pub use guard::{EditGuard, EditKind};
pub use model::{
    DisplacementEvent, EntityScope, EntitySpan, Example, ExamplePatch, GroupingKey, NewExample,
};
pub use notify::{CollectingSink, NoopSink, NotificationSink, TracingSink};
pub use ops::Corpus;
pub use policy::{CanonicalSeedPolicy, FirstExamplePerIntent, NoSeeding};
pub use queries::{KeyGroup, ListFilter, QueryFacade};
pub use store::{ExampleRepository, ExampleStore, KeyMembers, NullRepository, SeedReport};
pub use view::ExampleView;
