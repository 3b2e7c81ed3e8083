//! ExampleStore: the concurrent write path
//!
//! ## Model
//!
//! - The committed corpus is published as an `Arc<Corpus>` behind an
//!   `RwLock`. Readers clone the `Arc` and never see a half-applied write.
//! - Writers are serialized by a single mutex. Each write clones the
//!   published corpus, runs [`apply`], verifies the touched keys, hands the
//!   `ChangeSet` to the [`ExampleRepository`] and only then publishes.
//! - Displacement events go to the [`NotificationSink`] after publish.
//!   Sink failures are logged and never undo the write.

use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Instant;

use canonex_core_types::correlation::RequestId;

use crate::apply::apply;
use crate::changes::ChangeSet;
use crate::commands::{Command, CommandResult};
use crate::config::EngineConfig;
use crate::errors::{CanonError, ExError, Result};
use crate::model::{DisplacementEvent, Example, ExamplePatch, GroupingKey, NewExample};
use crate::notify::{NoopSink, NotificationSink};
use crate::ops::Corpus;
use crate::policy::CanonicalSeedPolicy;
use crate::queries::{ListFilter, QueryFacade};
use crate::rules::invariants;
use crate::view::ExampleView;
use crate::{log_op_end, log_op_error, log_op_start};

/// Storage collaborator that persists committed change sets
///
/// `commit` must apply the whole change set or nothing. A failed commit
/// aborts the write: the store keeps its previous snapshot.
pub trait ExampleRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns an `ExError` if the change set could not be persisted.
    #[allow(clippy::result_large_err)]
    fn commit(&self, changes: &ChangeSet) -> std::result::Result<(), ExError>;
}

/// Repository for purely in-memory stores
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRepository;

impl ExampleRepository for NullRepository {
    fn commit(&self, _changes: &ChangeSet) -> std::result::Result<(), ExError> {
        Ok(())
    }
}

/// Members of one grouping key, owned
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMembers {
    pub key: GroupingKey,
    pub holder: Option<String>,
    pub examples: Vec<Example>,
}

/// What a seeding pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    /// Ids marked canonical by the policy, in the order given
    pub seeded: Vec<String>,
    /// Displacements caused by those marks
    pub displaced: Vec<DisplacementEvent>,
}

pub struct ExampleStore {
    state: RwLock<Arc<Corpus>>,
    writer: Mutex<()>,
    repository: Arc<dyn ExampleRepository>,
    sink: Arc<dyn NotificationSink>,
    config: EngineConfig,
}

impl std::fmt::Debug for ExampleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExampleStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ExampleStore {
    /// Create an empty store
    pub fn new(
        config: EngineConfig,
        repository: Arc<dyn ExampleRepository>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let corpus = Corpus::with_scope(config.entity_scope);
        Self::from_parts(corpus, config, repository, sink)
    }

    /// Empty store with no persistence and no notifications
    pub fn in_memory() -> Self {
        Self::new(
            EngineConfig::default(),
            Arc::new(NullRepository),
            Arc::new(NoopSink),
        )
    }

    /// Start from an already populated corpus (e.g. one hydrated from disk)
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the corpus was built with a different
    /// entity scope than `config` names, and `InvariantViolation` if the
    /// corpus does not satisfy the canonical invariants.
    pub fn with_corpus(
        corpus: Corpus,
        config: EngineConfig,
        repository: Arc<dyn ExampleRepository>,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self> {
        if corpus.scope() != config.entity_scope {
            return Err(CanonError::Configuration {
                reason: format!(
                    "corpus entity scope {:?} does not match configured {:?}",
                    corpus.scope(),
                    config.entity_scope
                ),
            });
        }
        invariants::verify(&corpus)?;
        Ok(Self::from_parts(corpus, config, repository, sink))
    }

    fn from_parts(
        corpus: Corpus,
        config: EngineConfig,
        repository: Arc<dyn ExampleRepository>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            state: RwLock::new(Arc::new(corpus)),
            writer: Mutex::new(()),
            repository,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ===== Write path =====

    /// Insert one example; it starts non-canonical
    ///
    /// # Errors
    ///
    /// `InvalidInput` for blank text or bad entity spans; `Persistence` if
    /// the repository rejects the write.
    pub fn insert(&self, example: NewExample) -> Result<String> {
        match self.execute(Command::Insert { example })? {
            CommandResult::Inserted(id) => Ok(id),
            other => Err(unexpected("insert", &other)),
        }
    }

    /// Insert a batch in order; all or nothing
    ///
    /// # Errors
    ///
    /// `InvalidInput` naming the first invalid batch item; `Persistence` if
    /// the repository rejects the write.
    pub fn bulk_insert(&self, examples: Vec<NewExample>) -> Result<Vec<String>> {
        match self.execute(Command::BulkInsert { examples })? {
            CommandResult::BulkInserted(ids) => Ok(ids),
            other => Err(unexpected("bulk_insert", &other)),
        }
    }

    /// Apply a structural patch
    ///
    /// # Errors
    ///
    /// `ExampleNotFound`, `EditRejected` if the example is canonical,
    /// `InvalidInput` if the patched fields are invalid.
    pub fn update(&self, example_id: &str, patch: ExamplePatch) -> Result<Example> {
        let cmd = Command::Update {
            example_id: example_id.to_string(),
            patch,
        };
        match self.execute(cmd)? {
            CommandResult::Updated(example) => Ok(example),
            other => Err(unexpected("update", &other)),
        }
    }

    /// Delete an example
    ///
    /// # Errors
    ///
    /// `ExampleNotFound`, or `EditRejected` if the example is canonical.
    pub fn delete(&self, example_id: &str) -> Result<()> {
        let cmd = Command::Delete {
            example_id: example_id.to_string(),
        };
        match self.execute(cmd)? {
            CommandResult::Deleted => Ok(()),
            other => Err(unexpected("delete", &other)),
        }
    }

    /// Mark or unmark an example canonical for all of its keys
    ///
    /// Returns the displacement events, one per key taken from a previous
    /// holder. Retrying a successful call returns no events.
    ///
    /// # Errors
    ///
    /// `ExampleNotFound`, `InvalidInput` when marking an example without
    /// keys, `Persistence` if the repository rejects the write.
    pub fn set_canonical(&self, example_id: &str, on: bool) -> Result<Vec<DisplacementEvent>> {
        let cmd = Command::SetCanonical {
            example_id: example_id.to_string(),
            on,
        };
        match self.execute(cmd)? {
            CommandResult::CanonicalSet(events) => Ok(events),
            other => Err(unexpected("set_canonical", &other)),
        }
    }

    /// Mark canonical every example in `ids` that `policy` selects
    ///
    /// The policy sees the corpus as updated by the earlier ids of the same
    /// call, and the whole pass commits as one write.
    ///
    /// Returns the seeded ids and any displacement the marks caused.
    ///
    /// # Errors
    ///
    /// `ExampleNotFound` for an unknown id; the pass is then not committed.
    pub fn seed_canonical(
        &self,
        ids: &[String],
        policy: &dyn CanonicalSeedPolicy,
    ) -> Result<SeedReport> {
        let op = "seed_canonical";
        let request_id = RequestId::new();
        let start = Instant::now();
        log_op_start!(op, request_id = %request_id, batch_len = ids.len());

        let result = self.seed_locked(ids, policy);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                log_op_end!(
                    op,
                    duration_ms = duration_ms,
                    request_id = %request_id,
                    seeded_len = report.seeded.len(),
                    displaced_len = report.displaced.len()
                );
            }
            Err(e) => {
                log_op_error!(op, e.clone(), duration_ms = duration_ms, request_id = %request_id);
            }
        }
        result
    }

    fn seed_locked(&self, ids: &[String], policy: &dyn CanonicalSeedPolicy) -> Result<SeedReport> {
        let _writer = self.lock_writer()?;
        let mut corpus = (*self.snapshot()?).clone();
        let mut changes = ChangeSet::new();
        let mut seeded = Vec::new();
        let mut events = Vec::new();

        for id in ids {
            if !policy.should_seed(&corpus, corpus.get(id)?) {
                continue;
            }
            let (next, outcome) = apply(
                corpus,
                Command::SetCanonical {
                    example_id: id.clone(),
                    on: true,
                },
            )?;
            corpus = next;
            if let CommandResult::CanonicalSet(e) = outcome.result {
                events.extend(e);
            }
            changes.merge(outcome.changes);
            seeded.push(id.clone());
        }

        self.commit(corpus, &changes)?;
        self.fan_out(&events);
        Ok(SeedReport {
            seeded,
            displaced: events,
        })
    }

    fn execute(&self, cmd: Command) -> Result<CommandResult> {
        let op = cmd.op_name();
        let request_id = RequestId::new();
        let start = Instant::now();
        log_op_start!(
            op,
            request_id = %request_id,
            example_id = cmd.example_id().unwrap_or("-")
        );

        let result = self.execute_locked(cmd);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(CommandResult::CanonicalSet(events)) => {
                log_op_end!(op, duration_ms = duration_ms, request_id = %request_id, displaced_len = events.len());
            }
            Ok(_) => {
                log_op_end!(op, duration_ms = duration_ms, request_id = %request_id);
            }
            Err(e) => {
                log_op_error!(op, e.clone(), duration_ms = duration_ms, request_id = %request_id);
            }
        }
        result
    }

    fn execute_locked(&self, cmd: Command) -> Result<CommandResult> {
        let _writer = self.lock_writer()?;
        let current = self.snapshot()?;

        let (next, outcome) = apply((*current).clone(), cmd)?;
        self.commit(next, &outcome.changes)?;

        if let CommandResult::CanonicalSet(events) = &outcome.result {
            self.fan_out(events);
        }
        Ok(outcome.result)
    }

    /// Verify, persist, publish. Caller holds the writer lock.
    fn commit(&self, next: Corpus, changes: &ChangeSet) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        if self.config.verify_invariants_on_commit {
            invariants::verify_changes(&next, changes)?;
        }
        self.repository
            .commit(changes)
            .map_err(|e| CanonError::Persistence {
                message: e.to_string(),
            })?;

        let mut state = self.state.write().map_err(|_| poisoned("state"))?;
        *state = Arc::new(next);
        Ok(())
    }

    fn fan_out(&self, events: &[DisplacementEvent]) {
        for event in events {
            if let Err(e) = self.sink.notify(event) {
                tracing::warn!(
                    component = module_path!(),
                    op = "notify",
                    displaced_id = %event.displaced_id,
                    err_code = e.code(),
                    "Displacement notification failed: {}",
                    e
                );
            }
        }
    }

    fn lock_writer(&self) -> Result<MutexGuard<'_, ()>> {
        self.writer.lock().map_err(|_| poisoned("writer"))
    }

    // ===== Read path =====

    /// The most recently committed corpus
    ///
    /// # Errors
    ///
    /// `Concurrency` if the state lock is poisoned.
    pub fn snapshot(&self) -> Result<Arc<Corpus>> {
        self.state
            .read()
            .map(|state| Arc::clone(&state))
            .map_err(|_| poisoned("state"))
    }

    /// # Errors
    ///
    /// `ExampleNotFound` if no example has this id.
    pub fn get(&self, example_id: &str) -> Result<Example> {
        self.snapshot()?.get(example_id).cloned()
    }

    /// # Errors
    ///
    /// `Concurrency` if the state lock is poisoned.
    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Example>> {
        let snapshot = self.snapshot()?;
        Ok(QueryFacade::new(&snapshot)
            .list(filter)
            .into_iter()
            .cloned()
            .collect())
    }

    /// # Errors
    ///
    /// `Concurrency` if the state lock is poisoned.
    pub fn list_by_grouping_key(&self, key: &GroupingKey) -> Result<KeyMembers> {
        let snapshot = self.snapshot()?;
        let group = QueryFacade::new(&snapshot).list_by_grouping_key(key);
        Ok(KeyMembers {
            key: group.key,
            holder: group.holder.map(str::to_string),
            examples: group.examples.into_iter().cloned().collect(),
        })
    }

    /// # Errors
    ///
    /// `Concurrency` if the state lock is poisoned.
    pub fn canonical_holders(&self) -> Result<Vec<(GroupingKey, String)>> {
        Ok(QueryFacade::new(&*self.snapshot()?).canonical_holders())
    }

    /// # Errors
    ///
    /// `ExampleNotFound` if no example has this id.
    pub fn view(&self, example_id: &str) -> Result<ExampleView> {
        ExampleView::for_example(&*self.snapshot()?, example_id)
    }

    /// Re-check the whole committed corpus
    ///
    /// # Errors
    ///
    /// `InvariantViolation` describing the first violation found.
    pub fn verify(&self) -> Result<()> {
        invariants::verify(&*self.snapshot()?)
    }
}

fn poisoned(lock: &str) -> CanonError {
    CanonError::Concurrency {
        message: format!("{} lock poisoned", lock),
    }
}

fn unexpected(op: &str, result: &CommandResult) -> CanonError {
    CanonError::Internal {
        message: format!("{} produced {:?}", op, result),
    }
}
