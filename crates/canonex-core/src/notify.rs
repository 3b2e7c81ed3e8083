//! Displacement notification sinks
//!
//! Sinks are told about each displacement after the write that caused it
//! has been committed. Delivery is best-effort: a sink error is logged and
//! never undoes the commit.

use std::sync::{Arc, Mutex};

use canonex_core_types::schema::EVENT_DISPLACEMENT;

use crate::errors::{ExError, ExErrorKind};
use crate::model::DisplacementEvent;

/// Receiver of displacement events
pub trait NotificationSink: Send + Sync {
    /// Deliver one event; must not block on slow I/O
    ///
    /// # Errors
    ///
    /// Implementations return an `ExError` when delivery failed; the store
    /// logs it and carries on.
    #[allow(clippy::result_large_err)]
    fn notify(&self, event: &DisplacementEvent) -> std::result::Result<(), ExError>;
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn notify(&self, _event: &DisplacementEvent) -> std::result::Result<(), ExError> {
        Ok(())
    }
}

/// Emits each event as a structured `tracing` record
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, event: &DisplacementEvent) -> std::result::Result<(), ExError> {
        tracing::info!(
            component = module_path!(),
            event = EVENT_DISPLACEMENT,
            displaced_id = %event.displaced_id,
            displaced_by = %event.displaced_by,
            shared_key = %event.shared_key,
            message = %event.message(),
        );
        Ok(())
    }
}

/// Keeps events in memory until drained
///
/// Suitable for tests and for presentation layers that poll for transient
/// notifications.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    events: Arc<Mutex<Vec<DisplacementEvent>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected events
    pub fn events(&self) -> Vec<DisplacementEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Take and clear the collected events
    pub fn drain(&self) -> Vec<DisplacementEvent> {
        self.events
            .lock()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, event: &DisplacementEvent) -> std::result::Result<(), ExError> {
        let mut events = self.events.lock().map_err(|_| {
            ExError::new(ExErrorKind::Concurrency)
                .with_op("notify")
                .with_message("notification buffer lock poisoned")
        })?;
        events.push(event.clone());
        Ok(())
    }
}
