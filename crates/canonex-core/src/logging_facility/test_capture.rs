//! Capture of log events for test assertions
//!
//! The capture layer becomes the process-global subscriber the first time
//! [`init_test_capture`] runs. Tests in one binary share the buffer, so
//! lookups should key on something unique to the test (an op name, an id).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use canonex_core_types::schema::{FIELD_EVENT, FIELD_OP};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// One recorded event, every field rendered to a string
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    /// The schema event name (`start`, `end`, `end_error`, ...)
    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }
}

struct Fields<'a>(&'a mut BTreeMap<String, String>);

impl Visit for Fields<'_> {
    // Display-wrapped values (`%x`) arrive here too and print without quotes
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

struct CaptureLayer(Buffer);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        event.record(&mut Fields(&mut fields));

        if let Ok(mut buffer) = self.0.lock() {
            buffer.push(CapturedEvent {
                level: *event.metadata().level(),
                fields,
            });
        }
    }
}

/// Shared handle on the captured events
#[derive(Clone)]
pub struct TestCapture(Buffer);

impl TestCapture {
    /// Snapshot of everything captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// First event with this op and event name
    pub fn find(&self, op: &str, event: &str) -> Option<CapturedEvent> {
        self.events().into_iter().find(|e| e.is(op, event))
    }

    /// First event satisfying `predicate`
    pub fn find_where<F>(&self, predicate: F) -> Option<CapturedEvent>
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().into_iter().find(|e| predicate(e))
    }

    /// # Panics
    ///
    /// Panics if no event with this op and event name was captured.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        assert!(
            self.find(op, event).is_some(),
            "no {} event for op {} among {} captured events",
            event,
            op,
            self.events().len()
        );
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    pub fn clear(&self) {
        if let Ok(mut buffer) = self.0.lock() {
            buffer.clear();
        }
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer (once) and return a handle on its buffer
///
/// ```
/// use canonex_core::logging_facility::test_capture::init_test_capture;
/// use canonex_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op");
/// capture.assert_event_exists("doc_capture_op", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let buffer = Buffer::default();
            let _ = tracing_subscriber::registry()
                .with(CaptureLayer(buffer.clone()))
                .try_init();
            TestCapture(buffer)
        })
        .clone()
}
