//! Structured logging schema
//!
//! The `log_op_*` macros and the tracing sink emit `op` and `event` fields;
//! the test capture layer reads them back through these names.

pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

// Values of the `event` field
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_DISPLACEMENT: &str = "displacement";
