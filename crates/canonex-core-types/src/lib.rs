//! Core types shared across the canonex crates
//!
//! - **Correlation ids**: RequestId
//! - **Schema constants**: field keys and event names used by the logging
//!   macros, the tracing sink and the test capture layer

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
