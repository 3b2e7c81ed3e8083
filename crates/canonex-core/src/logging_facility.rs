//! Structured logging
//!
//! [`init`] installs the process subscriber once, at binary startup. Library
//! code only emits events, through the `log_op_*` macros so every operation
//! boundary has the same shape. Tests assert on events with
//! [`init_test_capture`].
//!
//! ```rust
//! use canonex_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
