//! Operation logging macros
//!
//! One event per operation boundary. Each carries `component` (the calling
//! module), `op` and an `event` name from `canonex_core_types::schema`;
//! extra `tracing` fields may follow.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)+)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::canonex_core_types::schema::$event,
            $($($field)+)?
        )
    };
}

/// Operation entered
///
/// ```
/// # use canonex_core::log_op_start;
/// log_op_start!("set_canonical");
/// log_op_start!("set_canonical", example_id = "ex-1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        $crate::__log_op_event!(info, $op, EVENT_START $(, $($field)+)?)
    };
}

/// Operation finished; `duration_ms` is mandatory
///
/// ```
/// # use canonex_core::log_op_end;
/// log_op_end!("set_canonical", duration_ms = 3, displaced_len = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        $crate::__log_op_event!(info, $op, EVENT_END, duration_ms = $duration $(, $($field)+)?)
    };
}

/// Operation failed
///
/// The error is anything convertible into `ExError`; its kind and stable
/// code are logged as `err_kind` / `err_code`.
///
/// ```
/// # use canonex_core::{log_op_error, CanonError};
/// let err = CanonError::ExampleNotFound { example_id: "ex-1".to_string() };
/// log_op_error!("get", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code()
            $(, $($field)+)?
        )
    }};
}
