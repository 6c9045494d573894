//! Operation boundary macros
//!
//! Every public operation logs exactly one `start` and one `end` (or
//! `end_error`) event, tagged with the emitting module and the operation name.
//! Extra `key = value` fields may follow; document values must never be
//! passed, only paths and counters.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use capdiff_core::log_op_start;
/// log_op_start!("compare");
/// log_op_start!("compare_captures", endpoints = 12);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = capdiff_core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation; `duration_ms` is mandatory
///
/// # Example
///
/// ```
/// # use capdiff_core::log_op_end;
/// log_op_end!("compare", duration_ms = 42);
/// log_op_end!("compare", duration_ms = 42, differences = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = capdiff_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log a failed operation with its error kind and stable code
///
/// `$err` may be anything convertible into [`ExError`](crate::errors::ExError).
///
/// # Example
///
/// ```
/// # use capdiff_core::log_op_error;
/// # use capdiff_core::errors::CapdiffError;
/// let err = CapdiffError::InvalidConfig { reason: "max_depth is zero".to_string() };
/// log_op_error!("load_config", err, duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = capdiff_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($($field)*)?
        )
    }};
}
