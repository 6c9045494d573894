//! Structured logging for capdiff
//!
//! - [`init`] installs the process-wide subscriber once, per [`Profile`]
//! - `log_op_start!` / `log_op_end!` / `log_op_error!` mark operation
//!   boundaries with the canonical `component`, `op` and `event` fields
//! - [`test_capture`] records events in memory for assertions
//!
//! Only paths, counters and correlation ids are logged, never document
//! values.
//!
//! ```rust
//! use capdiff_core::logging_facility::{init, Profile};
//!
//! init(Profile::Production);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
