//! capdiff core - structural comparison of JSON API captures
//!
//! This crate compares two JSON documents and reports what changed, including:
//! - A total, recursive diff engine with path-addressed differences
//! - Identity-aware list matching (`id`, then `name`, then position)
//! - Business-rule severity classification (CRITICAL / MAJOR / MINOR)
//! - Noise suppression and critical-field escalation via [`ComparisonConfig`]
//! - Endpoint-by-endpoint comparison of whole crawler captures
//! - Markdown summaries for review

pub mod capture;
pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;

// Re-export commonly used types
pub use capture::{
    compare_captures, parse_capture, render_capture_summary, CaptureClassification,
    CaptureComparison, CaptureDocument,
};
pub use config::ComparisonConfig;
pub use diff::{
    compare, compare_documents, render_human_summary, ComparisonReport, Difference,
    DifferenceKind, Severity, Statistics,
};
pub use errors::{CapdiffError, ExError, ExErrorKind, Result};
