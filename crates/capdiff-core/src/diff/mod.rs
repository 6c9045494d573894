//! JSON comparison engine.
//!
//! Walks two arbitrarily nested JSON documents and produces a flat, ordered
//! list of path-addressed, severity-classified differences plus statistics.
//!
//! ## Entry point
//!
//! ```
//! use capdiff_core::config::ComparisonConfig;
//! use capdiff_core::diff::{compare, DifferenceKind, Severity};
//! use serde_json::json;
//!
//! let old = json!({"sites": {"Site657": {"total_assets": 1}}});
//! let new = json!({"sites": {"Site657": {"total_assets": 0}}});
//! let report = compare(&old, &new, &ComparisonConfig::default());
//!
//! assert_eq!(report.differences[0].path, "sites.Site657.total_assets");
//! assert_eq!(report.differences[0].kind, DifferenceKind::CriticalDataLoss);
//! assert_eq!(report.differences[0].severity, Severity::Critical);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical reports; object keys
//!   are visited in sorted order and keyed list pairings in key order.
//! - **Totality**: the walk never fails on parsed JSON; depth and budget
//!   limits degrade into statistics instead of errors.
//! - **No shared state**: every call owns its working set, so independent
//!   pairs may be compared from several threads at once.

pub mod classify;
pub mod engine;
pub mod human_summary;
pub mod matcher;
pub mod model;
pub mod path;
pub mod stats;

pub use engine::{compare, compare_documents, parse_document};
pub use human_summary::render_human_summary;
pub use matcher::{match_arrays, ArrayMatch, MatchStrategy, PairResult};
pub use model::{ComparisonReport, Difference, DifferenceKind, Severity};
pub use stats::Statistics;
