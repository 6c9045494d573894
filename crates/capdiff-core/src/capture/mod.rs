//! Capture comparison.
//!
//! A capture bundles the responses of every API endpoint a crawler visited.
//! Two captures are compared by pairing endpoints on their URL path and
//! running the structural [`compare`](crate::diff::compare) on each pair of
//! `response` bodies.
//!
//! ```
//! use capdiff_core::capture::{compare_capture_bytes, CaptureClassification};
//! use capdiff_core::config::ComparisonConfig;
//!
//! let old = br#"{"api_responses": [{"url": "https://h/api/sites", "response": {"n": 1}}]}"#;
//! let new = br#"{"api_responses": [{"url": "https://h/api/sites?v=2", "response": {"n": 0}}]}"#;
//! let result = compare_capture_bytes(old, new, &ComparisonConfig::default()).unwrap();
//!
//! assert_eq!(result.classification, CaptureClassification::Changed);
//! assert_eq!(result.totals.critical, 1);
//! ```

pub mod compare;
pub mod envelope;
pub mod summary;

pub use compare::{
    capture_digest, compare_capture_bytes, compare_captures, compare_captures_with_context,
    CaptureClassification, CaptureComparison, CaptureIdentity, EndpointComparison,
    EndpointStatus,
};
pub use envelope::{endpoint_key, parse_capture, ApiResponse, CaptureDocument, CaptureMetadata};
pub use summary::render_capture_summary;
