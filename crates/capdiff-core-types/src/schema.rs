//! Canonical schema constants for structured logging and events
//!
//! These constants keep log fields consistent between the comparison
//! engine, the capture layer and test assertions.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Comparison locations
pub const FIELD_PATH: &str = "path";
pub const FIELD_ENDPOINT: &str = "endpoint";
pub const FIELD_DEPTH: &str = "depth";

// Comparison counters
pub const FIELD_DIFFERENCES: &str = "differences";
pub const FIELD_CRITICAL: &str = "critical";
pub const FIELD_MAJOR: &str = "major";
pub const FIELD_MINOR: &str = "minor";
pub const FIELD_IGNORED: &str = "ignored_field_hits";
pub const FIELD_TRUNCATED: &str = "truncated_subtrees";
pub const FIELD_ENDPOINTS: &str = "endpoints";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
