//! Capture envelope decoding and endpoint keys.
//!
//! A capture is the JSON file produced by the crawler:
//!
//! ```json
//! {
//!   "metadata": {"capture_time": "...", "base_url": "...", "total_api_responses": 2},
//!   "api_responses": [{"url": "https://host/api/sites", "response": {}}]
//! }
//! ```

use crate::diff::engine::parse_document;
use crate::errors::{CapdiffError, ExError};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaptureMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_api_responses: Option<u64>,
    /// Keys the crawler adds that the comparison does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CaptureMetadata {
    /// `capture_time` as a timestamp.
    ///
    /// Accepts RFC 3339 and the offset-less ISO 8601 form (`2024-01-02T03:04:05.123456`),
    /// which is read as UTC. Returns `None` when absent or unparseable.
    pub fn captured_at(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.capture_time.as_deref()?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts);
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub url: String,
    #[serde(default)]
    pub response: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaptureDocument {
    #[serde(default)]
    pub metadata: CaptureMetadata,
    pub api_responses: Vec<ApiResponse>,
}

impl CaptureDocument {
    /// Responses keyed by [`endpoint_key`], in key order.
    ///
    /// The n-th repeat of the same path is keyed `path#n` (n starting at 2) so
    /// that paginated or re-fetched endpoints are still paired in order.
    pub fn index_endpoints(&self) -> BTreeMap<String, &ApiResponse> {
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        let mut indexed = BTreeMap::new();
        for entry in &self.api_responses {
            let base = endpoint_key(&entry.url);
            let n = seen.entry(base.clone()).or_insert(0);
            *n += 1;
            let key = if *n == 1 {
                base
            } else {
                format!("{}#{}", base, n)
            };
            indexed.insert(key, entry);
        }
        indexed
    }
}

/// The URL path used to pair endpoints across captures.
///
/// Drops scheme, host, query string and fragment, and a trailing slash.
///
/// ```
/// use capdiff_core::capture::endpoint_key;
///
/// assert_eq!(endpoint_key("https://bank.example/api/sites/?page=2"), "/api/sites");
/// assert_eq!(endpoint_key("api/sites#top"), "/api/sites");
/// ```
pub fn endpoint_key(url: &str) -> String {
    let without_scheme = match url.find("://") {
        Some(i) => {
            let rest = &url[i + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "/",
            }
        }
        None => url,
    };

    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn invalid(reason: impl Into<String>) -> ExError {
    ExError::from(CapdiffError::InvalidCapture {
        reason: reason.into(),
    })
    .with_op("parse_capture")
}

/// Decode and validate a capture file.
///
/// # Errors
///
/// - `InvalidDocument` when the bytes are not UTF-8 JSON
/// - `InvalidCapture` when the root is not an object, `api_responses` is
///   missing or not an array, or an entry lacks a string `url`
pub fn parse_capture(bytes: &[u8]) -> Result<CaptureDocument, ExError> {
    let value = parse_document(bytes, "capture")?;

    let Value::Object(root) = &value else {
        return Err(invalid("capture root must be an object"));
    };
    let Some(entries) = root.get("api_responses") else {
        return Err(invalid("missing api_responses").with_path("api_responses"));
    };
    let Value::Array(entries) = entries else {
        return Err(invalid("api_responses must be an array").with_path("api_responses"));
    };
    for (i, entry) in entries.iter().enumerate() {
        if !matches!(entry.get("url"), Some(Value::String(_))) {
            return Err(invalid("entry has no string url")
                .with_path(format!("api_responses[{}]", i)));
        }
    }

    let capture: CaptureDocument =
        serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;

    if let Some(declared) = capture.metadata.total_api_responses {
        let actual = capture.api_responses.len() as u64;
        if declared != actual {
            tracing::warn!(
                component = module_path!(),
                declared,
                actual,
                "total_api_responses does not match api_responses length"
            );
        }
    }

    Ok(capture)
}
