//! Endpoint-by-endpoint comparison of two captures.

use crate::capture::envelope::{parse_capture, CaptureDocument};
use crate::config::ComparisonConfig;
use crate::diff::engine::walk_documents;
use crate::diff::model::{ComparisonReport, Severity};
use crate::diff::stats::Statistics;
use crate::errors::{CapdiffError, ExError, ExErrorKind};
use crate::{log_op_end, log_op_error, log_op_start};
use capdiff_core_types::RequestContext;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EndpointStatus {
    Compared,
    MissingInNew,
    AddedInNew,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointComparison {
    pub endpoint: String,
    pub status: EndpointStatus,
    /// Highest severity for this endpoint; `None` when nothing changed.
    pub severity: Option<Severity>,
    /// Empty unless `status` is `Compared`.
    pub report: ComparisonReport,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaptureClassification {
    /// Both captures serialize to the same bytes.
    Identical,
    /// Same endpoints, no differences outside ignored fields.
    NoChange,
    Changed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureIdentity {
    pub old_digest: String,
    pub new_digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_capture_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_capture_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureComparison {
    pub identity: CaptureIdentity,
    pub classification: CaptureClassification,
    pub severity: Option<Severity>,
    /// One entry per endpoint key, in key order.
    pub endpoints: Vec<EndpointComparison>,
    /// Statistics of all compared endpoints merged.
    pub totals: Statistics,
}

impl CaptureComparison {
    pub fn missing_endpoints(&self) -> impl Iterator<Item = &str> {
        self.with_status(EndpointStatus::MissingInNew)
    }

    pub fn added_endpoints(&self) -> impl Iterator<Item = &str> {
        self.with_status(EndpointStatus::AddedInNew)
    }

    pub fn changed_endpoints(&self) -> impl Iterator<Item = &EndpointComparison> {
        self.endpoints
            .iter()
            .filter(|e| e.status == EndpointStatus::Compared && !e.report.is_empty())
    }

    pub fn endpoint(&self, key: &str) -> Option<&EndpointComparison> {
        self.endpoints.iter().find(|e| e.endpoint == key)
    }

    fn with_status(&self, status: EndpointStatus) -> impl Iterator<Item = &str> {
        self.endpoints
            .iter()
            .filter(move |e| e.status == status)
            .map(|e| e.endpoint.as_str())
    }
}

/// SHA-256 (hex) of the capture's canonical JSON encoding.
///
/// Object keys serialize in sorted order, so key order in the source file does
/// not affect the digest.
///
/// # Errors
///
/// `Serialization` if the capture cannot be encoded.
pub fn capture_digest(capture: &CaptureDocument) -> Result<String, ExError> {
    let bytes = serde_json::to_vec(capture).map_err(|e| {
        ExError::from(CapdiffError::Serialization {
            message: e.to_string(),
        })
        .with_op("capture_digest")
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Compare two captures endpoint by endpoint.
///
/// Endpoints are paired by [`endpoint_key`](crate::capture::endpoint_key).
/// An endpoint missing from `new` is CRITICAL; one only in `new` is MINOR.
///
/// # Errors
///
/// - `Serialization` when a capture cannot be digested
/// - `DeterminismViolation` when the result fails its round-trip check
pub fn compare_captures(
    old: &CaptureDocument,
    new: &CaptureDocument,
    config: &ComparisonConfig,
) -> Result<CaptureComparison, ExError> {
    compare_captures_with_context(old, new, config, &RequestContext::new())
}

/// [`compare_captures`] with caller-supplied correlation ids, which are
/// attached to log events and errors.
///
/// # Errors
///
/// As [`compare_captures`].
pub fn compare_captures_with_context(
    old: &CaptureDocument,
    new: &CaptureDocument,
    config: &ComparisonConfig,
    ctx: &RequestContext,
) -> Result<CaptureComparison, ExError> {
    log_op_start!(
        "compare_captures",
        request_id = ctx.request_id.as_str(),
        trace_id = ctx.trace_str(),
        old_endpoints = old.api_responses.len(),
        new_endpoints = new.api_responses.len()
    );
    let start = std::time::Instant::now();

    match build_comparison(old, new, config) {
        Ok(comparison) => {
            log_op_end!(
                "compare_captures",
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = ctx.request_id.as_str(),
                classification = ?comparison.classification,
                endpoints = comparison.endpoints.len(),
                differences = comparison.totals.differences,
                critical = comparison.totals.critical
            );
            Ok(comparison)
        }
        Err(e) => {
            let mut e = e.with_request_id(ctx.request_id.clone());
            if let Some(trace_id) = &ctx.trace_id {
                e = e.with_trace_id(trace_id.clone());
            }
            log_op_error!(
                "compare_captures",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = ctx.request_id.as_str()
            );
            Err(e)
        }
    }
}

/// Decode both capture files and compare them.
///
/// # Errors
///
/// Decoding errors from [`parse_capture`], then as [`compare_captures`].
pub fn compare_capture_bytes(
    old_bytes: &[u8],
    new_bytes: &[u8],
    config: &ComparisonConfig,
) -> Result<CaptureComparison, ExError> {
    let old = parse_capture(old_bytes).map_err(|e| label_side(e, "old capture"))?;
    let new = parse_capture(new_bytes).map_err(|e| label_side(e, "new capture"))?;
    compare_captures(&old, &new, config)
}

fn label_side(err: ExError, side: &str) -> ExError {
    let message = format!("{}: {}", side, err.message());
    err.with_message(message)
}

fn build_comparison(
    old: &CaptureDocument,
    new: &CaptureDocument,
    config: &ComparisonConfig,
) -> Result<CaptureComparison, ExError> {
    let identity = CaptureIdentity {
        old_digest: capture_digest(old)?,
        new_digest: capture_digest(new)?,
        old_capture_time: old.metadata.capture_time.clone(),
        new_capture_time: new.metadata.capture_time.clone(),
        base_url: new
            .metadata
            .base_url
            .clone()
            .or_else(|| old.metadata.base_url.clone()),
    };

    let old_index = old.index_endpoints();
    let new_index = new.index_endpoints();
    let keys: BTreeSet<&String> = old_index.keys().chain(new_index.keys()).collect();

    let mut endpoints = Vec::with_capacity(keys.len());
    let mut totals = Statistics::default();

    for key in keys {
        let entry = match (old_index.get(key), new_index.get(key)) {
            (Some(o), Some(n)) => {
                let report = walk_documents(&o.response, &n.response, config);
                tracing::debug!(
                    component = module_path!(),
                    endpoint = key.as_str(),
                    differences = report.stats.differences,
                    "endpoint compared"
                );
                totals.merge(&report.stats);
                EndpointComparison {
                    endpoint: key.clone(),
                    status: EndpointStatus::Compared,
                    severity: report.max_severity(),
                    report,
                }
            }
            (Some(_), None) => EndpointComparison {
                endpoint: key.clone(),
                status: EndpointStatus::MissingInNew,
                severity: Some(Severity::Critical),
                report: ComparisonReport::default(),
            },
            (None, Some(_)) => EndpointComparison {
                endpoint: key.clone(),
                status: EndpointStatus::AddedInNew,
                severity: Some(Severity::Minor),
                report: ComparisonReport::default(),
            },
            (None, None) => continue,
        };
        endpoints.push(entry);
    }

    let severity = endpoints.iter().filter_map(|e| e.severity).max();
    let classification = if identity.old_digest == identity.new_digest {
        CaptureClassification::Identical
    } else if severity.is_none() {
        CaptureClassification::NoChange
    } else {
        CaptureClassification::Changed
    };

    let comparison = CaptureComparison {
        identity,
        classification,
        severity,
        endpoints,
        totals,
    };
    ensure_round_trip(&comparison)?;
    Ok(comparison)
}

fn ensure_round_trip(comparison: &CaptureComparison) -> Result<(), ExError> {
    let violation = |message: String| {
        ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compare_captures")
            .with_message(message)
    };
    let serialized = serde_json::to_string(comparison)
        .map_err(|e| violation(format!("failed to serialize comparison: {}", e)))?;
    let reparsed: CaptureComparison = serde_json::from_str(&serialized)
        .map_err(|e| violation(format!("failed to re-parse comparison: {}", e)))?;
    if &reparsed != comparison {
        return Err(round_trip_mismatch(comparison, &reparsed));
    }
    Ok(())
}

/// Violation for a comparison whose re-parsed form differs, tagged with the
/// first endpoint that did not survive the round trip.
fn round_trip_mismatch(original: &CaptureComparison, reparsed: &CaptureComparison) -> ExError {
    let err = ExError::new(ExErrorKind::DeterminismViolation).with_op("compare_captures");
    let drifted = original
        .endpoints
        .iter()
        .zip(reparsed.endpoints.iter())
        .find(|(a, b)| a != b)
        .map(|(a, _)| a.endpoint.as_str());
    match drifted {
        Some(endpoint) => err
            .with_endpoint(endpoint)
            .with_message("endpoint report is not deterministic: round-trip produced a different value"),
        None => err.with_message(
            "comparison is not deterministic: round-trip produced a different value",
        ),
    }
}
