#![allow(clippy::unwrap_used, clippy::expect_used)]

use capdiff_core::capture::{
    compare_capture_bytes, compare_captures, compare_captures_with_context, parse_capture,
    render_capture_summary, CaptureClassification, EndpointStatus,
};
use capdiff_core::config::ComparisonConfig;
use capdiff_core::diff::{DifferenceKind, Severity};
use capdiff_core_types::{RequestContext, RequestId};
use serde_json::json;

fn old_capture() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "metadata": {
            "capture_time": "2024-01-01T09:00:00.000000",
            "base_url": "https://bank.example",
            "total_api_responses": 3
        },
        "api_responses": [
            {"url": "https://bank.example/api/sites", "response": {
                "sites": [
                    {"name": "North", "total_assets": 2535, "users": 4},
                    {"name": "South", "total_assets": 1, "users": 9}
                ],
                "generated_at": "2024-01-01T09:00:00Z"
            }},
            {"url": "https://bank.example/api/profile?session=abc", "response": {"user": "pat", "role": "admin"}},
            {"url": "https://bank.example/api/legacy", "response": {"enabled": true}}
        ]
    }))
    .unwrap()
}

fn new_capture() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "metadata": {
            "capture_time": "2024-06-01T09:00:00.000000",
            "base_url": "https://bank.example",
            "total_api_responses": 3
        },
        "api_responses": [
            {"url": "https://bank.example/api/sites", "response": {
                "sites": [
                    {"name": "South", "total_assets": 0, "users": 9},
                    {"name": "North", "total_assets": 1048, "users": 4}
                ],
                "generated_at": "2024-06-01T09:00:00Z"
            }},
            {"url": "https://bank.example/api/profile?session=xyz", "response": {"user": "pat", "role": "admin"}},
            {"url": "https://bank.example/api/reports", "response": []}
        ]
    }))
    .unwrap()
}

fn config() -> ComparisonConfig {
    ComparisonConfig::default().with_ignored_fields(["generated_at"])
}

#[test]
fn test_endpoints_are_paired_by_path() {
    let result = compare_capture_bytes(&old_capture(), &new_capture(), &config()).unwrap();

    let keys: Vec<&str> = result.endpoints.iter().map(|e| e.endpoint.as_str()).collect();
    assert_eq!(
        keys,
        vec!["/api/legacy", "/api/profile", "/api/reports", "/api/sites"]
    );

    let profile = result.endpoint("/api/profile").unwrap();
    assert_eq!(profile.status, EndpointStatus::Compared);
    assert!(profile.report.is_empty());
    assert_eq!(profile.severity, None);
}

#[test]
fn test_site_changes_are_classified() {
    let result = compare_capture_bytes(&old_capture(), &new_capture(), &config()).unwrap();

    let sites = result.endpoint("/api/sites").unwrap();
    let report = &sites.report;
    assert_eq!(
        report.paths(),
        vec!["sites[name=North].total_assets", "sites[name=South].total_assets"]
    );
    assert_eq!(report.differences[0].kind, DifferenceKind::ValueChanged);
    assert_eq!(report.differences[0].severity, Severity::Major);
    assert_eq!(report.differences[1].kind, DifferenceKind::CriticalDataLoss);
    assert_eq!(report.stats.ignored_field_hits, 1);
    assert_eq!(sites.severity, Some(Severity::Critical));
}

#[test]
fn test_missing_and_new_endpoints() {
    let result = compare_capture_bytes(&old_capture(), &new_capture(), &config()).unwrap();

    assert_eq!(result.classification, CaptureClassification::Changed);
    assert_eq!(result.severity, Some(Severity::Critical));
    assert_eq!(result.missing_endpoints().collect::<Vec<_>>(), vec!["/api/legacy"]);
    assert_eq!(result.added_endpoints().collect::<Vec<_>>(), vec!["/api/reports"]);
    assert_eq!(result.changed_endpoints().count(), 1);
}

#[test]
fn test_totals_fold_endpoint_statistics() {
    let result = compare_capture_bytes(&old_capture(), &new_capture(), &config()).unwrap();

    assert_eq!(result.totals.differences, 2);
    assert_eq!(result.totals.critical, 1);
    assert_eq!(result.totals.major, 1);
    assert_eq!(result.totals.ignored_field_hits, 1);
    assert!(result.totals.is_consistent());
}

#[test]
fn test_identity_carries_digests_and_times() {
    let result = compare_capture_bytes(&old_capture(), &new_capture(), &config()).unwrap();

    let identity = &result.identity;
    assert_ne!(identity.old_digest, identity.new_digest);
    assert!(identity.old_digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(
        identity.old_capture_time.as_deref(),
        Some("2024-01-01T09:00:00.000000")
    );
    assert_eq!(identity.base_url.as_deref(), Some("https://bank.example"));
}

#[test]
fn test_same_capture_is_identical() {
    let bytes = old_capture();
    let result = compare_capture_bytes(&bytes, &bytes, &config()).unwrap();
    assert_eq!(result.classification, CaptureClassification::Identical);
    assert!(result.endpoints.iter().all(|e| e.severity.is_none()));
}

#[test]
fn test_recapture_with_only_noise_is_no_change() {
    let old = parse_capture(&old_capture()).unwrap();
    let mut new = old.clone();
    new.metadata.capture_time = Some("2024-01-02T09:00:00.000000".to_string());
    new.api_responses[0].response["generated_at"] = json!("2024-01-02T09:00:00Z");

    let result = compare_captures(&old, &new, &config()).unwrap();

    assert_eq!(result.classification, CaptureClassification::NoChange);
    assert_eq!(result.totals.ignored_field_hits, 1);
}

#[test]
fn test_result_is_deterministic() {
    let first = compare_capture_bytes(&old_capture(), &new_capture(), &config()).unwrap();
    let second = compare_capture_bytes(&old_capture(), &new_capture(), &config()).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_context_ids_do_not_change_result() {
    let old = parse_capture(&old_capture()).unwrap();
    let new = parse_capture(&new_capture()).unwrap();
    let ctx = RequestContext::with_request_id(RequestId::from_string("req-capture-1".to_string()));

    let with_ctx = compare_captures_with_context(&old, &new, &config(), &ctx).unwrap();
    let without = compare_captures(&old, &new, &config()).unwrap();
    assert_eq!(with_ctx, without);
}

#[test]
fn test_summary_renders_all_sections() {
    let result = compare_capture_bytes(&old_capture(), &new_capture(), &config()).unwrap();
    let text = render_capture_summary(&result);

    assert!(text.starts_with("## Capture Comparison"));
    assert!(text.contains("### Missing Endpoints (1)"));
    assert!(text.contains("### New Endpoints (1)"));
    assert!(text.contains("### `/api/sites`"));
    assert!(text.contains("- `critical_data_loss` sites[name=South].total_assets: dropped from 1 to 0"));
    assert!(!text.contains("### `/api/profile`"));
}
