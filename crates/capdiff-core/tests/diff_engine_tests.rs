#![allow(clippy::unwrap_used, clippy::expect_used)]

use capdiff_core::config::ComparisonConfig;
use capdiff_core::diff::{compare, compare_documents, DifferenceKind, Severity};
use capdiff_core::errors::ExErrorKind;
use serde_json::json;

fn defaults() -> ComparisonConfig {
    ComparisonConfig::default()
}

#[test]
fn test_scenario_nested_drop_to_zero_is_critical() {
    let old = json!({"sites": {"Site657": {"total_assets": 1}}});
    let new = json!({"sites": {"Site657": {"total_assets": 0}}});

    let report = compare(&old, &new, &defaults());

    assert_eq!(report.differences.len(), 1);
    let d = &report.differences[0];
    assert_eq!(d.path, "sites.Site657.total_assets");
    assert_eq!(d.kind, DifferenceKind::CriticalDataLoss);
    assert_eq!(d.severity, Severity::Critical);
    assert_eq!(d.old_value, Some(json!(1)));
    assert_eq!(d.new_value, Some(json!(0)));
}

#[test]
fn test_scenario_large_relative_drop_is_major() {
    let report = compare(
        &json!({"total_assets": 2535}),
        &json!({"total_assets": 1048}),
        &defaults(),
    );

    assert_eq!(report.differences.len(), 1);
    let d = &report.differences[0];
    assert_eq!(d.path, "total_assets");
    assert_eq!(d.kind, DifferenceKind::ValueChanged);
    assert_eq!(d.severity, Severity::Major);
}

#[test]
fn test_scenario_list_element_added_by_id() {
    let old = json!({"items": [{"id": 1, "name": "A"}]});
    let new = json!({"items": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]});

    let report = compare(&old, &new, &defaults());

    assert_eq!(report.differences.len(), 1);
    let d = &report.differences[0];
    assert_eq!(d.path, "items[id=2]");
    assert_eq!(d.kind, DifferenceKind::ListElementAdded);
    assert_eq!(d.severity, Severity::Minor);
}

#[test]
fn test_scenario_ignored_timestamp_is_noise() {
    let config = defaults().with_ignored_fields(["ts"]);
    let old = json!({"ts": "2024-01-01T00:00:00Z", "count": 5});
    let new = json!({"ts": "2024-06-01T00:00:00Z", "count": 5});

    let report = compare(&old, &new, &config);

    assert!(report.is_empty());
    assert_eq!(report.stats.ignored_field_hits, 1);
}

#[test]
fn test_scenario_small_nested_change_is_minor() {
    let report = compare(
        &json!({"a": {"b": {"c": 1}}}),
        &json!({"a": {"b": {"c": 2}}}),
        &defaults(),
    );

    assert_eq!(report.differences.len(), 1);
    let d = &report.differences[0];
    assert_eq!(d.path, "a.b.c");
    assert_eq!(d.kind, DifferenceKind::ValueChanged);
    assert_eq!(d.severity, Severity::Minor);
}

#[test]
fn test_critical_field_raises_minor_changes() {
    let config = defaults().with_critical_fields(["status", "owner"]);
    let old = json!({"status": "open", "owner": {"first": "A"}, "label": "x"});
    let new = json!({"status": "closed", "owner": {"first": "B"}, "label": "y", "extra": 1});

    let report = compare(&old, &new, &config);

    assert_eq!(report.at("status")[0].severity, Severity::Major);
    assert_eq!(report.at("label")[0].severity, Severity::Minor);
    assert_eq!(report.at("extra")[0].kind, DifferenceKind::FieldAdded);
    assert_eq!(report.at("extra")[0].severity, Severity::Minor);
    // nested leaf takes the nearest enclosing field name
    assert_eq!(report.at("owner.first")[0].severity, Severity::Minor);
}

#[test]
fn test_critical_field_added_is_major() {
    let config = defaults().with_critical_fields(["total_assets"]);
    let report = compare(&json!({}), &json!({"total_assets": 4}), &config);
    assert_eq!(report.differences[0].kind, DifferenceKind::FieldAdded);
    assert_eq!(report.differences[0].severity, Severity::Major);
}

#[test]
fn test_removed_critical_field_stays_at_least_major() {
    let config = defaults().with_critical_fields(["note"]);
    let report = compare(&json!({"note": ""}), &json!({}), &config);
    assert_eq!(report.differences[0].kind, DifferenceKind::FieldRemoved);
    assert_eq!(report.differences[0].severity, Severity::Major);
}

#[test]
fn test_string_becoming_empty_is_major() {
    let report = compare(
        &json!({"status": "Active", "memo": ""}),
        &json!({"status": "", "memo": "filled"}),
        &defaults(),
    );
    assert_eq!(report.at("status")[0].severity, Severity::Major);
    assert_eq!(report.at("memo")[0].severity, Severity::Minor);
}

#[test]
fn test_list_elements_matched_by_id_regardless_of_order() {
    let old = json!({"accounts": [
        {"id": "a1", "balance": 10},
        {"id": "a2", "balance": 20},
        {"id": "a3", "balance": 30}
    ]});
    let new = json!({"accounts": [
        {"id": "a3", "balance": 30},
        {"id": "a1", "balance": 0},
        {"id": "a2", "balance": 20}
    ]});

    let report = compare(&old, &new, &defaults());

    assert_eq!(report.paths(), vec!["accounts[id=a1].balance"]);
    assert_eq!(report.differences[0].kind, DifferenceKind::CriticalDataLoss);
}

#[test]
fn test_list_elements_matched_by_name_when_ids_missing() {
    let old = json!({"sites": [{"name": "North", "users": 4}, {"name": "South", "users": 9}]});
    let new = json!({"sites": [{"name": "South", "users": 9}]});

    let report = compare(&old, &new, &defaults());

    assert_eq!(report.differences.len(), 1);
    let d = &report.differences[0];
    assert_eq!(d.path, "sites[name=North]");
    assert_eq!(d.kind, DifferenceKind::ListElementRemoved);
    assert_eq!(d.severity, Severity::Critical);
}

#[test]
fn test_removed_trivial_element_is_major() {
    let report = compare(
        &json!({"rows": [{"id": 1}, {"id": 2}]}),
        &json!({"rows": [{"id": 1}]}),
        &defaults(),
    );
    // {"id": 2} still carries an identifier, so it is non-trivial
    assert_eq!(report.differences[0].severity, Severity::Critical);

    let report = compare(&json!({"xs": [1, 0]}), &json!({"xs": [1]}), &defaults());
    let removed = report.at("xs[1]");
    assert_eq!(removed[0].kind, DifferenceKind::ListElementRemoved);
    assert_eq!(removed[0].severity, Severity::Major);
}

#[test]
fn test_positional_fallback_reports_length_once() {
    let report = compare(
        &json!({"tags": ["a", "b"]}),
        &json!({"tags": ["a", "c", "d", "e"]}),
        &defaults(),
    );

    let kinds: Vec<_> = report.differences.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DifferenceKind::ListLengthChanged,
            DifferenceKind::ValueChanged,
            DifferenceKind::ListElementAdded,
            DifferenceKind::ListElementAdded,
        ]
    );
    assert_eq!(report.paths(), vec!["tags", "tags[1]", "tags[2]", "tags[3]"]);
    assert_eq!(report.differences[0].severity, Severity::Major);
}

#[test]
fn test_mixed_id_presence_falls_back_to_position() {
    let report = compare(
        &json!({"xs": [{"id": 1, "v": 1}, {"v": 2}]}),
        &json!({"xs": [{"id": 1, "v": 1}, {"v": 3}]}),
        &defaults(),
    );
    assert_eq!(report.paths(), vec!["xs[1].v"]);
}

#[test]
fn test_growth_from_zero_is_data_added() {
    let report = compare(&json!({"n": 0}), &json!({"n": 7}), &defaults());
    assert_eq!(report.differences[0].kind, DifferenceKind::DataAdded);
    assert_eq!(report.differences[0].severity, Severity::Minor);
}

#[test]
fn test_custom_thresholds_change_classification() {
    let config = defaults()
        .with_major_change_threshold(0.9)
        .with_large_absolute_delta(10_000.0);
    let report = compare(
        &json!({"total_assets": 2535}),
        &json!({"total_assets": 1048}),
        &config,
    );
    assert_eq!(report.differences[0].severity, Severity::Minor);
}

#[test]
fn test_statistics_are_consistent() {
    let report = compare(
        &json!({"a": 1, "b": [1, 2, 3], "c": {"d": "x"}, "e": 5}),
        &json!({"a": 0, "b": [1, 2], "c": {"d": ""}, "f": true}),
        &defaults(),
    );
    let stats = &report.stats;
    assert_eq!(stats.critical + stats.major + stats.minor, report.differences.len());
    assert_eq!(stats.differences, report.differences.len());
    assert!(stats.is_consistent());
    assert_eq!(stats.by_kind["critical_data_loss"], 1);
    assert_eq!(stats.by_kind["list_length_changed"], 1);
}

#[test]
fn test_deep_documents_are_truncated_not_failed() {
    let mut old = json!(1);
    let mut new = json!(2);
    for _ in 0..300 {
        old = json!({ "n": old });
        new = json!({ "n": new });
    }

    let report = compare(&old, &new, &defaults());

    assert!(report.is_empty());
    assert_eq!(report.stats.truncated_subtrees, 1);
}

#[test]
fn test_compare_documents_rejects_malformed_json() {
    let err = compare_documents(b"{\"a\": 1}", b"{\"a\": ", &defaults()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidDocument);
    assert_eq!(err.code(), "ERR_INVALID_DOCUMENT");
    assert!(err.message().contains("new document"));
}

#[test]
fn test_report_serializes_with_uppercase_severity() {
    let report = compare(&json!({"x": 3}), &json!({"x": 0}), &defaults());
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["differences"][0]["severity"], json!("CRITICAL"));
    assert_eq!(value["differences"][0]["kind"], json!("critical_data_loss"));
    assert_eq!(value["stats"]["critical"], json!(1));
}

#[test]
fn test_string_and_number_ids_get_distinct_paths() {
    let report = compare(
        &json!({"items": [{"id": "1"}]}),
        &json!({"items": [{"id": 1}]}),
        &defaults(),
    );

    assert_eq!(report.paths(), vec!["items[id=\"1\"]", "items[id=1]"]);
    assert_eq!(report.differences[0].kind, DifferenceKind::ListElementRemoved);
    assert_eq!(report.differences[1].kind, DifferenceKind::ListElementAdded);
}

#[test]
fn test_integral_float_id_matches_integer_id() {
    let report = compare(
        &json!({"items": [{"id": 1, "v": 1}]}),
        &json!({"items": [{"id": 1.0, "v": 1}]}),
        &defaults(),
    );

    assert!(report.is_empty());
    assert_eq!(report.stats.critical, 0);
}

#[test]
fn test_large_integer_change_is_detected() {
    let old: serde_json::Value = serde_json::from_str(r#"{"account": 9007199254740993}"#).unwrap();
    let new: serde_json::Value = serde_json::from_str(r#"{"account": 9007199254740992}"#).unwrap();

    let report = compare(&old, &new, &defaults());

    assert_eq!(report.differences.len(), 1);
    assert_eq!(report.differences[0].path, "account");
    assert_eq!(report.differences[0].kind, DifferenceKind::ValueChanged);
    assert_eq!(report.stats.identical, 0);
}

#[test]
fn test_whitespace_strings_follow_literal_emptiness() {
    let report = compare(
        &json!({"memo": "  ", "note": "a"}),
        &json!({"memo": "", "note": "   "}),
        &defaults(),
    );

    assert_eq!(report.at("memo")[0].severity, Severity::Major);
    assert_eq!(report.at("note")[0].severity, Severity::Minor);
}
