//! Structural comparison engine.
//!
//! The entry point is [`compare`], which walks two JSON documents and
//! produces a [`ComparisonReport`]. [`compare_documents`] additionally decodes
//! raw bytes, rejecting malformed input before the walk starts.

use crate::config::ComparisonConfig;
use crate::diff::classify::{
    apply_critical_floor, classify_primitive, numbers_equal, removal_severity, Classification,
};
use crate::diff::matcher::{match_arrays, PairResult};
use crate::diff::model::{summarize_value, ComparisonReport, Difference, DifferenceKind, Severity};
use crate::diff::path::{DocPath, Segment};
use crate::diff::stats::Statistics;
use crate::errors::{CapdiffError, ExError};
use crate::{log_op_end, log_op_error, log_op_start};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

/// Decode one document at the input boundary.
///
/// `what` names the document in error messages (e.g. `"old document"`).
///
/// # Errors
///
/// `InvalidDocument` when the bytes are not UTF-8 or not JSON.
pub fn parse_document(bytes: &[u8], what: &str) -> Result<Value, ExError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ExError::from(CapdiffError::InvalidUtf8 {
            what: what.to_string(),
            message: e.to_string(),
        })
        .with_op("parse_document")
    })?;

    serde_json::from_str(text).map_err(|e| {
        ExError::from(CapdiffError::InvalidJson {
            what: what.to_string(),
            message: e.to_string(),
        })
        .with_op("parse_document")
    })
}

/// Compare two documents.
///
/// Never fails: divergent subtrees past `max_depth` are skipped and counted in
/// `stats.truncated_subtrees`, and a reached `max_differences` budget sets
/// `stats.budget_exhausted`.
pub fn compare(old: &Value, new: &Value, config: &ComparisonConfig) -> ComparisonReport {
    log_op_start!("compare");
    let start = std::time::Instant::now();

    let report = walk_documents(old, new, config);

    log_op_end!(
        "compare",
        duration_ms = start.elapsed().as_millis() as u64,
        differences = report.stats.differences,
        critical = report.stats.critical,
        major = report.stats.major,
        minor = report.stats.minor,
        ignored_field_hits = report.stats.ignored_field_hits,
        truncated_subtrees = report.stats.truncated_subtrees
    );
    report
}

/// Decode both documents and compare them.
///
/// # Errors
///
/// `InvalidDocument` when either side is not UTF-8 JSON.
pub fn compare_documents(
    old_bytes: &[u8],
    new_bytes: &[u8],
    config: &ComparisonConfig,
) -> Result<ComparisonReport, ExError> {
    log_op_start!(
        "compare_documents",
        old_len = old_bytes.len(),
        new_len = new_bytes.len()
    );
    let start = std::time::Instant::now();

    let parsed = parse_document(old_bytes, "old document")
        .and_then(|old| parse_document(new_bytes, "new document").map(|new| (old, new)));
    let (old, new) = match parsed {
        Ok(pair) => pair,
        Err(e) => {
            log_op_error!(
                "compare_documents",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            return Err(e);
        }
    };

    let report = compare(&old, &new, config);
    log_op_end!(
        "compare_documents",
        duration_ms = start.elapsed().as_millis() as u64,
        differences = report.stats.differences
    );
    Ok(report)
}

/// The walk without operation logging; shared with the capture layer.
pub(crate) fn walk_documents(
    old: &Value,
    new: &Value,
    config: &ComparisonConfig,
) -> ComparisonReport {
    let mut walker = Walker::new(config);
    let mut path = DocPath::root();
    walker.walk(old, new, &mut path);
    walker.finish()
}

fn values_equal(old: &Value, new: &Value) -> bool {
    old == new || numbers_equal(old, new)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

struct Walker<'c> {
    config: &'c ComparisonConfig,
    differences: Vec<Difference>,
    paths_compared: usize,
    identical: usize,
    ignored_field_hits: usize,
    truncated_subtrees: usize,
    budget_exhausted: bool,
}

impl<'c> Walker<'c> {
    fn new(config: &'c ComparisonConfig) -> Self {
        Self {
            config,
            differences: Vec::new(),
            paths_compared: 0,
            identical: 0,
            ignored_field_hits: 0,
            truncated_subtrees: 0,
            budget_exhausted: false,
        }
    }

    fn walk(&mut self, old: &Value, new: &Value, path: &mut DocPath) {
        if self.budget_exhausted {
            return;
        }
        self.paths_compared += 1;

        if values_equal(old, new) {
            self.identical += 1;
            return;
        }

        if path.depth() > self.config.max_depth {
            self.truncated_subtrees += 1;
            tracing::debug!(
                component = module_path!(),
                path = %path,
                depth = path.depth(),
                "depth guard skipped differing subtree"
            );
            return;
        }

        match (old, new) {
            (Value::Object(o), Value::Object(n)) => self.walk_object(o, n, path),
            (Value::Array(o), Value::Array(n)) => self.walk_array(o, n, path),
            (o, n) if type_name(o) == type_name(n) => {
                let Classification { kind, severity } = classify_primitive(o, n, self.config);
                self.record(path, kind, severity, Some(o), Some(n));
            }
            (o, n) => self.record(
                path,
                DifferenceKind::TypeMismatch,
                Severity::Major,
                Some(o),
                Some(n),
            ),
        }
    }

    fn walk_object(&mut self, old: &Map<String, Value>, new: &Map<String, Value>, path: &mut DocPath) {
        let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

        for key in keys {
            let (o, n) = (old.get(key.as_str()), new.get(key.as_str()));

            if self.config.is_ignored(key) {
                let noisy = match (o, n) {
                    (Some(o), Some(n)) => !values_equal(o, n),
                    _ => true,
                };
                if noisy {
                    self.ignored_field_hits += 1;
                }
                continue;
            }

            path.push(Segment::Field(key.clone()));
            match (o, n) {
                (Some(o), Some(n)) => self.walk(o, n, path),
                (None, Some(n)) => {
                    self.record(path, DifferenceKind::FieldAdded, Severity::Minor, None, Some(n))
                }
                (Some(o), None) => self.record(
                    path,
                    DifferenceKind::FieldRemoved,
                    removal_severity(o),
                    Some(o),
                    None,
                ),
                (None, None) => {}
            }
            path.pop();
        }
    }

    fn walk_array(&mut self, old: &[Value], new: &[Value], path: &mut DocPath) {
        let matched = match_arrays(old, new);

        if let Some(mismatch) = matched.length_mismatch {
            let (old_len, new_len) = (json!(mismatch.old_len), json!(mismatch.new_len));
            self.record(
                path,
                DifferenceKind::ListLengthChanged,
                Severity::Major,
                Some(&old_len),
                Some(&new_len),
            );
        }

        for pair in matched.pairs {
            match pair {
                PairResult::Matched { old, new, segment } => {
                    path.push(segment);
                    self.walk(old, new, path);
                    path.pop();
                }
                PairResult::OnlyOld { old, segment } => {
                    path.push(segment);
                    self.record(
                        path,
                        DifferenceKind::ListElementRemoved,
                        removal_severity(old),
                        Some(old),
                        None,
                    );
                    path.pop();
                }
                PairResult::OnlyNew { new, segment } => {
                    path.push(segment);
                    self.record(
                        path,
                        DifferenceKind::ListElementAdded,
                        Severity::Minor,
                        None,
                        Some(new),
                    );
                    path.pop();
                }
            }
        }
    }

    fn record(
        &mut self,
        path: &DocPath,
        kind: DifferenceKind,
        severity: Severity,
        old: Option<&Value>,
        new: Option<&Value>,
    ) {
        if self.budget_exhausted {
            return;
        }
        if let Some(limit) = self.config.max_differences {
            if self.differences.len() >= limit {
                self.budget_exhausted = true;
                tracing::warn!(
                    component = module_path!(),
                    path = %path,
                    limit,
                    "difference budget exhausted, remaining differences not recorded"
                );
                return;
            }
        }

        let max_chars = self.config.max_value_chars;
        self.differences.push(Difference {
            path: path.to_string(),
            kind,
            severity: apply_critical_floor(severity, path.field_name(), self.config),
            old_value: old.map(|v| summarize_value(v, max_chars)),
            new_value: new.map(|v| summarize_value(v, max_chars)),
        });
    }

    fn finish(self) -> ComparisonReport {
        let mut stats = Statistics::tally(&self.differences);
        stats.paths_compared = self.paths_compared;
        stats.identical = self.identical;
        stats.ignored_field_hits = self.ignored_field_hits;
        stats.truncated_subtrees = self.truncated_subtrees;
        stats.budget_exhausted = self.budget_exhausted;
        ComparisonReport {
            differences: self.differences,
            stats,
        }
    }
}
