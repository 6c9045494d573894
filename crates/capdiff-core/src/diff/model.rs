//! Comparison output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.

use crate::diff::stats::Statistics;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How urgently a difference needs a human.
///
/// Ordered `Minor < Major < Critical` so the worst severity is a `max()`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Cosmetic or low-impact change
    Minor,
    /// Significant business-data change, needs review
    Major,
    /// Likely data loss, demands immediate investigation
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Major, Severity::Minor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "MINOR",
            Severity::Major => "MAJOR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    TypeMismatch,
    FieldAdded,
    FieldRemoved,
    ValueChanged,
    ListLengthChanged,
    ListElementAdded,
    ListElementRemoved,
    /// A positive number dropped to zero
    CriticalDataLoss,
    /// A zero grew to a positive number
    DataAdded,
}

impl DifferenceKind {
    /// Stable snake_case label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            DifferenceKind::TypeMismatch => "type_mismatch",
            DifferenceKind::FieldAdded => "field_added",
            DifferenceKind::FieldRemoved => "field_removed",
            DifferenceKind::ValueChanged => "value_changed",
            DifferenceKind::ListLengthChanged => "list_length_changed",
            DifferenceKind::ListElementAdded => "list_element_added",
            DifferenceKind::ListElementRemoved => "list_element_removed",
            DifferenceKind::CriticalDataLoss => "critical_data_loss",
            DifferenceKind::DataAdded => "data_added",
        }
    }
}

/// One discovered discrepancy between the old and new document.
///
/// `old_value` / `new_value` are display copies, already summarized; they are
/// absent on the side where the node does not exist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Difference {
    pub path: String,
    pub kind: DifferenceKind,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl Difference {
    /// One-line human description, without the severity.
    pub fn description(&self) -> String {
        let at = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        let old = self.old_value.as_ref().map(Value::to_string);
        let new = self.new_value.as_ref().map(Value::to_string);
        let old = old.as_deref().unwrap_or("-");
        let new = new.as_deref().unwrap_or("-");
        match self.kind {
            DifferenceKind::TypeMismatch => format!("{at}: type changed from {old} to {new}"),
            DifferenceKind::FieldAdded => format!("{at}: field added ({new})"),
            DifferenceKind::FieldRemoved => format!("{at}: field removed (was {old})"),
            DifferenceKind::ValueChanged => format!("{at}: {old} -> {new}"),
            DifferenceKind::ListLengthChanged => {
                format!("{at}: list length {old} -> {new}")
            }
            DifferenceKind::ListElementAdded => format!("{at}: element added"),
            DifferenceKind::ListElementRemoved => format!("{at}: element removed"),
            DifferenceKind::CriticalDataLoss => format!("{at}: dropped from {old} to 0"),
            DifferenceKind::DataAdded => format!("{at}: grew from 0 to {new}"),
        }
    }
}

/// Result of one comparison pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComparisonReport {
    /// Differences in walk order (object keys sorted, list pairs in matcher order)
    pub differences: Vec<Difference>,
    pub stats: Statistics,
}

impl ComparisonReport {
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    /// Worst severity present, `None` when there are no differences.
    pub fn max_severity(&self) -> Option<Severity> {
        self.differences.iter().map(|d| d.severity).max()
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Difference> {
        self.differences
            .iter()
            .filter(move |d| d.severity == severity)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.differences.iter().map(|d| d.path.as_str()).collect()
    }

    /// Differences at an exact path.
    pub fn at(&self, path: &str) -> Vec<&Difference> {
        self.differences.iter().filter(|d| d.path == path).collect()
    }
}

/// Display copy of a value, bounded by `max_chars`.
///
/// Long strings are cut with an ellipsis; arrays and objects whose compact
/// JSON exceeds the bound are replaced by a short description.
pub fn summarize_value(value: &Value, max_chars: usize) -> Value {
    match value {
        Value::String(s) if s.chars().count() > max_chars => {
            let mut cut: String = s.chars().take(max_chars).collect();
            cut.push('…');
            Value::String(cut)
        }
        Value::Array(items) if value.to_string().chars().count() > max_chars => {
            Value::String(format!("<array of {} items>", items.len()))
        }
        Value::Object(map) if value.to_string().chars().count() > max_chars => {
            Value::String(format!("<object with {} fields>", map.len()))
        }
        other => other.clone(),
    }
}
