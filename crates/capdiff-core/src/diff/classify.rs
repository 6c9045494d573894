//! Severity rules.
//!
//! Primitive changes are classified in precedence order:
//!
//! 1. number `old > 0`, `new == 0`: `CriticalDataLoss` / CRITICAL
//! 2. number `old == 0`, `new > 0`: `DataAdded` / MINOR
//! 3. number with `|Δ| >= large_absolute_delta`, or `old != 0` and
//!    `|Δ| >= relative_change_floor` and `|Δ|/|old| >= major_change_threshold`:
//!    `ValueChanged` / MAJOR
//! 4. anything else: `ValueChanged` / MINOR, except a non-empty string
//!    becoming `""`, which is MAJOR
//!
//! Every severity is then floored at MAJOR when the nearest field name is in
//! `critical_fields`.

use crate::config::ComparisonConfig;
use crate::diff::model::{DifferenceKind, Severity};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: DifferenceKind,
    pub severity: Severity,
}

impl Classification {
    fn new(kind: DifferenceKind, severity: Severity) -> Self {
        Self { kind, severity }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// A JSON number in canonical form: integral values (including `1.0`) are
/// held exactly as integers, everything else as `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExactNumber {
    Integer(i128),
    Float(f64),
}

impl ExactNumber {
    pub fn of(value: &Value) -> Option<Self> {
        if let Some(i) = value.as_i64() {
            return Some(Self::Integer(i.into()));
        }
        if let Some(u) = value.as_u64() {
            return Some(Self::Integer(u.into()));
        }
        let f = value.as_f64()?;
        // i128 holds every integral f64 below 2^127 exactly
        if f.fract() == 0.0 && f.abs() < 1e38 {
            Some(Self::Integer(f as i128))
        } else {
            Some(Self::Float(f))
        }
    }
}

impl std::fmt::Display for ExactNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Numeric equality by value, so `1` and `1.0` compare equal while integers
/// beyond `f64` precision stay distinct.
pub fn numbers_equal(old: &Value, new: &Value) -> bool {
    match (ExactNumber::of(old), ExactNumber::of(new)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Whether losing this value loses information.
///
/// Null, `false`, zero, blank strings and empty containers are trivial.
pub fn is_substantive(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(_) => as_number(value) != Some(0.0),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Classify two unequal primitives of the same JSON type.
pub fn classify_primitive(old: &Value, new: &Value, config: &ComparisonConfig) -> Classification {
    if let (Some(o), Some(n)) = (as_number(old), as_number(new)) {
        return classify_numeric(o, n, config);
    }
    if let (Value::String(o), Value::String(n)) = (old, new) {
        if !o.is_empty() && n.is_empty() {
            return Classification::new(DifferenceKind::ValueChanged, Severity::Major);
        }
    }
    Classification::new(DifferenceKind::ValueChanged, Severity::Minor)
}

fn classify_numeric(old: f64, new: f64, config: &ComparisonConfig) -> Classification {
    if old > 0.0 && new == 0.0 {
        return Classification::new(DifferenceKind::CriticalDataLoss, Severity::Critical);
    }
    if old == 0.0 && new > 0.0 {
        return Classification::new(DifferenceKind::DataAdded, Severity::Minor);
    }

    let delta = (new - old).abs();
    let large_absolute = delta >= config.large_absolute_delta;
    let large_relative = old != 0.0
        && delta >= config.relative_change_floor
        && delta / old.abs() >= config.major_change_threshold;

    if large_absolute || large_relative {
        Classification::new(DifferenceKind::ValueChanged, Severity::Major)
    } else {
        Classification::new(DifferenceKind::ValueChanged, Severity::Minor)
    }
}

/// Severity for a removed field or list element.
pub fn removal_severity(old: &Value) -> Severity {
    if is_substantive(old) {
        Severity::Critical
    } else {
        Severity::Major
    }
}

/// Raise `severity` to MAJOR when `field` is configured as critical.
pub fn apply_critical_floor(
    severity: Severity,
    field: Option<&str>,
    config: &ComparisonConfig,
) -> Severity {
    match field {
        Some(name) if config.is_critical(name) => severity.max(Severity::Major),
        _ => severity,
    }
}
