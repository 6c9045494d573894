//! Aggregate counters for a comparison pass.
//!
//! Severity and kind counts are a pure reduction over the difference list
//! ([`Statistics::tally`]); the walk counters (`paths_compared`, `identical`,
//! `ignored_field_hits`, `truncated_subtrees`, `budget_exhausted`) are filled
//! in by the engine.

use crate::diff::model::{Difference, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Statistics {
    /// Node pairs visited by the walk
    pub paths_compared: usize,
    /// Node pairs found deeply equal
    pub identical: usize,
    /// Number of recorded differences
    pub differences: usize,
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
    /// Ignored fields that would otherwise have produced a difference
    pub ignored_field_hits: usize,
    /// Differing subtrees skipped by the depth guard
    pub truncated_subtrees: usize,
    /// True when `max_differences` stopped recording early
    pub budget_exhausted: bool,
    /// Difference count per kind label
    pub by_kind: BTreeMap<String, usize>,
}

impl Statistics {
    /// Severity and kind counts for a difference list.
    pub fn tally(differences: &[Difference]) -> Self {
        let mut stats = Statistics {
            differences: differences.len(),
            ..Statistics::default()
        };
        for d in differences {
            match d.severity {
                Severity::Critical => stats.critical += 1,
                Severity::Major => stats.major += 1,
                Severity::Minor => stats.minor += 1,
            }
            *stats.by_kind.entry(d.kind.as_str().to_string()).or_insert(0) += 1;
        }
        stats
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Major => self.major,
            Severity::Minor => self.minor,
        }
    }

    /// Fold another pass into this one (used for per-endpoint totals).
    pub fn merge(&mut self, other: &Statistics) {
        self.paths_compared += other.paths_compared;
        self.identical += other.identical;
        self.differences += other.differences;
        self.critical += other.critical;
        self.major += other.major;
        self.minor += other.minor;
        self.ignored_field_hits += other.ignored_field_hits;
        self.truncated_subtrees += other.truncated_subtrees;
        self.budget_exhausted |= other.budget_exhausted;
        for (kind, n) in &other.by_kind {
            *self.by_kind.entry(kind.clone()).or_insert(0) += n;
        }
    }

    /// `critical + major + minor == differences`
    pub fn is_consistent(&self) -> bool {
        self.critical + self.major + self.minor == self.differences
            && self.by_kind.values().sum::<usize>() == self.differences
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::DifferenceKind;

    fn diff(kind: DifferenceKind, severity: Severity) -> Difference {
        Difference {
            path: "x".to_string(),
            kind,
            severity,
            old_value: None,
            new_value: None,
        }
    }

    #[test]
    fn test_tally_counts_severities_and_kinds() {
        let stats = Statistics::tally(&[
            diff(DifferenceKind::CriticalDataLoss, Severity::Critical),
            diff(DifferenceKind::ValueChanged, Severity::Major),
            diff(DifferenceKind::ValueChanged, Severity::Minor),
        ]);
        assert_eq!(stats.differences, 3);
        assert_eq!(stats.critical, 1);
        assert_eq!(stats.major, 1);
        assert_eq!(stats.minor, 1);
        assert_eq!(stats.by_kind.get("value_changed"), Some(&2));
        assert_eq!(stats.count(Severity::Critical), 1);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_tally_empty() {
        let stats = Statistics::tally(&[]);
        assert_eq!(stats, Statistics::default());
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_merge_adds_counters() {
        let mut total = Statistics::tally(&[diff(DifferenceKind::FieldAdded, Severity::Minor)]);
        total.paths_compared = 4;
        let mut other = Statistics::tally(&[diff(DifferenceKind::FieldAdded, Severity::Major)]);
        other.ignored_field_hits = 2;
        other.budget_exhausted = true;

        total.merge(&other);
        assert_eq!(total.differences, 2);
        assert_eq!(total.minor, 1);
        assert_eq!(total.major, 1);
        assert_eq!(total.paths_compared, 4);
        assert_eq!(total.ignored_field_hits, 2);
        assert!(total.budget_exhausted);
        assert_eq!(total.by_kind.get("field_added"), Some(&2));
        assert!(total.is_consistent());
    }
}
