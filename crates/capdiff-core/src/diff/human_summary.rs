//! Human-readable summary renderer for comparison reports.

use crate::diff::model::{ComparisonReport, Severity};
use crate::diff::stats::Statistics;

/// Render a Markdown/text summary of a [`ComparisonReport`].
///
/// Informational only; the structured report is the source of truth.
pub fn render_human_summary(report: &ComparisonReport) -> String {
    let mut out = String::new();
    out.push_str("## Comparison Summary\n\n");
    render_body(report, 3, &mut out);
    out
}

/// Shared by the capture summary, which nests reports under endpoint headings.
pub(crate) fn render_body(report: &ComparisonReport, heading_level: usize, out: &mut String) {
    render_counts(&report.stats, out);

    if report.is_empty() {
        out.push_str("_No differences detected._\n");
        return;
    }

    let hashes = "#".repeat(heading_level);
    for severity in Severity::ALL {
        let entries: Vec<_> = report.with_severity(severity).collect();
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("{} {} ({})\n\n", hashes, label(severity), entries.len()));
        for d in entries {
            out.push_str(&format!("- `{}` {}\n", d.kind.as_str(), d.description()));
        }
        out.push('\n');
    }
}

pub(crate) fn render_counts(stats: &Statistics, out: &mut String) {
    out.push_str(&format!(
        "**Differences**: {} (critical {}, major {}, minor {})  \n**Paths compared**: {} ({} identical)\n",
        stats.differences,
        stats.critical,
        stats.major,
        stats.minor,
        stats.paths_compared,
        stats.identical,
    ));
    if stats.ignored_field_hits > 0 {
        out.push_str(&format!(
            "**Ignored as noise**: {} field(s)\n",
            stats.ignored_field_hits
        ));
    }
    if stats.truncated_subtrees > 0 {
        out.push_str(&format!(
            "**Warning**: {} subtree(s) past the depth limit were not compared\n",
            stats.truncated_subtrees
        ));
    }
    if stats.budget_exhausted {
        out.push_str("**Warning**: difference budget exhausted; list is incomplete\n");
    }
    out.push('\n');
}

fn label(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "Critical",
        Severity::Major => "Major",
        Severity::Minor => "Minor",
    }
}
