//! Human-readable summary renderer for capture comparisons.

use crate::capture::compare::{CaptureClassification, CaptureComparison};
use crate::diff::human_summary::{render_body, render_counts};
use crate::diff::model::Severity;

/// Render a Markdown summary of a [`CaptureComparison`].
///
/// Informational only; the structured comparison is the source of truth.
pub fn render_capture_summary(comparison: &CaptureComparison) -> String {
    let mut out = String::new();
    out.push_str("## Capture Comparison\n\n");

    let class_label = match comparison.classification {
        CaptureClassification::Identical => "Identical",
        CaptureClassification::NoChange => "No Change",
        CaptureClassification::Changed => "Changed",
    };
    let severity_label = match comparison.severity {
        None => "None",
        Some(Severity::Minor) => "Minor",
        Some(Severity::Major) => "Major",
        Some(Severity::Critical) => "Critical",
    };
    out.push_str(&format!(
        "**Classification**: {class_label}  \n**Severity**: {severity_label}\n\n"
    ));

    let identity = &comparison.identity;
    out.push_str("### Identity\n\n");
    out.push_str(&format!(
        "| | Digest | Captured |\n\
         |---|---|---|\n\
         | Old | `{}` | {} |\n\
         | New | `{}` | {} |\n\n",
        short(&identity.old_digest),
        identity.old_capture_time.as_deref().unwrap_or("-"),
        short(&identity.new_digest),
        identity.new_capture_time.as_deref().unwrap_or("-"),
    ));
    if let Some(base_url) = &identity.base_url {
        out.push_str(&format!("**Base URL**: {}\n\n", base_url));
    }

    if comparison.classification == CaptureClassification::Identical {
        out.push_str("_Captures are identical._\n");
        return out;
    }

    render_counts(&comparison.totals, &mut out);

    let missing: Vec<&str> = comparison.missing_endpoints().collect();
    if !missing.is_empty() {
        out.push_str(&format!("### Missing Endpoints ({})\n\n", missing.len()));
        for endpoint in missing {
            out.push_str(&format!("- `{}`\n", endpoint));
        }
        out.push('\n');
    }

    let added: Vec<&str> = comparison.added_endpoints().collect();
    if !added.is_empty() {
        out.push_str(&format!("### New Endpoints ({})\n\n", added.len()));
        for endpoint in added {
            out.push_str(&format!("- `{}`\n", endpoint));
        }
        out.push('\n');
    }

    let mut any_changed = false;
    for endpoint in comparison.changed_endpoints() {
        any_changed = true;
        out.push_str(&format!("### `{}`\n\n", endpoint.endpoint));
        render_body(&endpoint.report, 4, &mut out);
    }

    if !any_changed && comparison.classification == CaptureClassification::NoChange {
        out.push_str("_No differences detected._\n");
    }

    out
}

fn short(digest: &str) -> &str {
    let end = digest.len().min(12);
    &digest[..end]
}
