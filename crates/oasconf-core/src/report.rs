//! # Report Builder
//!
//! Renders the failures of a run into the two artifacts operators consume:
//! a JSON snapshot usable as the next run's baseline, and a markdown
//! regression report for review. Rendering is pure and deterministic for a
//! given failure map — no clock, no network, and the map's sorted iteration
//! order fixes the document order.

use std::fmt::Write;

use crate::locator::locate_line;
use crate::model::{FailureMap, FailureRecord};

/// Serialize the failure map as the next run's baseline file.
pub fn to_baseline_json(failed: &FailureMap) -> serde_json::Result<String> {
    serde_json::to_string_pretty(failed)
}

/// Render the markdown regression report.
///
/// One section per failing document: name, API and OpenAPI version, and
/// every error with its message, instance path, and deep-linked source
/// line. Known failures are marked so reviewers can focus on the new ones.
pub fn render_markdown(failed: &FailureMap) -> String {
    let mut out = String::new();
    let new_count = failed.values().filter(|r| !r.known_failure).count();

    out.push_str("# Real-world API conformance failures\n\n");
    let _ = writeln!(
        out,
        "{} document(s) fail validation; {} of these are not in the accepted baseline.",
        failed.len(),
        new_count
    );

    for record in failed.values() {
        render_document(&mut out, record);
    }
    out
}

fn render_document(out: &mut String, record: &FailureRecord) {
    let entry = &record.entry;
    let _ = writeln!(out, "\n## {}\n", entry.name);
    if record.known_failure {
        out.push_str("Known failure — identical to the accepted baseline.\n\n");
    }
    let _ = writeln!(out, "- API version: `{}`", entry.api_version);
    let _ = writeln!(out, "- OpenAPI version: `{}`", entry.open_api_version);
    let _ = writeln!(out, "- Source: <{}>", entry.source_browse_url);

    for (i, error) in record.result.errors.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", i + 1, error.message);
        let path = if error.instance_path.is_empty() {
            "(document root)"
        } else {
            &error.instance_path
        };
        let _ = writeln!(out, "   - instance path: `{path}`");
        if !error.source_url.is_empty() {
            let _ = writeln!(out, "   - source line: <{}>", error.source_url);
        }
    }
}

/// Build the deep link for one error: the entry's browse URL with a
/// `#L<line>` anchor pointing at the instance path within `text`.
pub fn source_link(browse_url: &str, text: &str, instance_path: &str) -> String {
    format!("{browse_url}#L{}", locate_line(text, instance_path))
}
