//! Console output for a finished run.
//!
//! The HTML reports are the primary product; this module only prints what
//! happened: which pairs differ and where their reports are, which failed,
//! and which files had no partner.
//!
//! # Examples
//!
//! ```
//! use xmldiff_rs::{format_summary, BatchSummary, OutputFormat};
//!
//! let summary = BatchSummary {
//!     compared: 2,
//!     identical: vec!["a.xsd".to_string(), "b.xsd".to_string()],
//!     ..Default::default()
//! };
//!
//! let output = format_summary(&summary, &OutputFormat::Plain).unwrap();
//! assert!(output.contains("No differences"));
//! ```

use crate::compare::{BatchSummary, ReportEntry};
use crate::diff::DiffStats;
use crate::error::OutputError;
use colored::*;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// JSON representation of the summary
    Json,
    /// Plain text, no colors (suitable for piping)
    Plain,
}

/// Formats a run summary in the requested format.
pub fn format_summary(summary: &BatchSummary, format: &OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Terminal => Ok(format_text(summary, true)),
        OutputFormat::Json => format_json(summary),
        OutputFormat::Plain => Ok(format_text(summary, false)),
    }
}

fn format_json(summary: &BatchSummary) -> Result<String, OutputError> {
    serde_json::to_string_pretty(summary)
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

fn format_text(summary: &BatchSummary, color: bool) -> String {
    let mut lines = Vec::new();

    for entry in &summary.different {
        lines.push(format_different(entry, color));
    }
    for failed in &summary.failed {
        let line = format!("! {}: {}", failed.file, failed.error);
        lines.push(if color { line.bright_red().to_string() } else { line });
    }
    for file in &summary.only_in_a {
        lines.push(dim(format!("  {} (only in original)", file), color));
    }
    for file in &summary.only_in_b {
        lines.push(dim(format!("  {} (only in compare)", file), color));
    }
    if summary.cancelled {
        let line = "Cancelled before all pairs were compared.".to_string();
        lines.push(if color { line.yellow().to_string() } else { line });
    }

    if summary.different.is_empty() && summary.failed.is_empty() {
        lines.push(dim("No differences found.".to_string(), color));
    }

    let mut output = lines.join("\n");
    output.push_str("\n\n");
    output.push_str(&format_totals(summary));
    output
}

fn format_different(entry: &ReportEntry, color: bool) -> String {
    let stats = format_stats(&entry.stats);
    let report = entry.report.display().to_string();
    if color {
        format!(
            "{} {} ({}) {} {}",
            "•".bright_yellow(),
            entry.file.yellow(),
            stats,
            "→".bright_yellow(),
            report
        )
    } else {
        format!("• {} ({}) → {}", entry.file, stats, report)
    }
}

fn dim(line: String, color: bool) -> String {
    if color {
        line.dimmed().to_string()
    } else {
        line
    }
}

/// Formats per-pair edit counts, e.g. `2 added, 1 changed`.
fn format_stats(stats: &DiffStats) -> String {
    if stats.is_empty() {
        return "no edits".to_string();
    }

    let mut parts = Vec::new();
    if stats.added > 0 {
        parts.push(format!("{} added", stats.added));
    }
    if stats.removed > 0 {
        parts.push(format!("{} removed", stats.removed));
    }
    if stats.changed > 0 {
        parts.push(format!("{} changed", stats.changed));
    }
    if stats.moved > 0 {
        parts.push(format!("{} moved", stats.moved));
    }
    parts.join(", ")
}

fn format_totals(summary: &BatchSummary) -> String {
    let mut parts = vec![
        format!("{} compared", summary.compared),
        format!("{} identical", summary.identical.len()),
        format!("{} different", summary.different.len()),
    ];
    if !summary.failed.is_empty() {
        parts.push(format!("{} failed", summary.failed.len()));
    }
    let unpaired = summary.only_in_a.len() + summary.only_in_b.len();
    if unpaired > 0 {
        parts.push(format!("{} unpaired", unpaired));
    }
    format!("Summary: {}", parts.join(", "))
}
