//! HTML report assembly.
//!
//! A report is written in a fixed order: legend, file header row, the table
//! rows from the [`DiffRenderer`], closing markup. Once the whole text exists,
//! the moved-from and moved-to colors are remapped so moves do not share
//! their base color with plain additions and removals.

use crate::diff::DiffView;
use crate::error::ReportError;
use crate::matcher::FilePair;
use crate::render::{font, DiffRenderer};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the original file name to name its report.
pub const REPORT_SUFFIX: &str = "_compare.html";

/// Literal substitutions applied once the table body is complete.
const COLOR_REMAPS: [(&str, &str); 2] = [
    ("red\" color=\"blue", "Plum\" color=\"blue"),
    ("yellow\" color=\"blue", "LightCyan\" color=\"blue"),
];

pub struct ReportBuilder<'r> {
    renderer: &'r dyn DiffRenderer,
}

impl<'r> ReportBuilder<'r> {
    pub fn new(renderer: &'r dyn DiffRenderer) -> Self {
        Self { renderer }
    }

    /// Builds the complete report text for a pair.
    pub fn render(&self, pair: &FilePair, view: &DiffView) -> String {
        let mut html = String::new();
        html.push_str("<html><head><meta charset=\"utf-8\"><title>");
        html.push_str(&htmlize::escape_text(&pair.display_a));
        html.push_str("</title></head><body><table width='100%'>\n");

        html.push_str(&legend());
        html.push_str(&header(pair));
        html.push_str(&self.renderer.render_rows(view));

        html.push_str("</table></body></html>\n");

        remap_move_colors(&html)
    }
}

fn legend() -> String {
    let entries = [
        font("yellow", "black", "added"),
        font("red", "black", "removed"),
        font("lightgreen", "black", "changed"),
        font("red", "blue", "moved from"),
        font("yellow", "blue", "moved to"),
        font("white", "#AAAAAA", "ignored"),
    ];
    format!(
        "<tr><td colspan=\"2\" align=\"center\"><b>Legend:</b> {}</td></tr>\n",
        entries.join("&nbsp;&nbsp;")
    )
}

fn header(pair: &FilePair) -> String {
    format!(
        "<tr><td><b> File Name : {}</b></td><td><b> File Name : {}</b></td></tr>\n",
        htmlize::escape_text(&pair.display_a),
        htmlize::escape_text(&pair.display_b)
    )
}

/// Applies the moved-from and moved-to color remaps. Running it on its own
/// output changes nothing.
pub fn remap_move_colors(html: &str) -> String {
    COLOR_REMAPS
        .iter()
        .fold(html.to_string(), |text, (from, to)| text.replace(from, to))
}

/// Where the report for `pair` goes inside `results`.
pub fn report_path(results: &Path, pair: &FilePair) -> PathBuf {
    let file_name = format!("{}{}", pair.file_name(), REPORT_SUFFIX);
    match pair.relative.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => results.join(dir).join(file_name),
        _ => results.join(file_name),
    }
}

/// Writes a finished report, creating intermediate directories for nested
/// pairs.
pub fn write_report(results: &Path, pair: &FilePair, html: &str) -> Result<PathBuf, ReportError> {
    let path = report_path(results, pair);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ReportError::write_error(parent, e))?;
    }
    fs::write(&path, html).map_err(|e| ReportError::write_error(&path, e))?;
    Ok(path)
}

/// Deletes a report left over from an earlier run. Returns true if one
/// existed.
pub fn remove_stale_report(results: &Path, pair: &FilePair) -> Result<bool, ReportError> {
    let path = report_path(results, pair);
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path).map_err(|e| ReportError::write_error(&path, e))?;
    Ok(true)
}
