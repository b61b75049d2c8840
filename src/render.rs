//! HTML table rows for a diff view.
//!
//! A [`DiffRenderer`] turns a [`DiffView`] into the body of a two-column HTML
//! table: one `<tr>` per view line, old document on the left, new document on
//! the right. It does not produce the surrounding document; that is the report
//! builder's job.

use crate::diff::{DiffLine, DiffView, LineKind};

/// Pixels of indentation per tree level.
const INDENT_PX: usize = 16;

/// Renders a diff view as HTML table rows.
pub trait DiffRenderer {
    fn render_rows(&self, view: &DiffView) -> String;
}

/// Background and text color for a line kind, as `<font>` markup uses them.
pub fn colors(kind: LineKind) -> Option<(&'static str, &'static str)> {
    match kind {
        LineKind::Identical => None,
        LineKind::Added => Some(("yellow", "black")),
        LineKind::Removed => Some(("red", "black")),
        LineKind::Changed => Some(("lightgreen", "black")),
        LineKind::MovedFrom => Some(("red", "blue")),
        LineKind::MovedTo => Some(("yellow", "blue")),
        LineKind::Ignored => Some(("white", "#AAAAAA")),
    }
}

/// Wraps already-escaped HTML in a colored `<font>` element.
pub fn font(background: &str, color: &str, html: &str) -> String {
    format!(
        "<font style=\"background-color: {}\" color=\"{}\">{}</font>",
        background, color, html
    )
}

/// The default renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTableRenderer;

impl DiffRenderer for HtmlTableRenderer {
    fn render_rows(&self, view: &DiffView) -> String {
        let mut out = String::new();
        for line in &view.lines {
            render_line(line, &mut out);
        }
        out
    }
}

fn render_line(line: &DiffLine, out: &mut String) {
    let padding = line.depth * INDENT_PX;
    out.push_str("<tr title=\"");
    out.push_str(&htmlize::escape_attribute(&line.path));
    out.push_str("\">");
    for side in [&line.left, &line.right] {
        out.push_str(&format!("<td style=\"padding-left: {}px\">", padding));
        if let Some(text) = side {
            out.push_str(&cell(line.kind, text));
        }
        out.push_str("</td>");
    }
    out.push_str("</tr>\n");
}

fn cell(kind: LineKind, text: &str) -> String {
    let html = htmlize::escape_text(text);
    match colors(kind) {
        Some((background, color)) => font(background, color, &html),
        None => html.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(kind: LineKind, left: Option<&str>, right: Option<&str>) -> DiffLine {
        DiffLine {
            depth: 2,
            kind,
            left: left.map(str::to_string),
            right: right.map(str::to_string),
            path: "/s/e[@name='a']/@type".to_string(),
        }
    }

    #[test]
    fn test_changed_row_markup() {
        let view = DiffView {
            lines: vec![line(LineKind::Changed, Some("@type=\"a\""), Some("@type=\"b\""))],
        };
        let html = HtmlTableRenderer.render_rows(&view);
        assert!(html.starts_with("<tr title=\"/s/e[@name='a']/@type\">"));
        assert!(html.contains("padding-left: 32px"));
        assert_eq!(html.matches("background-color: lightgreen").count(), 2);
        assert!(html.contains("@type=\"a\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let view = DiffView {
            lines: vec![line(LineKind::Added, None, Some("<xs:element>"))],
        };
        let html = HtmlTableRenderer.render_rows(&view);
        assert!(html.contains("&lt;xs:element&gt;"));
        assert!(!html.contains("<xs:element>"));
    }

    #[test]
    fn test_identical_rows_are_plain() {
        let view = DiffView {
            lines: vec![line(LineKind::Identical, Some("x"), Some("x"))],
        };
        let html = HtmlTableRenderer.render_rows(&view);
        assert!(!html.contains("<font"));
    }

    #[test]
    fn test_move_colors() {
        assert_eq!(colors(LineKind::MovedFrom), Some(("red", "blue")));
        assert_eq!(colors(LineKind::MovedTo), Some(("yellow", "blue")));
        assert_eq!(colors(LineKind::Identical), None);
    }
}
