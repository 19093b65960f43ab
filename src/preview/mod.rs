//! Text preview of generated HTML.
//!
//! Output goes through [`sandbox::isolate`] and is then laid out as wrapped
//! plain text, so the preview shows what a reader would see without
//! anything in the document running.

pub mod sandbox;

pub use sandbox::isolate;

/// Narrowest layout width handed to the text renderer.
pub const MIN_PREVIEW_WIDTH: usize = 20;

/// Shown when the document cannot be laid out.
pub const PREVIEW_UNAVAILABLE: &str = "(preview unavailable for this document)";

/// Lay out `html` for a pane `width` columns wide.
pub fn render_preview(html: &str, width: usize) -> Vec<String> {
    let safe = isolate(html);
    let width = width.max(MIN_PREVIEW_WIDTH);
    match html2text::config::plain()
        .raw_mode(true)
        .string_from_read(safe.as_bytes(), width)
    {
        Ok(text) => tidy_lines(&text),
        Err(err) => {
            tracing::warn!(%err, width, "preview layout failed");
            vec![PREVIEW_UNAVAILABLE.to_string()]
        }
    }
}

// Email layouts leave long runs of empty table cells behind.
fn tidy_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        if line.is_empty() && lines.last().is_none_or(String::is_empty) {
            continue;
        }
        lines.push(line.to_string());
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}
