//! HTML re-indentation with `markup_fmt`.

use std::convert::Infallible;

use markup_fmt::Language;
use thiserror::Error;

/// Fixed pretty-printing options for generated markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub indent_size: usize,
    /// Upper bound on consecutive blank lines kept from the formatter output.
    pub max_preserve_newlines: usize,
    pub preserve_newlines: bool,
    pub end_with_newline: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_size: 2,
            max_preserve_newlines: 1,
            preserve_newlines: true,
            end_with_newline: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("html formatter rejected input: {0}")]
    Syntax(String),
}

/// HTML pretty-printer seam.
pub trait HtmlFormatter: Send + Sync {
    /// Re-indent `html`.
    ///
    /// # Errors
    ///
    /// Returns an error when the markup cannot be formatted.
    fn format(&self, html: &str, options: &FormatOptions) -> Result<String, FormatError>;
}

/// Formatter backed by the `markup_fmt` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupFormatter;

impl HtmlFormatter for MarkupFormatter {
    fn format(&self, html: &str, options: &FormatOptions) -> Result<String, FormatError> {
        let mut config = markup_fmt::config::FormatOptions::default();
        config.layout.indent_width = options.indent_size;

        // Embedded <style> blocks are passed through untouched.
        let formatted = markup_fmt::format_text(html, Language::Html, &config, |code, _| {
            Ok::<_, Infallible>(code.into())
        })
        .map_err(|err| FormatError::Syntax(format!("{err:?}")))?;

        Ok(normalize_blank_lines(&formatted, options))
    }
}

/// Apply the blank-line and trailing-newline rules to formatted text.
pub fn normalize_blank_lines(text: &str, options: &FormatOptions) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut blank_run = 0usize;
    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            let keep = options.preserve_newlines && blank_run <= options.max_preserve_newlines;
            if keep && !out.is_empty() {
                out.push("");
            }
            continue;
        }
        blank_run = 0;
        out.push(line);
    }
    while out.last().is_some_and(|line| line.is_empty()) {
        out.pop();
    }

    let mut joined = out.join("\n");
    if options.end_with_newline {
        joined.push('\n');
    }
    joined
}
