//! MJML to HTML conversion pipeline.
//!
//! A conversion attempt runs the source through three stages:
//! - the empty-input guard, which never reaches the compiler
//! - [`Compiler`]: MJML to HTML, collecting diagnostics
//! - [`HtmlFormatter`]: re-indents the markup, degrading to the raw output on failure
//!
//! [`ConversionWorker`] runs attempts off the UI thread.

mod compiler;
mod format;
mod sample;
mod validate;
mod worker;

use std::sync::Arc;

pub use compiler::{
    CompileError, CompileOptions, CompileOutput, Compiler, MrmlCompiler, ValidationLevel,
    default_fonts,
};
pub use format::{FormatError, FormatOptions, HtmlFormatter, MarkupFormatter, normalize_blank_lines};
pub use sample::DEFAULT_NEWSLETTER;
pub use validate::{UnknownElement, is_registered_element, unknown_elements};
pub use worker::{ConversionWorker, Finished};

/// Shown when a conversion is requested for blank source.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter MJML code";

/// Used when the compiler fails without a usable message.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Failed to convert MJML";

/// Outcome of one conversion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    /// Formatted HTML plus non-fatal diagnostics, in source order.
    Success { html: String, warnings: Vec<String> },
    /// The attempt produced no output.
    Failure { message: String },
}

impl ConversionResult {
    /// The result for blank source.
    pub fn empty_input() -> Self {
        Self::Failure {
            message: EMPTY_INPUT_MESSAGE.to_string(),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Compiler and formatter bound to the fixed conversion configuration.
#[derive(Clone)]
pub struct Converter {
    compiler: Arc<dyn Compiler>,
    formatter: Arc<dyn HtmlFormatter>,
    options: CompileOptions,
    format_options: FormatOptions,
}

impl Converter {
    /// Create a converter with soft validation and the default web fonts.
    pub fn new(compiler: Arc<dyn Compiler>, formatter: Arc<dyn HtmlFormatter>) -> Self {
        Self {
            compiler,
            formatter,
            options: CompileOptions::default(),
            format_options: FormatOptions::default(),
        }
    }

    /// Override the validation level.
    #[must_use]
    pub fn with_validation(mut self, level: ValidationLevel) -> Self {
        self.options.validation = level;
        self
    }

    pub const fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Run one conversion attempt.
    ///
    /// Blank source short-circuits to [`EMPTY_INPUT_MESSAGE`]. A compiler
    /// error becomes a failure with its message; a formatter error is logged
    /// and the unformatted markup is returned instead.
    pub fn convert(&self, source: &str) -> ConversionResult {
        if source.trim().is_empty() {
            return ConversionResult::empty_input();
        }

        let output = match self.compiler.compile(source, &self.options) {
            Ok(output) => output,
            Err(err) => {
                tracing::debug!(%err, "mjml compilation failed");
                let message = err.to_string();
                let message = if message.trim().is_empty() {
                    FALLBACK_FAILURE_MESSAGE.to_string()
                } else {
                    message
                };
                return ConversionResult::Failure { message };
            }
        };

        if !output.warnings.is_empty() {
            tracing::debug!(count = output.warnings.len(), "mjml compiled with warnings");
        }

        let html = match self.formatter.format(&output.html, &self.format_options) {
            Ok(formatted) => formatted,
            Err(err) => {
                tracing::warn!(%err, "html formatting failed, using raw compiler output");
                output.html
            }
        };

        ConversionResult::Success {
            html,
            warnings: output.warnings,
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Arc::new(MrmlCompiler), Arc::new(MarkupFormatter))
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("options", &self.options)
            .field("format_options", &self.format_options)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{BrokenFormatter, EchoCompiler, FailingCompiler, IdentityFormatter};
    use super::*;

    fn echo_converter() -> (Arc<EchoCompiler>, Converter) {
        let compiler = Arc::new(EchoCompiler::default());
        let converter = Converter::new(compiler.clone(), Arc::new(IdentityFormatter));
        (compiler, converter)
    }

    #[test]
    fn test_blank_source_never_reaches_compiler() {
        let (compiler, converter) = echo_converter();
        for source in ["", "   ", "\n\t \n"] {
            assert_eq!(converter.convert(source), ConversionResult::empty_input());
        }
        assert_eq!(compiler.call_count(), 0);
    }

    #[test]
    fn test_empty_input_message_is_fixed() {
        let ConversionResult::Failure { message } = ConversionResult::empty_input() else {
            panic!("empty input must be a failure");
        };
        assert_eq!(message, "Please enter MJML code");
    }

    #[test]
    fn test_success_carries_compiler_warnings() {
        let compiler = Arc::new(EchoCompiler::with_warnings(&["first", "second"]));
        let converter = Converter::new(compiler, Arc::new(IdentityFormatter));
        let result = converter.convert("<mjml></mjml>");
        assert_eq!(
            result,
            ConversionResult::Success {
                html: "<table><tr><td><mjml></mjml></td></tr></table>".to_string(),
                warnings: vec!["first".to_string(), "second".to_string()],
            }
        );
    }

    #[test]
    fn test_compiler_error_message_is_surfaced_verbatim() {
        let converter = Converter::new(
            Arc::new(FailingCompiler("unexpected token at position 12")),
            Arc::new(IdentityFormatter),
        );
        assert_eq!(
            converter.convert("<mjml>"),
            ConversionResult::Failure {
                message: "unexpected token at position 12".to_string()
            }
        );
    }

    #[test]
    fn test_compiler_error_without_message_uses_fallback() {
        let converter = Converter::new(Arc::new(FailingCompiler("  ")), Arc::new(IdentityFormatter));
        assert_eq!(
            converter.convert("<mjml>"),
            ConversionResult::Failure {
                message: FALLBACK_FAILURE_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_formatter_failure_degrades_to_raw_output() {
        let converter = Converter::new(Arc::new(EchoCompiler::default()), Arc::new(BrokenFormatter));
        let result = converter.convert("Hello");
        assert_eq!(
            result,
            ConversionResult::Success {
                html: "<table><tr><td>Hello</td></tr></table>".to_string(),
                warnings: Vec::new(),
            }
        );
    }

    #[test]
    fn test_converting_twice_is_idempotent() {
        let (_, converter) = echo_converter();
        let first = converter.convert("<mjml><mj-body /></mjml>");
        let second = converter.convert("<mjml><mj-body /></mjml>");
        assert_eq!(first, second);
    }

    #[test]
    fn test_fixed_options_reach_compiler() {
        let (compiler, converter) = echo_converter();
        converter.convert("<mjml></mjml>");
        let options = compiler
            .last_options
            .lock()
            .unwrap()
            .clone()
            .expect("compiler saw options");
        assert_eq!(options.validation, ValidationLevel::Soft);
        assert!(options.fonts.contains_key("Open Sans"));
        assert!(options.fonts.contains_key("Droid Sans"));
    }

    #[test]
    fn test_with_validation_overrides_level() {
        let (_, converter) = echo_converter();
        let converter = converter.with_validation(ValidationLevel::Strict);
        assert_eq!(converter.options().validation, ValidationLevel::Strict);
    }
}
