//! MJML compiler seam and its `mrml` implementation.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use mrml::prelude::render::RenderOptions;
use thiserror::Error;

use super::validate::unknown_elements;

/// How schema problems in the source are treated.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationLevel {
    /// Report problems as warnings and keep the output.
    #[default]
    Soft,
    /// Any problem fails the attempt.
    Strict,
    /// Do not look for problems.
    Skip,
}

impl ValidationLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Strict => "strict",
            Self::Skip => "skip",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "soft" => Some(Self::Soft),
            "strict" => Some(Self::Strict),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

/// Configuration handed to the compiler on every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub validation: ValidationLevel,
    /// Web font name to stylesheet URL.
    pub fonts: BTreeMap<String, String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            validation: ValidationLevel::Soft,
            fonts: default_fonts(),
        }
    }
}

/// The fonts registered with every compilation.
pub fn default_fonts() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "Open Sans".to_string(),
            "https://fonts.googleapis.com/css?family=Open+Sans:300,400,500,700".to_string(),
        ),
        (
            "Droid Sans".to_string(),
            "https://fonts.googleapis.com/css?family=Droid+Sans:300,400,500,700".to_string(),
        ),
    ])
}

/// Markup plus non-fatal diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub html: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    Render(String),
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),
}

/// MJML to HTML compiler seam.
pub trait Compiler: Send + Sync {
    /// Compile `source` into HTML.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be parsed or rendered, or when
    /// strict validation finds a problem.
    fn compile(&self, source: &str, options: &CompileOptions)
    -> Result<CompileOutput, CompileError>;
}

/// Compiler backed by the `mrml` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MrmlCompiler;

impl Compiler for MrmlCompiler {
    fn compile(
        &self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<CompileOutput, CompileError> {
        let parsed = mrml::parse(source).map_err(|err| CompileError::Parse(err.to_string()))?;

        let mut warnings: Vec<String> = parsed.warnings.iter().map(ToString::to_string).collect();
        if options.validation != ValidationLevel::Skip {
            warnings.extend(unknown_elements(source).iter().map(ToString::to_string));
        }
        if options.validation == ValidationLevel::Strict && !warnings.is_empty() {
            return Err(CompileError::Validation(warnings));
        }

        let fonts: HashMap<String, Cow<'static, str>> = options
            .fonts
            .iter()
            .map(|(name, url)| (name.clone(), Cow::Owned(url.clone())))
            .collect();
        let render_options = RenderOptions {
            fonts,
            ..RenderOptions::default()
        };
        let html = parsed
            .element
            .render(&render_options)
            .map_err(|err| CompileError::Render(err.to_string()))?;

        Ok(CompileOutput { html, warnings })
    }
}
