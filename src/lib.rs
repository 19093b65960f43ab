// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. convert::ConversionResult)
    clippy::module_name_repetitions
)]

//! # Newsletter Creator
//!
//! A terminal MJML editor that converts email templates to HTML as you type.
//!
//! The screen is split in two:
//! - the MJML source on the left, with errors and warnings underneath
//! - the generated HTML on the right, as a text preview or highlighted code
//!
//! Conversion runs after edits settle, the result can be copied to the
//! clipboard or saved as `newsletter.html`.
//!
//! ## Architecture
//!
//! The application uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`convert`]: MJML compilation, validation and formatting
//! - [`editor`]: Source text buffer
//! - [`preview`]: Sandboxed text rendering of the output
//! - [`highlight`]: Syntax highlighting of the output markup
//! - [`export`]: Clipboard and download
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: File watching
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod config;
pub mod convert;
pub mod editor;
pub mod export;
pub mod highlight;
pub mod preview;
pub mod timer;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::convert::{ConversionResult, Converter};
    pub use crate::ui::viewport::Viewport;
}
