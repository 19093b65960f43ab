//! Terminal UI components.
//!
//! - [`viewport`]: Scroll position of the output pane
//! - [`style`]: Colors for dark and light terminals

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use render::{
    AppLayout, app_layout, editor_gutter_width, editor_h_offset, line_number_width, render,
};

/// Share of the width given to the MJML input pane.
pub const EDITOR_WIDTH_PERCENT: u16 = 50;
/// Most diagnostic lines shown under the editor before the list scrolls off.
pub const MAX_DIAGNOSTIC_ROWS: u16 = 6;

pub const INPUT_TITLE: &str = "Newsletter Input (MJML)";
pub const OUTPUT_TITLE: &str = "Newsletter Output (HTML)";
pub const OUTPUT_PLACEHOLDER: &str = "Your generated newsletter HTML will appear here";
pub const CONVERTING_LABEL: &str = "Converting...";
pub const COPIED_LABEL: &str = "Copied!";
