//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Conversions, clipboard writes, downloads and file watching happen in the
//! side-effect layer after `update` has run.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{
    COPY_ACK_MS, ConversionStatus, CopyAcknowledgement, Model, ToastLevel, ViewMode,
};
pub use update::{Message, update};

use std::path::PathBuf;
use std::sync::Arc;

use crate::convert::{Converter, DEFAULT_NEWSLETTER};
use crate::export::{Clipboard, SystemClipboard};

/// Quiet period after the last edit before a conversion runs.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Main application struct that owns the collaborators and runs the event loop.
pub struct App {
    source_path: Option<PathBuf>,
    initial_source: String,
    watch_enabled: bool,
    output_dir: PathBuf,
    debounce_ms: u64,
    converter: Arc<Converter>,
    clipboard: Box<dyn Clipboard>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application editing the built-in sample newsletter.
    pub fn new() -> Self {
        Self {
            source_path: None,
            initial_source: DEFAULT_NEWSLETTER.to_string(),
            watch_enabled: false,
            output_dir: PathBuf::from("."),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            converter: Arc::new(Converter::default()),
            clipboard: Box::new(SystemClipboard),
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Edit `source`, loaded from `path`.
    pub fn with_source(mut self, path: PathBuf, source: String) -> Self {
        self.source_path = Some(path);
        self.initial_source = source;
        self
    }

    /// Reload the source whenever its file changes on disk.
    pub fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Arc::new(converter);
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
