use std::path::Path;
use std::sync::Arc;

use crate::app::{App, ConversionStatus, Message, Model, ToastLevel};
use crate::convert::{ConversionResult, ConversionWorker};
use crate::export::{DOWNLOAD_CONTENT_TYPE, write_download};
use crate::timer::DelayedAction;
use crate::watcher::{FileWatcher, WATCH_DEBOUNCE_MS};

/// Resources the side-effect layer drives alongside the model.
pub(super) struct Runtime {
    pub(super) worker: ConversionWorker,
    pub(super) debounce: DelayedAction,
    pub(super) file_watcher: Option<FileWatcher>,
}

impl Runtime {
    /// Cancel every timer and stop watching.
    pub(super) fn shutdown(&mut self, model: &mut Model) {
        self.debounce.cancel();
        self.file_watcher = None;
        model.cancel_timers();
        tracing::debug!(in_flight = model.in_flight(), "runtime shut down");
    }
}

impl App {
    pub(super) fn new_runtime(&self, model: &mut Model) -> Runtime {
        let file_watcher = if model.watch_enabled {
            Self::start_watching(model)
        } else {
            None
        };
        Runtime {
            worker: ConversionWorker::new(Arc::clone(&self.converter)),
            debounce: DelayedAction::new(self.debounce_ms),
            file_watcher,
        }
    }

    fn start_watching(model: &mut Model) -> Option<FileWatcher> {
        let Some(path) = model.source_path.clone() else {
            model.watch_enabled = false;
            model.show_toast(ToastLevel::Warning, "Watch needs a source file");
            return None;
        };
        match make_file_watcher(&path) {
            Ok(watcher) => {
                tracing::debug!(path = %watcher.target_path().display(), "watching source");
                Some(watcher)
            }
            Err(err) => {
                model.watch_enabled = false;
                model.show_toast(ToastLevel::Warning, format!("Watch unavailable: {err}"));
                tracing::warn!(path = %path.display(), %err, "file watcher failed");
                None
            }
        }
    }

    /// Issue a conversion attempt for the current source.
    ///
    /// Blank source is answered immediately without reaching the worker.
    pub(super) fn start_conversion(model: &mut Model, worker: &mut ConversionWorker) {
        let source = model.editor.text();
        if source.trim().is_empty() {
            model.apply_conversion(ConversionResult::empty_input());
            return;
        }
        let seq = worker.dispatch(source);
        model.conversion_started(seq);
    }

    pub(super) fn handle_message_side_effects(
        &self,
        model: &mut Model,
        runtime: &mut Runtime,
        msg: &Message,
        now_ms: u64,
    ) {
        match msg {
            Message::Convert => {
                if model.status() == ConversionStatus::Idle {
                    Self::start_conversion(model, &mut runtime.worker);
                } else {
                    tracing::debug!("convert ignored while a conversion is in flight");
                }
            }
            Message::CopyOutput => self.copy_output(model, now_ms),
            Message::DownloadOutput => Self::download_output(model),
            Message::ToggleWatch => {
                if model.watch_enabled {
                    runtime.file_watcher = Self::start_watching(model);
                    if runtime.file_watcher.is_some() {
                        model.show_toast(ToastLevel::Info, "Watching file changes");
                    }
                } else {
                    runtime.file_watcher = None;
                    model.show_toast(ToastLevel::Info, "Watch disabled");
                }
            }
            Message::FileChanged => {
                let before = model.editor.revision();
                if let Err(err) = model.reload_source_from_disk() {
                    model.show_toast(ToastLevel::Error, format!("Reload failed: {err:#}"));
                    tracing::warn!(err = %format!("{err:#}"), "reload failed");
                } else if model.editor.revision() != before {
                    model.show_toast(ToastLevel::Info, "Reloaded from disk");
                }
            }
            _ => {}
        }
    }

    fn copy_output(&self, model: &mut Model, now_ms: u64) {
        if !model.has_output() {
            return;
        }
        match self.clipboard.set_text(model.html()) {
            Ok(()) => model.acknowledge_copy(now_ms),
            Err(err) => tracing::warn!(%err, "copy to clipboard failed"),
        }
    }

    fn download_output(model: &mut Model) {
        if !model.has_output() {
            return;
        }
        match write_download(&model.output_dir, model.html()) {
            Ok(path) => {
                tracing::debug!(
                    path = %path.display(),
                    content_type = DOWNLOAD_CONTENT_TYPE,
                    bytes = model.html().len(),
                    "download written"
                );
                model.show_toast(ToastLevel::Info, format!("Saved {}", path.display()));
            }
            Err(err) => {
                tracing::warn!(dir = %model.output_dir.display(), %err, "download failed");
                model.show_toast(ToastLevel::Error, format!("Download failed: {err}"));
            }
        }
    }
}

fn make_file_watcher(path: &Path) -> notify::Result<FileWatcher> {
    FileWatcher::new(path, WATCH_DEBOUNCE_MS)
}
