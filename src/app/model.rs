use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::layout::Rect;
use ratatui::text::Line;

use crate::convert::ConversionResult;
use crate::editor::EditorBuffer;
use crate::timer::DelayedAction;
use crate::ui::viewport::Viewport;

/// How long the "copied" acknowledgement stays visible.
pub const COPY_ACK_MS: u64 = 2_000;

const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Which rendering of the output the right pane shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Preview,
    Code,
}

impl ViewMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Preview => Self::Code,
            Self::Code => Self::Preview,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Preview => "Preview",
            Self::Code => "Code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    Idle,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAcknowledgement {
    Idle,
    Copied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
pub struct Model {
    /// MJML source being edited
    pub editor: EditorBuffer,
    /// First editor line shown in the input pane
    pub editor_scroll_offset: usize,
    /// File the source was loaded from, if any
    pub source_path: Option<PathBuf>,
    /// Directory that receives `newsletter.html`
    pub output_dir: PathBuf,
    pub watch_enabled: bool,
    pub view_mode: ViewMode,
    /// Scroll state of the output pane
    pub output_viewport: Viewport,
    pub terminal_size: (u16, u16),
    pub help_visible: bool,
    pub help_scroll_offset: usize,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    pub should_quit: bool,
    html: String,
    error: String,
    warnings: Vec<String>,
    in_flight: usize,
    last_applied_seq: Option<u64>,
    copy_ack: DelayedAction,
    toast: Option<Toast>,
    preview_cache: Option<(u16, Vec<String>)>,
    code_cache: Option<Vec<Line<'static>>>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("source_path", &self.source_path)
            .field("view_mode", &self.view_mode)
            .field("in_flight", &self.in_flight)
            .field("html_len", &self.html.len())
            .field("error", &self.error)
            .field("warnings", &self.warnings.len())
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model editing `source`.
    pub fn new(source: &str, source_path: Option<PathBuf>, terminal_size: (u16, u16)) -> Self {
        let mut model = Self {
            editor: EditorBuffer::from_text(source),
            editor_scroll_offset: 0,
            source_path,
            output_dir: PathBuf::from("."),
            watch_enabled: false,
            view_mode: ViewMode::Preview,
            output_viewport: Viewport::new(0, 0, 0),
            terminal_size,
            help_visible: false,
            help_scroll_offset: 0,
            config_global_path: None,
            config_local_path: None,
            should_quit: false,
            html: String::new(),
            error: String::new(),
            warnings: Vec::new(),
            in_flight: 0,
            last_applied_seq: None,
            copy_ack: DelayedAction::new(COPY_ACK_MS),
            toast: None,
            preview_cache: None,
            code_cache: None,
        };
        model.sync_layout(model.terminal_area());
        model
    }

    /// Final HTML of the last successful conversion; empty otherwise.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Message of the last failed conversion; empty otherwise.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_output(&self) -> bool {
        !self.html.is_empty()
    }

    pub const fn status(&self) -> ConversionStatus {
        if self.in_flight > 0 {
            ConversionStatus::InFlight
        } else {
            ConversionStatus::Idle
        }
    }

    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub const fn terminal_area(&self) -> Rect {
        Rect::new(0, 0, self.terminal_size.0, self.terminal_size.1)
    }

    /// Record that attempt `seq` was dispatched.
    pub(super) fn conversion_started(&mut self, seq: u64) {
        self.in_flight += 1;
        tracing::debug!(seq, in_flight = self.in_flight, "conversion started");
    }

    /// Apply the result of attempt `seq`, whatever order attempts finish in.
    pub(super) fn conversion_finished(&mut self, seq: u64, result: ConversionResult) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.last_applied_seq.is_some_and(|last| last > seq) {
            tracing::debug!(
                seq,
                last_applied = self.last_applied_seq,
                "older conversion finished last and replaces newer output"
            );
        } else {
            tracing::debug!(seq, success = result.is_success(), "conversion applied");
        }
        self.last_applied_seq = Some(seq);
        self.apply_conversion(result);
    }

    /// Replace output, error and warnings with one attempt's outcome.
    pub fn apply_conversion(&mut self, result: ConversionResult) {
        match result {
            ConversionResult::Success { html, warnings } => {
                self.html = html;
                self.warnings = warnings;
                self.error.clear();
            }
            ConversionResult::Failure { message } => {
                self.html.clear();
                self.warnings.clear();
                self.error = message;
            }
        }
        self.preview_cache = None;
        self.code_cache = None;
        self.sync_layout(self.terminal_area());
    }

    pub fn copy_acknowledgement(&self) -> CopyAcknowledgement {
        if self.copy_ack.is_pending() {
            CopyAcknowledgement::Copied
        } else {
            CopyAcknowledgement::Idle
        }
    }

    pub(crate) const fn acknowledge_copy(&mut self, now_ms: u64) {
        self.copy_ack.arm(now_ms);
    }

    /// Returns true when the acknowledgement just returned to idle.
    pub(super) fn expire_copy_ack(&mut self, now_ms: u64) -> bool {
        self.copy_ack.take_ready(now_ms)
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Drop every pending timer.
    pub(super) fn cancel_timers(&mut self) {
        self.copy_ack.cancel();
        self.toast = None;
    }

    /// Load the source file into the editor again.
    pub(super) fn reload_source_from_disk(&mut self) -> Result<()> {
        let Some(path) = &self.source_path else {
            return Ok(());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.editor.replace_text(&text);
        self.clamp_editor_scroll();
        Ok(())
    }

    /// Rows of source text visible in the input pane.
    pub fn editor_text_rows(&self) -> usize {
        let layout = crate::ui::app_layout(self.terminal_area(), self.diagnostic_count());
        usize::from(layout.editor_text.height)
    }

    /// Number of lines the diagnostics panel wants to show.
    pub fn diagnostic_count(&self) -> usize {
        self.error.lines().count() + self.warnings.len()
    }

    pub(super) fn clamp_editor_scroll(&mut self) {
        let max = self.editor.line_count().saturating_sub(1);
        self.editor_scroll_offset = self.editor_scroll_offset.min(max);
    }

    /// Fit the output viewport and caches to the pane inside `area`.
    pub fn sync_layout(&mut self, area: Rect) {
        let layout = crate::ui::app_layout(area, self.diagnostic_count());
        let text = layout.output_text;
        self.output_viewport.resize(text.width, text.height);
        let total = self.ensure_output_lines(text.width);
        self.output_viewport.set_total_lines(total);
    }

    /// Build the lines for the current view mode at `width`; returns their count.
    pub fn ensure_output_lines(&mut self, width: u16) -> usize {
        if self.html.is_empty() {
            return 0;
        }
        match self.view_mode {
            ViewMode::Preview => {
                if self.preview_cache.as_ref().is_none_or(|(w, _)| *w != width) {
                    let lines = crate::preview::render_preview(&self.html, usize::from(width));
                    self.preview_cache = Some((width, lines));
                }
                self.preview_cache.as_ref().map_or(0, |(_, lines)| lines.len())
            }
            ViewMode::Code => self
                .code_cache
                .get_or_insert_with(|| crate::highlight::highlight_html(&self.html))
                .len(),
        }
    }

    /// Preview lines laid out by the last [`Model::ensure_output_lines`].
    pub fn preview_lines(&self) -> &[String] {
        self.preview_cache
            .as_ref()
            .map(|(_, lines)| lines.as_slice())
            .unwrap_or_default()
    }

    /// Highlighted code lines built by the last [`Model::ensure_output_lines`].
    pub fn code_lines(&self) -> &[Line<'static>] {
        self.code_cache.as_deref().unwrap_or_default()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new("", None, (80, 24))
    }
}
