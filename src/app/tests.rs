use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tempfile::tempdir;

use crate::convert::testing::{EchoCompiler, FailingCompiler, IdentityFormatter};
use crate::convert::{ConversionResult, Converter, EMPTY_INPUT_MESSAGE};
use crate::editor::Direction;
use crate::export::DOWNLOAD_FILE_NAME;
use crate::export::testing::{RecordingClipboard, UnavailableClipboard};

use super::effects::Runtime;
use super::input::{handle_key, handle_mouse};
use super::{
    App, COPY_ACK_MS, ConversionStatus, CopyAcknowledgement, DEFAULT_DEBOUNCE_MS, Message, Model,
    ToastLevel, ViewMode, update,
};

struct Harness {
    app: App,
    model: Model,
    runtime: Runtime,
    compiler: Arc<EchoCompiler>,
    clipboard: RecordingClipboard,
}

impl Harness {
    fn new(source: &str) -> Self {
        Self::with_app(source, |app| app)
    }

    fn with_app(source: &str, configure: impl FnOnce(App) -> App) -> Self {
        let compiler = Arc::new(EchoCompiler::default());
        let clipboard = RecordingClipboard::default();
        let app = configure(
            App::new()
                .with_source(PathBuf::from("news.mjml"), source.to_string())
                .with_converter(Converter::new(
                    compiler.clone(),
                    Arc::new(IdentityFormatter),
                ))
                .with_clipboard(Box::new(clipboard.clone())),
        );
        let mut model = app.initial_model((100, 30));
        let runtime = app.new_runtime(&mut model);
        Self {
            app,
            model,
            runtime,
            compiler,
            clipboard,
        }
    }

    fn send(&mut self, msg: Message, now_ms: u64) {
        self.app.dispatch(&mut self.model, &mut self.runtime, msg, now_ms);
    }

    fn tick(&mut self, now_ms: u64) -> bool {
        self.app.tick(
            &mut self.model,
            &mut self.runtime,
            now_ms,
            std::time::Instant::now(),
        )
    }

    fn type_text(&mut self, text: &str, start_ms: u64, step_ms: u64) -> u64 {
        let mut now = start_ms;
        for ch in text.chars() {
            self.send(Message::EditorInsertChar(ch), now);
            now += step_ms;
        }
        now - step_ms
    }

    /// Block until every dispatched attempt has been applied.
    fn settle(&mut self, now_ms: u64) {
        while self.model.in_flight() > 0 {
            let finished = self
                .runtime
                .worker
                .wait_finished()
                .expect("worker channel open");
            self.send(
                Message::ConversionFinished {
                    seq: finished.seq,
                    result: finished.result,
                },
                now_ms,
            );
        }
    }

    fn convert_now(&mut self) {
        self.send(Message::Convert, 0);
        self.settle(0);
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

// Debounce

#[test]
fn test_burst_of_edits_yields_one_conversion() {
    let mut h = Harness::new("");
    let last = h.type_text("Hello", 0, 100);
    assert_eq!(last, 400);

    h.tick(last + DEFAULT_DEBOUNCE_MS - 1);
    assert_eq!(h.model.status(), ConversionStatus::Idle);
    assert_eq!(h.compiler.call_count(), 0);

    h.tick(last + DEFAULT_DEBOUNCE_MS);
    assert_eq!(h.model.status(), ConversionStatus::InFlight);
    h.settle(last + DEFAULT_DEBOUNCE_MS);

    assert_eq!(h.compiler.call_count(), 1);
    assert_eq!(h.model.html(), "<table><tr><td>Hello</td></tr></table>");
    assert_eq!(h.model.status(), ConversionStatus::Idle);
}

#[test]
fn test_quiet_period_restarts_on_each_edit() {
    let mut h = Harness::new("");
    h.send(Message::EditorInsertChar('a'), 0);
    h.send(Message::EditorInsertChar('b'), 450);
    h.tick(600);
    assert_eq!(h.model.in_flight(), 0);
    h.tick(950);
    assert_eq!(h.model.in_flight(), 1);
    h.settle(950);
    assert_eq!(h.compiler.call_count(), 1);
}

#[test]
fn test_cursor_movement_does_not_schedule_conversion() {
    let mut h = Harness::new("<mjml></mjml>");
    h.send(Message::EditorMoveCursor(Direction::Right), 0);
    h.send(Message::EditorMoveEnd, 0);
    assert!(!h.runtime.debounce.is_pending());
    h.tick(10_000);
    assert_eq!(h.compiler.call_count(), 0);
}

#[test]
fn test_custom_debounce_delay() {
    let mut h = Harness::with_app("", |app| app.with_debounce_ms(50));
    h.send(Message::EditorInsertChar('x'), 0);
    h.tick(50);
    assert_eq!(h.model.in_flight(), 1);
    h.settle(50);
}

#[test]
fn test_edits_during_conversion_start_another_attempt() {
    let mut h = Harness::new("");
    h.send(Message::EditorInsertChar('a'), 0);
    h.tick(500);
    assert_eq!(h.model.in_flight(), 1);

    h.send(Message::EditorInsertChar('b'), 510);
    h.tick(1_010);
    h.settle(1_010);

    assert_eq!(h.compiler.call_count(), 2);
    assert_eq!(h.model.status(), ConversionStatus::Idle);
}

// Conversion outcomes

#[test]
fn test_blank_source_reports_empty_input_without_compiling() {
    let mut h = Harness::new("   \n\t");
    h.convert_now();
    assert_eq!(h.model.error(), EMPTY_INPUT_MESSAGE);
    assert!(h.model.html().is_empty());
    assert_eq!(h.compiler.call_count(), 0);
    assert_eq!(h.model.status(), ConversionStatus::Idle);
}

#[test]
fn test_deleting_everything_reports_empty_input() {
    let mut h = Harness::new("x");
    h.convert_now();
    assert!(h.model.has_output());

    h.send(Message::EditorMoveEnd, 0);
    h.send(Message::EditorDeleteBack, 0);
    h.tick(DEFAULT_DEBOUNCE_MS);

    assert_eq!(h.model.error(), EMPTY_INPUT_MESSAGE);
    assert!(!h.model.has_output());
}

#[test]
fn test_failure_clears_previous_output() {
    let mut h = Harness::new("<mjml></mjml>");
    h.convert_now();
    assert!(h.model.has_output());
    assert!(h.model.error().is_empty());

    let mut failing = Harness::with_app("<mjml>", |app| {
        app.with_converter(Converter::new(
            Arc::new(FailingCompiler("unclosed mjml tag")),
            Arc::new(IdentityFormatter),
        ))
    });
    failing.model.apply_conversion(ConversionResult::Success {
        html: "<p>old</p>".to_string(),
        warnings: vec!["stale".to_string()],
    });
    failing.convert_now();

    assert!(failing.model.html().is_empty());
    assert!(failing.model.warnings().is_empty());
    assert!(failing.model.error().contains("unclosed mjml tag"));
}

#[test]
fn test_success_carries_warnings_and_clears_error() {
    let compiler = Arc::new(EchoCompiler::with_warnings(&["unknown element <mj-shiny>"]));
    let mut h = Harness::with_app("<mj-shiny/>", |app| {
        app.with_converter(Converter::new(compiler, Arc::new(IdentityFormatter)))
    });
    h.model.apply_conversion(ConversionResult::Failure {
        message: "earlier failure".to_string(),
    });
    h.convert_now();

    assert!(h.model.error().is_empty());
    assert!(h.model.has_output());
    assert_eq!(h.model.warnings(), ["unknown element <mj-shiny>".to_string()]);
}

#[test]
fn test_convert_ignored_while_in_flight() {
    let mut h = Harness::new("<mjml></mjml>");
    h.send(Message::Convert, 0);
    h.send(Message::Convert, 0);
    assert_eq!(h.model.in_flight(), 1);
    h.settle(0);
    assert_eq!(h.compiler.call_count(), 1);
}

#[test]
fn test_older_attempt_finishing_last_wins() {
    let mut model = Model::new("<mjml></mjml>", None, (100, 30));
    model.conversion_started(1);
    model.conversion_started(2);
    assert_eq!(model.status(), ConversionStatus::InFlight);

    model.conversion_finished(
        2,
        ConversionResult::Success {
            html: "<p>newer</p>".to_string(),
            warnings: Vec::new(),
        },
    );
    assert_eq!(model.status(), ConversionStatus::InFlight);
    model.conversion_finished(
        1,
        ConversionResult::Success {
            html: "<p>older</p>".to_string(),
            warnings: Vec::new(),
        },
    );

    assert_eq!(model.html(), "<p>older</p>");
    assert_eq!(model.status(), ConversionStatus::Idle);
}

// Copy

#[test]
fn test_copy_acknowledgement_lasts_two_seconds() {
    let mut h = Harness::new("<mjml></mjml>");
    h.convert_now();

    h.send(Message::CopyOutput, 1_000);
    assert_eq!(h.model.copy_acknowledgement(), CopyAcknowledgement::Copied);
    assert_eq!(h.clipboard.copied.borrow().as_slice(), [h.model.html().to_string()]);

    assert!(!h.tick(1_000 + COPY_ACK_MS - 1));
    assert_eq!(h.model.copy_acknowledgement(), CopyAcknowledgement::Copied);
    assert!(h.tick(1_000 + COPY_ACK_MS));
    assert_eq!(h.model.copy_acknowledgement(), CopyAcknowledgement::Idle);
}

#[test]
fn test_copy_again_restarts_acknowledgement() {
    let mut h = Harness::new("<mjml></mjml>");
    h.convert_now();

    h.send(Message::CopyOutput, 0);
    h.send(Message::CopyOutput, 1_500);
    h.tick(COPY_ACK_MS);
    assert_eq!(h.model.copy_acknowledgement(), CopyAcknowledgement::Copied);
    h.tick(1_500 + COPY_ACK_MS);
    assert_eq!(h.model.copy_acknowledgement(), CopyAcknowledgement::Idle);
    assert_eq!(h.clipboard.copied.borrow().len(), 2);
}

#[test]
fn test_copy_without_output_does_nothing() {
    let mut h = Harness::new("<mjml></mjml>");
    h.send(Message::CopyOutput, 0);
    assert_eq!(h.model.copy_acknowledgement(), CopyAcknowledgement::Idle);
    assert!(h.clipboard.copied.borrow().is_empty());
}

#[test]
fn test_clipboard_failure_leaves_acknowledgement_idle() {
    let mut h = Harness::with_app("<mjml></mjml>", |app| {
        app.with_clipboard(Box::new(UnavailableClipboard))
    });
    h.convert_now();
    h.send(Message::CopyOutput, 0);
    assert_eq!(h.model.copy_acknowledgement(), CopyAcknowledgement::Idle);
}

#[test]
fn test_shutdown_cancels_pending_timers() {
    let mut h = Harness::new("<mjml></mjml>");
    h.convert_now();
    h.send(Message::CopyOutput, 0);
    h.send(Message::EditorInsertChar(' '), 0);

    h.runtime.shutdown(&mut h.model);

    assert_eq!(h.model.copy_acknowledgement(), CopyAcknowledgement::Idle);
    assert!(!h.runtime.debounce.is_pending());
}

// Download

#[test]
fn test_download_writes_newsletter_html() {
    let dir = tempdir().unwrap();
    let out = dir.path().to_path_buf();
    let mut h = Harness::with_app("<mjml></mjml>", |app| app.with_output_dir(out));
    h.convert_now();

    h.send(Message::DownloadOutput, 0);

    let written = std::fs::read_to_string(dir.path().join(DOWNLOAD_FILE_NAME)).unwrap();
    assert_eq!(written, h.model.html());
    assert_eq!(h.model.active_toast().map(|(_, level)| level), Some(ToastLevel::Info));
}

#[test]
fn test_download_without_output_writes_nothing() {
    let dir = tempdir().unwrap();
    let out = dir.path().to_path_buf();
    let mut h = Harness::with_app("<mjml></mjml>", |app| app.with_output_dir(out));

    h.send(Message::DownloadOutput, 0);

    assert!(!dir.path().join(DOWNLOAD_FILE_NAME).exists());
    assert!(h.model.active_toast().is_none());
}

#[test]
fn test_download_into_missing_directory_reports_error() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("missing").join("nested");
    let mut h = Harness::with_app("<mjml></mjml>", |app| app.with_output_dir(out));
    h.convert_now();

    h.send(Message::DownloadOutput, 0);

    assert_eq!(h.model.active_toast().map(|(_, level)| level), Some(ToastLevel::Error));
}

// Files

#[test]
fn test_file_change_reloads_source_and_schedules_conversion() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("news.mjml");
    std::fs::write(&path, "<mjml>old</mjml>").unwrap();

    let compiler = Arc::new(EchoCompiler::default());
    let app = App::new()
        .with_source(path.clone(), "<mjml>old</mjml>".to_string())
        .with_converter(Converter::new(compiler, Arc::new(IdentityFormatter)))
        .with_clipboard(Box::new(RecordingClipboard::default()));
    let mut model = app.initial_model((100, 30));
    let mut runtime = app.new_runtime(&mut model);

    std::fs::write(&path, "<mjml>new</mjml>").unwrap();
    app.dispatch(&mut model, &mut runtime, Message::FileChanged, 0);

    assert_eq!(model.editor.text(), "<mjml>new</mjml>");
    assert!(runtime.debounce.is_pending());
    assert_eq!(
        model.active_toast(),
        Some(("Reloaded from disk", ToastLevel::Info))
    );
}

#[test]
fn test_unchanged_file_does_not_schedule_conversion() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("news.mjml");
    std::fs::write(&path, "<mjml></mjml>").unwrap();

    let app = App::new().with_source(path, "<mjml></mjml>".to_string());
    let mut model = app.initial_model((100, 30));
    let mut runtime = app.new_runtime(&mut model);
    app.dispatch(&mut model, &mut runtime, Message::FileChanged, 0);

    assert!(!runtime.debounce.is_pending());
    assert!(model.active_toast().is_none());
}

#[test]
fn test_watch_without_source_file_is_refused() {
    let app = App::new();
    let mut model = app.initial_model((100, 30));
    let mut runtime = app.new_runtime(&mut model);

    app.dispatch(&mut model, &mut runtime, Message::ToggleWatch, 0);

    assert!(!model.watch_enabled);
    assert!(runtime.file_watcher.is_none());
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Warning));
}

#[test]
fn test_initial_model_takes_app_settings() {
    let dir = tempdir().unwrap();
    let app = App::new()
        .with_source(PathBuf::from("weekly.mjml"), "<mjml>weekly</mjml>".to_string())
        .with_output_dir(dir.path().to_path_buf())
        .with_config_paths(Some(PathBuf::from("/cfg/global")), None);
    let model = app.initial_model((120, 40));

    assert_eq!(model.editor.text(), "<mjml>weekly</mjml>");
    assert_eq!(model.source_path, Some(PathBuf::from("weekly.mjml")));
    assert_eq!(model.output_dir, dir.path());
    assert_eq!(model.config_global_path, Some(PathBuf::from("/cfg/global")));
    assert_eq!(model.terminal_size, (120, 40));
}

#[test]
fn test_startup_converts_once_without_edits() {
    let mut h = Harness::new("<mj-text>Hi</mj-text>");
    App::start(&mut h.model, &mut h.runtime);
    assert_eq!(h.model.status(), ConversionStatus::InFlight);
    h.settle(0);

    assert_eq!(h.compiler.call_count(), 1);
    assert_eq!(h.model.html(), "<table><tr><td><mj-text>Hi</mj-text></td></tr></table>");
    assert!(h.model.error().is_empty());
}

#[test]
fn test_startup_with_blank_source_reports_empty_input() {
    let mut h = Harness::new("  ");
    App::start(&mut h.model, &mut h.runtime);

    assert_eq!(h.compiler.call_count(), 0);
    assert_eq!(h.model.error(), EMPTY_INPUT_MESSAGE);
}

#[test]
fn test_default_app_starts_from_sample_newsletter() {
    let app = App::new();
    let model = app.initial_model((100, 30));
    assert!(model.editor.text().contains("<mjml>"));
    assert!(model.source_path.is_none());
}

// Update

#[test]
fn test_toggle_view_mode_switches_between_preview_and_code() {
    let model = Model::default();
    assert_eq!(model.view_mode, ViewMode::Preview);
    let model = update(model, Message::ToggleViewMode);
    assert_eq!(model.view_mode, ViewMode::Code);
    let model = update(model, Message::ToggleViewMode);
    assert_eq!(model.view_mode, ViewMode::Preview);
}

#[test]
fn test_editing_bumps_revision() {
    let model = Model::new("ab", None, (80, 24));
    let before = model.editor.revision();
    let model = update(model, Message::EditorInsertChar('c'));
    assert!(model.editor.revision() > before);
    assert_eq!(model.editor.text(), "cab");
}

#[test]
fn test_paste_inserts_text_at_cursor() {
    let model = Model::new("<mjml></mjml>", None, (80, 24));
    let model = update(model, Message::EditorMoveCursor(Direction::Right));
    let model = update(model, Message::EditorInsertStr("X\r\nY".to_string()));
    assert_eq!(model.editor.text(), "<X\nYmjml></mjml>");
}

#[test]
fn test_typing_past_bottom_scrolls_editor() {
    let mut model = Model::new("", None, (80, 12));
    for _ in 0..40 {
        model = update(model, Message::EditorSplitLine);
    }
    let rows = model.editor_text_rows();
    assert!(rows > 0);
    assert_eq!(model.editor_scroll_offset, 40 + 1 - rows);
}

#[test]
fn test_output_scrolling_is_clamped() {
    let html = (0..200)
        .map(|i| format!("<p>line {i}</p>"))
        .collect::<String>();
    let mut model = Model::new("<mjml></mjml>", None, (100, 30));
    model.apply_conversion(ConversionResult::Success {
        html,
        warnings: Vec::new(),
    });
    let model = update(model, Message::OutputScrollDown(100_000));
    assert!(!model.output_viewport.can_scroll_down());
    let model = update(model, Message::OutputTop);
    assert_eq!(model.output_viewport.offset(), 0);
}

#[test]
fn test_resize_updates_output_viewport() {
    let model = Model::new("<mjml></mjml>", None, (100, 30));
    let model = update(model, Message::Resize(60, 20));
    assert_eq!(model.terminal_size, (60, 20));
    assert!(model.output_viewport.width() < 30);
}

#[test]
fn test_help_toggle_resets_scroll() {
    let model = Model::default();
    let model = update(model, Message::ToggleHelp);
    let model = update(model, Message::HelpScrollDown(4));
    assert_eq!(model.help_scroll_offset, 4);
    let model = update(model, Message::HideHelp);
    let model = update(model, Message::ToggleHelp);
    assert!(model.help_visible);
    assert_eq!(model.help_scroll_offset, 0);
}

#[test]
fn test_quit_sets_should_quit() {
    let model = update(Model::default(), Message::Quit);
    assert!(model.should_quit);
}

// Input

#[test]
fn test_function_and_control_keys_map_to_actions() {
    let model = Model::default();
    assert_eq!(handle_key(key(KeyCode::F(2)), &model), Some(Message::ToggleViewMode));
    assert_eq!(handle_key(key(KeyCode::F(3)), &model), Some(Message::CopyOutput));
    assert_eq!(handle_key(key(KeyCode::F(4)), &model), Some(Message::DownloadOutput));
    assert_eq!(handle_key(key(KeyCode::F(5)), &model), Some(Message::Convert));
    assert_eq!(handle_key(ctrl('y'), &model), Some(Message::CopyOutput));
    assert_eq!(handle_key(ctrl('s'), &model), Some(Message::DownloadOutput));
    assert_eq!(handle_key(ctrl('q'), &model), Some(Message::Quit));
}

#[test]
fn test_plain_keys_edit_source() {
    let model = Model::default();
    assert_eq!(
        handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::EditorInsertChar('q'))
    );
    assert_eq!(handle_key(key(KeyCode::Enter), &model), Some(Message::EditorSplitLine));
    assert_eq!(
        handle_key(key(KeyCode::Tab), &model),
        Some(Message::EditorInsertStr("  ".to_string()))
    );
    assert_eq!(
        handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::ALT), &model),
        Some(Message::OutputScrollDown(1))
    );
}

#[test]
fn test_any_key_closes_help() {
    let mut model = Model::default();
    model.help_visible = true;
    assert_eq!(handle_key(key(KeyCode::Char('x')), &model), Some(Message::HideHelp));
    assert_eq!(handle_key(key(KeyCode::Down), &model), Some(Message::HelpScrollDown(1)));
}

#[test]
fn test_paste_event_becomes_insert() {
    let app = App::new();
    let model = Model::default();
    assert_eq!(
        app.handle_event(&Event::Paste("<mj-text/>".to_string()), &model),
        Some(Message::EditorInsertStr("<mj-text/>".to_string()))
    );
}

#[test]
fn test_click_in_editor_moves_cursor() {
    let model = Model::new("<mjml>\n  <mj-body/>\n</mjml>", None, (100, 30));
    let layout = crate::ui::app_layout(model.terminal_area(), 0);
    let gutter = crate::ui::editor_gutter_width(3);
    let mouse = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: layout.editor_text.x + gutter + 4,
        row: layout.editor_text.y + 1,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(handle_mouse(mouse, &model), Some(Message::EditorMoveTo(1, 4)));
}

#[test]
fn test_wheel_scrolls_pane_under_pointer() {
    let model = Model::new("<mjml></mjml>", None, (100, 30));
    let layout = crate::ui::app_layout(model.terminal_area(), 0);
    let over_output = MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: layout.output.x + 2,
        row: layout.output.y + 2,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(handle_mouse(over_output, &model), Some(Message::OutputScrollDown(3)));
    let over_editor = MouseEvent {
        column: layout.editor.x + 2,
        ..over_output
    };
    assert_eq!(handle_mouse(over_editor, &model), Some(Message::EditorScrollDown(3)));
}
