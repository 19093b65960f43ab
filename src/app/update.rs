use crate::app::Model;
use crate::app::model::ViewMode;
use crate::convert::ConversionResult;
use crate::editor::Direction;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editor
    /// Insert a character at the cursor
    EditorInsertChar(char),
    /// Insert pasted text at the cursor
    EditorInsertStr(String),
    /// Delete character before cursor (Backspace)
    EditorDeleteBack,
    /// Delete character at cursor (Delete)
    EditorDeleteForward,
    /// Split line at cursor (Enter)
    EditorSplitLine,
    EditorMoveCursor(Direction),
    EditorMoveHome,
    EditorMoveEnd,
    EditorMoveWordLeft,
    EditorMoveWordRight,
    EditorMoveToStart,
    EditorMoveToEnd,
    /// Move cursor to a line and character column, e.g. from a mouse click
    EditorMoveTo(usize, usize),
    EditorScrollUp(usize),
    EditorScrollDown(usize),
    EditorPageUp,
    EditorPageDown,

    // Output pane
    ToggleViewMode,
    SetViewMode(ViewMode),
    OutputScrollUp(usize),
    OutputScrollDown(usize),
    OutputPageUp,
    OutputPageDown,
    OutputTop,
    OutputBottom,

    // Conversion
    /// Manual convert action
    Convert,
    /// A dispatched attempt finished
    ConversionFinished { seq: u64, result: ConversionResult },

    // Export
    CopyOutput,
    DownloadOutput,

    // File watching
    ToggleWatch,
    /// Source file changed on disk, reload it
    FileChanged,

    // Help
    ToggleHelp,
    HideHelp,
    HelpScrollUp(usize),
    HelpScrollDown(usize),

    // Window
    Resize(u16, u16),
    Redraw,

    Quit,
}

/// Pure function that updates the model based on a message.
///
/// Conversions, clipboard and file access are left to the effects layer.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::EditorInsertChar(ch) => {
            model.editor.insert_char(ch);
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorInsertStr(text) => {
            model.editor.insert_str(&text);
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorDeleteBack => {
            model.editor.delete_back();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorDeleteForward => {
            model.editor.delete_forward();
        }
        Message::EditorSplitLine => {
            model.editor.split_line();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveCursor(dir) => {
            model.editor.move_cursor(dir);
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveHome => model.editor.move_home(),
        Message::EditorMoveEnd => model.editor.move_end(),
        Message::EditorMoveWordLeft => {
            model.editor.move_word_left();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveWordRight => {
            model.editor.move_word_right();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveToStart => {
            model.editor.move_to_start();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveToEnd => {
            model.editor.move_to_end();
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorMoveTo(line, col) => {
            model.editor.move_to_column(line, col);
            editor_ensure_cursor_visible(&mut model);
        }
        Message::EditorScrollUp(n) => {
            model.editor_scroll_offset = model.editor_scroll_offset.saturating_sub(n);
        }
        Message::EditorScrollDown(n) => {
            model.editor_scroll_offset += n;
            model.clamp_editor_scroll();
        }
        Message::EditorPageUp => editor_page(&mut model, false),
        Message::EditorPageDown => editor_page(&mut model, true),

        Message::ToggleViewMode => {
            model.view_mode = model.view_mode.toggled();
            model.sync_layout(model.terminal_area());
        }
        Message::SetViewMode(mode) => {
            model.view_mode = mode;
            model.sync_layout(model.terminal_area());
        }
        Message::OutputScrollUp(n) => model.output_viewport.scroll_up(n),
        Message::OutputScrollDown(n) => model.output_viewport.scroll_down(n),
        Message::OutputPageUp => model.output_viewport.page_up(),
        Message::OutputPageDown => model.output_viewport.page_down(),
        Message::OutputTop => model.output_viewport.go_to_top(),
        Message::OutputBottom => model.output_viewport.go_to_bottom(),

        Message::ConversionFinished { seq, result } => {
            model.conversion_finished(seq, result);
        }

        Message::ToggleWatch => {
            model.watch_enabled = !model.watch_enabled;
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll_offset = 0;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::HelpScrollUp(n) => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_sub(n);
        }
        Message::HelpScrollDown(n) => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_add(n);
        }

        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.sync_layout(model.terminal_area());
            editor_ensure_cursor_visible(&mut model);
        }

        // Convert/CopyOutput/DownloadOutput/FileChanged: handled in effects
        Message::Convert
        | Message::CopyOutput
        | Message::DownloadOutput
        | Message::FileChanged
        | Message::Redraw => {}

        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}

// Move the cursor a pane's height, keeping its column.
fn editor_page(model: &mut Model, down: bool) {
    let rows = model.editor_text_rows().max(1);
    let cursor = model.editor.cursor();
    let target = if down {
        cursor.line + rows
    } else {
        cursor.line.saturating_sub(rows)
    };
    model.editor.move_to(target, cursor.col);
    editor_ensure_cursor_visible(model);
}

/// Ensure the editor cursor line is visible in the input pane.
fn editor_ensure_cursor_visible(model: &mut Model) {
    let cursor_line = model.editor.cursor().line;
    let visible_height = model.editor_text_rows();
    if visible_height == 0 {
        model.editor_scroll_offset = cursor_line;
        return;
    }

    if cursor_line < model.editor_scroll_offset {
        model.editor_scroll_offset = cursor_line;
    } else if cursor_line >= model.editor_scroll_offset + visible_height {
        model.editor_scroll_offset = cursor_line + 1 - visible_height;
    }
}
