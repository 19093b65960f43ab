use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::app::{App, Message, Model};
use crate::editor::Direction;

const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(&self, event: &Event, model: &Model) -> Option<Message> {
        let _ = self;
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(*key, model),
            Event::Paste(text) if !model.help_visible => {
                Some(Message::EditorInsertStr(text.clone()))
            }
            Event::Mouse(mouse) => handle_mouse(*mouse, model),
            Event::Resize(width, height) => Some(Message::Resize(*width, *height)),
            _ => None,
        }
    }
}

pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        return match key.code {
            KeyCode::Up => Some(Message::HelpScrollUp(1)),
            KeyCode::Down => Some(Message::HelpScrollDown(1)),
            KeyCode::PageUp => Some(Message::HelpScrollUp(10)),
            KeyCode::PageDown => Some(Message::HelpScrollDown(10)),
            _ => Some(Message::HideHelp),
        };
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl {
        return match key.code {
            KeyCode::Char('q' | 'c') => Some(Message::Quit),
            KeyCode::Char('r') => Some(Message::Convert),
            KeyCode::Char('p') => Some(Message::ToggleViewMode),
            KeyCode::Char('y') => Some(Message::CopyOutput),
            KeyCode::Char('s') => Some(Message::DownloadOutput),
            KeyCode::Char('w') => Some(Message::ToggleWatch),
            KeyCode::Left => Some(Message::EditorMoveWordLeft),
            KeyCode::Right => Some(Message::EditorMoveWordRight),
            KeyCode::Home => Some(Message::EditorMoveToStart),
            KeyCode::End => Some(Message::EditorMoveToEnd),
            _ => None,
        };
    }

    if alt {
        return match key.code {
            KeyCode::Up => Some(Message::OutputScrollUp(1)),
            KeyCode::Down => Some(Message::OutputScrollDown(1)),
            KeyCode::PageUp => Some(Message::OutputPageUp),
            KeyCode::PageDown => Some(Message::OutputPageDown),
            KeyCode::Home => Some(Message::OutputTop),
            KeyCode::End => Some(Message::OutputBottom),
            _ => None,
        };
    }

    match key.code {
        KeyCode::F(1) => Some(Message::ToggleHelp),
        KeyCode::F(2) => Some(Message::ToggleViewMode),
        KeyCode::F(3) => Some(Message::CopyOutput),
        KeyCode::F(4) => Some(Message::DownloadOutput),
        KeyCode::F(5) => Some(Message::Convert),

        KeyCode::Up => Some(Message::EditorMoveCursor(Direction::Up)),
        KeyCode::Down => Some(Message::EditorMoveCursor(Direction::Down)),
        KeyCode::Left => Some(Message::EditorMoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::EditorMoveCursor(Direction::Right)),
        KeyCode::Home => Some(Message::EditorMoveHome),
        KeyCode::End => Some(Message::EditorMoveEnd),
        KeyCode::PageUp => Some(Message::EditorPageUp),
        KeyCode::PageDown => Some(Message::EditorPageDown),

        KeyCode::Enter => Some(Message::EditorSplitLine),
        KeyCode::Backspace => Some(Message::EditorDeleteBack),
        KeyCode::Delete => Some(Message::EditorDeleteForward),
        KeyCode::Tab => Some(Message::EditorInsertStr("  ".to_string())),
        KeyCode::Char(c) => Some(Message::EditorInsertChar(c)),
        _ => None,
    }
}

pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        return match mouse.kind {
            MouseEventKind::ScrollUp => Some(Message::HelpScrollUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown => Some(Message::HelpScrollDown(WHEEL_LINES)),
            _ => None,
        };
    }

    let layout = crate::ui::app_layout(model.terminal_area(), model.diagnostic_count());
    let pos = Position::new(mouse.column, mouse.row);
    let in_editor = layout.editor.contains(pos);
    let in_output = layout.output.contains(pos);

    match mouse.kind {
        MouseEventKind::ScrollUp if in_editor => Some(Message::EditorScrollUp(WHEEL_LINES)),
        MouseEventKind::ScrollDown if in_editor => Some(Message::EditorScrollDown(WHEEL_LINES)),
        MouseEventKind::ScrollUp if in_output => Some(Message::OutputScrollUp(WHEEL_LINES)),
        MouseEventKind::ScrollDown if in_output => Some(Message::OutputScrollDown(WHEEL_LINES)),
        MouseEventKind::Down(MouseButton::Left) => {
            editor_click_target(model, layout.editor_text, pos)
                .map(|(line, col)| Message::EditorMoveTo(line, col))
        }
        _ => None,
    }
}

// Buffer line and character column under a click in the editor text area.
fn editor_click_target(model: &Model, text_area: Rect, pos: Position) -> Option<(usize, usize)> {
    if !text_area.contains(pos) {
        return None;
    }
    let gutter = crate::ui::editor_gutter_width(model.editor.line_count());
    let line = model.editor_scroll_offset + usize::from(pos.y - text_area.y);
    if line >= model.editor.line_count() {
        let last = model.editor.line_count().saturating_sub(1);
        return Some((last, usize::MAX));
    }
    let content_width = text_area.width.saturating_sub(gutter);
    let h_offset = crate::ui::editor_h_offset(model, content_width);
    let col = usize::from((pos.x - text_area.x).saturating_sub(gutter)) + h_offset;
    Some((line, col))
}
