use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{ConversionStatus, Model, ToastLevel};

use super::style::Theme;

const KEY_HINTS: &str = "^R:convert  F2:view  F3:copy  F4:save  F1:help";

/// Bottom row: the active toast if any, otherwise file and conversion state.
pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect, theme: &Theme) {
    if area.height == 0 {
        return;
    }
    if let Some((message, level)) = model.active_toast() {
        render_toast_bar(message, level, frame, area);
        return;
    }

    let name = model
        .source_path
        .as_ref()
        .and_then(|p| p.file_name())
        .map_or_else(|| "sample".to_string(), |s| s.to_string_lossy().to_string());
    let cursor = model.editor.cursor();
    let col = model
        .editor
        .line_at(cursor.line)
        .map_or(0, |line| line[..cursor.col.min(line.len())].chars().count());
    let state = match model.status() {
        ConversionStatus::InFlight => super::CONVERTING_LABEL,
        ConversionStatus::Idle if !model.error().is_empty() => "Error",
        ConversionStatus::Idle => "Ready",
    };
    let watch = if model.watch_enabled { " [watching]" } else { "" };

    let left = format!(
        " {name}  Ln {}, Col {}  [{}]  {state}{watch}",
        cursor.line + 1,
        col + 1,
        model.view_mode.label(),
    );
    let width = usize::from(area.width);
    let text = if left.width() + KEY_HINTS.width() + 2 <= width {
        let gap = width - left.width() - KEY_HINTS.width();
        format!("{left}{}{KEY_HINTS}", " ".repeat(gap))
    } else {
        truncate_to_width(&left, width)
    };

    frame.render_widget(Paragraph::new(text).style(theme.status_bar()), area);
}

fn render_toast_bar(message: &str, level: ToastLevel, frame: &mut Frame, area: Rect) {
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let text = truncate_to_width(&format!(" {prefix} {message}"), usize::from(area.width));
    frame.render_widget(Paragraph::new(text).style(style), area);
}

/// Cut `text` to at most `width` display columns.
fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}
