use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::app::{ConversionStatus, CopyAcknowledgement, Model, ViewMode};

use super::style::Theme;
use super::{
    COPIED_LABEL, CONVERTING_LABEL, EDITOR_WIDTH_PERCENT, INPUT_TITLE, MAX_DIAGNOSTIC_ROWS,
    OUTPUT_PLACEHOLDER, OUTPUT_TITLE, overlays, status,
};

/// Screen regions, shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    /// Input pane including its border
    pub editor: Rect,
    /// Gutter and source text inside the input pane
    pub editor_text: Rect,
    /// Error and warning panel under the input pane; zero-sized when empty
    pub diagnostics: Rect,
    /// Output pane including its border
    pub output: Rect,
    /// Preview or code text inside the output pane
    pub output_text: Rect,
    pub status: Rect,
}

/// Split `area` into panes; `diagnostic_count` sizes the panel under the editor.
pub fn app_layout(area: Rect, diagnostic_count: usize) -> AppLayout {
    let [main, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    let [left, output] = Layout::horizontal([
        Constraint::Percentage(EDITOR_WIDTH_PERCENT),
        Constraint::Percentage(100 - EDITOR_WIDTH_PERCENT),
    ])
    .areas(main);

    let diagnostic_rows = if diagnostic_count == 0 {
        0
    } else {
        u16::try_from(diagnostic_count)
            .unwrap_or(u16::MAX)
            .min(MAX_DIAGNOSTIC_ROWS)
            + 2
    };
    let [editor, diagnostics] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(diagnostic_rows)]).areas(left);

    AppLayout {
        editor,
        editor_text: Block::bordered().inner(editor),
        diagnostics,
        output,
        output_text: Block::bordered().inner(output),
        status,
    }
}

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    model.terminal_size = (area.width, area.height);
    model.sync_layout(area);

    let theme = Theme::current();
    let layout = app_layout(area, model.diagnostic_count());

    render_editor(model, frame, &layout, &theme);
    if layout.diagnostics.height > 0 {
        render_diagnostics(model, frame, layout.diagnostics, &theme);
    }
    render_output(model, frame, &layout, &theme);
    status::render_status_bar(model, frame, layout.status, &theme);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, layout: &AppLayout, theme: &Theme) {
    let block = Block::bordered()
        .title(format!(" {INPUT_TITLE} "))
        .border_style(theme.border);
    frame.render_widget(Clear, layout.editor);
    frame.render_widget(block, layout.editor);

    let text_area = layout.editor_text;
    let buf = &model.editor;
    let total_lines = buf.line_count();
    let gutter = editor_gutter_width(total_lines);
    let content_width = text_area.width.saturating_sub(gutter);
    let h_offset = editor_h_offset(model, content_width);
    let visible_cols = usize::from(content_width);
    let cursor = buf.cursor();

    let start = model.editor_scroll_offset;
    let end = (start + usize::from(text_area.height)).min(total_lines);

    let mut content: Vec<Line> = Vec::with_capacity(end.saturating_sub(start));
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let number = format!(
            "{:>width$} ",
            line_idx + 1,
            width = usize::from(gutter.saturating_sub(1))
        );
        let mut spans = vec![Span::styled(number, theme.gutter)];

        let chars: Vec<char> = line_text
            .chars()
            .skip(h_offset)
            .take(visible_cols)
            .collect();
        if line_idx == cursor.line {
            let cursor_col = line_text[..cursor.col.min(line_text.len())]
                .chars()
                .count()
                .saturating_sub(h_offset);
            let before: String = chars.iter().take(cursor_col).collect();
            let under = chars.get(cursor_col).map_or_else(|| " ".to_string(), char::to_string);
            let after: String = chars.iter().skip(cursor_col + 1).collect();
            if !before.is_empty() {
                spans.push(Span::raw(before));
            }
            spans.push(Span::styled(under, theme.cursor));
            if !after.is_empty() {
                spans.push(Span::raw(after));
            }
        } else {
            spans.push(Span::raw(chars.into_iter().collect::<String>()));
        }
        content.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(content), text_area);
}

fn render_diagnostics(model: &Model, frame: &mut Frame, area: Rect, theme: &Theme) {
    let (title, style) = if model.error().is_empty() {
        (format!(" Warnings ({}) ", model.warnings().len()), theme.warning)
    } else {
        (" Error ".to_string(), theme.error)
    };
    let lines: Vec<Line> = model
        .error()
        .lines()
        .map(|line| Line::styled(line.to_string(), theme.error))
        .chain(
            model
                .warnings()
                .iter()
                .map(|warning| Line::styled(format!("- {warning}"), theme.warning)),
        )
        .collect();

    let block = Block::bordered()
        .title(title)
        .border_style(style)
        .title_style(style);
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_output(model: &Model, frame: &mut Frame, layout: &AppLayout, theme: &Theme) {
    let mut badges: Vec<Span> = Vec::new();
    if model.status() == ConversionStatus::InFlight {
        badges.push(Span::styled(format!(" {CONVERTING_LABEL} "), theme.busy));
    }
    if model.copy_acknowledgement() == CopyAcknowledgement::Copied {
        badges.push(Span::styled(format!(" {COPIED_LABEL} "), theme.copied));
    }
    for mode in [ViewMode::Preview, ViewMode::Code] {
        let style = if mode == model.view_mode {
            theme.mode_active
        } else {
            theme.mode_inactive
        };
        badges.push(Span::styled(format!(" {} ", mode.label()), style));
    }
    badges.push(Span::raw(" "));

    let block = Block::bordered()
        .title(format!(" {OUTPUT_TITLE} "))
        .title(Line::from(badges).right_aligned())
        .border_style(theme.border);
    frame.render_widget(Clear, layout.output);
    frame.render_widget(block, layout.output);

    let text_area = layout.output_text;
    if !model.has_output() {
        let placeholder = Paragraph::new(Line::styled(OUTPUT_PLACEHOLDER, theme.placeholder))
            .alignment(Alignment::Center);
        let middle = Rect {
            y: text_area.y + text_area.height / 2,
            height: text_area.height.min(1),
            ..text_area
        };
        frame.render_widget(placeholder, middle);
        return;
    }

    let range = model.output_viewport.visible_range();
    let lines: Vec<Line> = match model.view_mode {
        ViewMode::Preview => model
            .preview_lines()
            .get(range)
            .unwrap_or_default()
            .iter()
            .map(|line| Line::raw(line.as_str()))
            .collect(),
        ViewMode::Code => model
            .code_lines()
            .get(range)
            .unwrap_or_default()
            .to_vec(),
    };
    frame.render_widget(Paragraph::new(lines), text_area);
}

/// Width of the line number gutter, including its trailing space.
pub const fn editor_gutter_width(total_lines: usize) -> u16 {
    line_number_width(total_lines) + 1
}

/// Columns the editor is scrolled right so the cursor stays in view.
pub fn editor_h_offset(model: &Model, content_width: u16) -> usize {
    let width = usize::from(content_width);
    if width == 0 {
        return 0;
    }
    let cursor = model.editor.cursor();
    let line = model.editor.line_at(cursor.line).unwrap_or_default();
    let cursor_col = line[..cursor.col.min(line.len())].chars().count();
    if cursor_col >= width {
        cursor_col + 1 - width
    } else {
        0
    }
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
