use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::{COPY_ACK_MS, Model};
use crate::export::DOWNLOAD_FILE_NAME;

fn help_lines(model: &Model) -> Vec<Line<'static>> {
    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.push(Line::styled("Actions", section_style));
    lines.push(Line::raw("  F5 / Ctrl-r         Convert now"));
    lines.push(Line::raw(format!(
        "  F3 / Ctrl-y         Copy HTML ({}s acknowledgement)",
        COPY_ACK_MS / 1_000
    )));
    lines.push(Line::raw(format!(
        "  F4 / Ctrl-s         Save HTML as {DOWNLOAD_FILE_NAME}"
    )));
    lines.push(Line::raw("  Ctrl-w              Toggle watching the source file"));
    lines.push(Line::raw("  Ctrl-q / Ctrl-c     Quit"));
    lines.push(Line::raw("  F1                  Toggle help"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Editing", section_style));
    lines.push(Line::raw("  Type / paste        Edit MJML (converts after a pause)"));
    lines.push(Line::raw("  Arrows, Home/End    Move cursor"));
    lines.push(Line::raw("  Ctrl+Left/Right     Word movement"));
    lines.push(Line::raw("  Ctrl+Home/End       Buffer start / end"));
    lines.push(Line::raw("  PageUp/PageDown     Page the editor"));
    lines.push(Line::raw("  Tab                 Insert two spaces"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Output", section_style));
    lines.push(Line::raw("  F2 / Ctrl-p         Toggle Preview / Code"));
    lines.push(Line::raw("  Alt+Up/Down         Scroll output"));
    lines.push(Line::raw("  Alt+PageUp/PageDown Page output"));
    lines.push(Line::raw("  Alt+Home/End        Output top / bottom"));
    lines.push(Line::raw("  Mouse wheel         Scroll pane under pointer"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Files", section_style));
    lines.push(Line::raw(format!(
        "  Output dir: {}",
        model.output_dir.display()
    )));
    lines.push(Line::raw(format!("  Global config: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    lines
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(6).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let all_lines = help_lines(model);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Last row holds the footer hint.
    let content_height = inner.height.saturating_sub(1);
    let max_scroll = all_lines.len().saturating_sub(usize::from(content_height));
    let scroll = model.help_scroll_offset.min(max_scroll);
    let end = (scroll + usize::from(content_height)).min(all_lines.len());
    let visible: Vec<Line> = all_lines[scroll..end].to_vec();

    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
    frame.render_widget(Paragraph::new(visible), content_area);

    if inner.height > 0 {
        let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
        let footer = Line::styled("Up/Down scroll \u{2502} any other key closes", dim_style);
        frame.render_widget(Paragraph::new(footer), footer_area);
    }
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
