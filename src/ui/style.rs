//! Theming and color definitions.
//!
//! Uses ANSI and 256-color indexes that adapt to the terminal's palette.

use ratatui::style::{Color, Modifier, Style};

/// Colors for every part of the screen.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Pane borders and titles
    pub border: Style,
    /// Line number gutter
    pub gutter: Style,
    /// Block cursor in the editor
    pub cursor: Style,
    /// Compiler error text under the editor
    pub error: Style,
    /// Warning text under the editor
    pub warning: Style,
    /// Output placeholder
    pub placeholder: Style,
    /// "Converting..." label
    pub busy: Style,
    /// "Copied!" acknowledgement
    pub copied: Style,
    /// Active view mode in the output title
    pub mode_active: Style,
    pub mode_inactive: Style,
    pub status_bg: Color,
    pub status_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::Indexed(244)),
            gutter: Style::default().fg(Color::DarkGray),
            cursor: Style::default().bg(Color::White).fg(Color::Black),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),
            placeholder: Style::default()
                .fg(Color::Indexed(245))
                .add_modifier(Modifier::ITALIC),
            busy: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            copied: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            mode_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            mode_inactive: Style::default().fg(Color::Indexed(245)),
            status_bg: Color::Indexed(236),
            status_fg: Color::Indexed(252),
        }
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self::default()
    }

    pub fn light() -> Self {
        Self {
            border: Style::default().fg(Color::Indexed(240)),
            gutter: Style::default().fg(Color::Indexed(246)),
            cursor: Style::default().bg(Color::Black).fg(Color::White),
            error: Style::default()
                .fg(Color::Indexed(124))
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Indexed(130)),
            placeholder: Style::default()
                .fg(Color::Indexed(242))
                .add_modifier(Modifier::ITALIC),
            busy: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::BOLD),
            copied: Style::default()
                .fg(Color::Indexed(28))
                .add_modifier(Modifier::BOLD),
            mode_active: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            mode_inactive: Style::default().fg(Color::Indexed(242)),
            status_bg: Color::Indexed(252),
            status_fg: Color::Indexed(236),
        }
    }

    /// Theme matching the detected or configured terminal background.
    pub fn current() -> Self {
        if crate::highlight::is_light_background() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    pub fn status_bar(&self) -> Style {
        Style::default().bg(self.status_bg).fg(self.status_fg)
    }
}
