//! Syntax highlighting for the generated HTML in code view.
//!
//! Uses syntect with its bundled Sublime Text definitions.

use std::sync::{Mutex, OnceLock};

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundMode {
    Dark,
    Light,
}

/// Terminal background override set from `--theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<HighlightBackground>>> = OnceLock::new();

/// Highlight `code` as HTML, one ratatui line per source line.
///
/// Only foreground colours are set so the pane background shows through.
/// Falls back to unstyled lines if the syntax cannot be highlighted.
pub fn highlight_html(code: &str) -> Vec<Line<'static>> {
    let syntax_set = syntax_set();
    let Some(syntax) = syntax_set.find_syntax_by_extension("html") else {
        return plain_lines(code);
    };
    let mode = background_mode();
    let mut highlighter = HighlightLines::new(syntax, theme(mode));

    let mut lines = Vec::new();
    for line in LinesWithEndings::from(code) {
        let ranges = match highlighter.highlight_line(line, syntax_set) {
            Ok(ranges) => ranges,
            Err(err) => {
                tracing::warn!(%err, "html highlighting failed");
                return plain_lines(code);
            }
        };
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .filter_map(|(style, text)| {
                let text = text.trim_end_matches(['\n', '\r']);
                if text.is_empty() {
                    return None;
                }
                let fg = adjust_fg_for_background(
                    (style.foreground.r, style.foreground.g, style.foreground.b),
                    mode,
                );
                Some(Span::styled(
                    text.to_string(),
                    Style::default().fg(Color::Rgb(fg.0, fg.1, fg.2)),
                ))
            })
            .collect();
        lines.push(Line::from(spans));
    }
    lines
}

fn plain_lines(code: &str) -> Vec<Line<'static>> {
    code.lines().map(|line| Line::raw(line.to_string())).collect()
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme(mode: BackgroundMode) -> &'static Theme {
    static THEMES: OnceLock<(Theme, Theme)> = OnceLock::new();
    let (dark, light) = THEMES.get_or_init(|| {
        let theme_set = ThemeSet::load_defaults();
        let pick = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| theme_set.themes.get(*name).cloned())
                .or_else(|| theme_set.themes.values().next().cloned())
                .unwrap_or_default()
        };
        (
            pick(&["base16-ocean.dark", "Solarized (dark)"]),
            pick(&["InspiredGitHub", "Solarized (light)", "base16-ocean.light"]),
        )
    });
    match mode {
        BackgroundMode::Dark => dark,
        BackgroundMode::Light => light,
    }
}

pub fn set_background_mode(mode: Option<HighlightBackground>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(mut guard) = lock.lock() {
        *guard = mode;
    }
}

/// True when highlighting targets a light terminal background.
pub fn is_light_background() -> bool {
    background_mode() == BackgroundMode::Light
}

fn background_mode() -> BackgroundMode {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(guard) = lock.lock()
        && let Some(mode) = *guard
    {
        return match mode {
            HighlightBackground::Light => BackgroundMode::Light,
            HighlightBackground::Dark => BackgroundMode::Dark,
        };
    }
    background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Dark;
    };
    let bg = value.rsplit(';').next().unwrap_or(value);
    match bg.parse::<u8>() {
        Ok(bg) if bg >= 7 => BackgroundMode::Light,
        _ => BackgroundMode::Dark,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn adjust_fg_for_background(rgb: (u8, u8, u8), mode: BackgroundMode) -> (u8, u8, u8) {
    if mode == BackgroundMode::Dark {
        return rgb;
    }
    let (r, g, b) = (f32::from(rgb.0), f32::from(rgb.1), f32::from(rgb.2));
    let luma = 0.0722f32.mul_add(b, 0.2126f32.mul_add(r, 0.7152 * g));
    if luma < 155.0 {
        return rgb;
    }
    let darken = |c: f32| (c * 0.42).round() as u8;
    (darken(r), darken(g), darken(b))
}
