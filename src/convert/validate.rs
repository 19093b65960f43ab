//! Soft validation: flag `mj-*` elements that MJML does not register.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static ELEMENT_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(mj-[A-Za-z0-9_-]+)").expect("element pattern compiles"));
static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern compiles"));

/// Every component and head element known to MJML.
const REGISTERED_ELEMENTS: &[&str] = &[
    "mj-accordion",
    "mj-accordion-element",
    "mj-accordion-text",
    "mj-accordion-title",
    "mj-all",
    "mj-attributes",
    "mj-body",
    "mj-breakpoint",
    "mj-button",
    "mj-carousel",
    "mj-carousel-image",
    "mj-class",
    "mj-column",
    "mj-divider",
    "mj-font",
    "mj-group",
    "mj-head",
    "mj-hero",
    "mj-html-attribute",
    "mj-html-attributes",
    "mj-image",
    "mj-include",
    "mj-navbar",
    "mj-navbar-link",
    "mj-preview",
    "mj-raw",
    "mj-section",
    "mj-selector",
    "mj-social",
    "mj-social-element",
    "mj-spacer",
    "mj-style",
    "mj-table",
    "mj-text",
    "mj-title",
    "mj-wrapper",
];

/// An `mj-*` element the compiler will not treat as a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownElement {
    pub name: String,
    /// One-based source line of the opening tag.
    pub line: usize,
}

impl fmt::Display for UnknownElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}: element <{}> doesn't exist or is not registered",
            self.line, self.name
        )
    }
}

pub fn is_registered_element(name: &str) -> bool {
    REGISTERED_ELEMENTS.binary_search(&name).is_ok()
}

/// Scan `source` for unregistered `mj-*` opening tags, in source order.
///
/// Tags inside XML comments are ignored.
pub fn unknown_elements(source: &str) -> Vec<UnknownElement> {
    let masked = mask_comments(source);
    ELEMENT_OPEN
        .captures_iter(&masked)
        .filter_map(|caps| {
            let name = caps.get(1)?;
            if is_registered_element(name.as_str()) {
                return None;
            }
            let line = masked[..name.start()].matches('\n').count() + 1;
            Some(UnknownElement {
                name: name.as_str().to_string(),
                line,
            })
        })
        .collect()
}

// Blank out comments but keep their newlines so line numbers stay true.
fn mask_comments(source: &str) -> String {
    let mut masked = String::with_capacity(source.len());
    let mut last = 0;
    for comment in COMMENT.find_iter(source) {
        masked.push_str(&source[last..comment.start()]);
        masked.extend(
            comment
                .as_str()
                .chars()
                .map(|c| if c == '\n' { '\n' } else { ' ' }),
        );
        last = comment.end();
    }
    masked.push_str(&source[last..]);
    masked
}
