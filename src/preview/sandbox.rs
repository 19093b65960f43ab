//! Strip active content from generated HTML before it is laid out.
//!
//! The output is untrusted markup from the user's own source. Nothing in it
//! is executed, and the preview never sees scripts, embedded documents,
//! event handlers or `javascript:` links.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Elements removed together with everything inside them.
const BLOCKED_ELEMENTS: &[&str] = &[
    "head", "script", "style", "iframe", "object", "embed", "noscript", "template",
];

// One pattern per element: the regex crate has no backreferences to pair
// an opening tag with its own closing tag.
static BLOCKED_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    BLOCKED_ELEMENTS
        .iter()
        .filter_map(|name| Regex::new(&format!(r"(?is)<{name}\b[^>]*>.*?</{name}\s*>")).ok())
        .collect()
});
static BLOCKED_TAGS: Lazy<Regex> = Lazy::new(|| {
    let names = BLOCKED_ELEMENTS.join("|");
    Regex::new(&format!(r"(?i)</?(?:{names})\b[^>]*>")).expect("tag pattern compiles")
});
static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern compiles"));
static OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[A-Za-z][^>]*>").expect("open tag pattern compiles"));
static EVENT_HANDLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("event handler pattern compiles")
});
static SCRIPT_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(href|src|action|formaction|background)\s*=\s*(?:"\s*javascript:[^"]*"|'\s*javascript:[^']*'|javascript:[^\s>]*)"#,
    )
    .expect("script url pattern compiles")
});

/// Return `html` with every active construct removed.
pub fn isolate(html: &str) -> String {
    let mut text = COMMENT.replace_all(html, "").into_owned();
    for block in BLOCKED_BLOCKS.iter() {
        if let Cow::Owned(stripped) = block.replace_all(&text, "") {
            text = stripped;
        }
    }
    // Unclosed or self-closing leftovers.
    let text = BLOCKED_TAGS.replace_all(&text, "");
    OPEN_TAG
        .replace_all(&text, |caps: &Captures<'_>| defuse_tag(&caps[0]))
        .into_owned()
}

fn defuse_tag(tag: &str) -> String {
    let tag = EVENT_HANDLER.replace_all(tag, "");
    SCRIPT_URL.replace_all(&tag, r##"$1="#""##).into_owned()
}
