//! Per-line inline substitutions for body text.
//!
//! Each pass is a function `&str -> String` applied in a fixed order:
//! bold, italic, inline code, then stray tags.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Run every inline pass over a single body line.
pub(crate) fn substitute(line: &str) -> String {
    let mut result = replace_bold(line);
    result = replace_italic(&result);
    result = replace_inline_code(&result);
    result = strip_tags(&result);
    result
}

/// `**text**` → `TEXT`.
fn replace_bold(line: &str) -> String {
    static BOLD_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));

    BOLD_RE
        .replace_all(line, |caps: &Captures| caps[1].to_uppercase())
        .into_owned()
}

/// `*text*` → `Text`. Runs after bold, so only single markers remain.
fn replace_italic(line: &str) -> String {
    static ITALIC_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("valid regex"));

    ITALIC_RE
        .replace_all(line, |caps: &Captures| capitalize(&caps[1]))
        .into_owned()
}

/// `` `text` `` → `[text]`.
fn replace_inline_code(line: &str) -> String {
    static CODE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));

    CODE_RE.replace_all(line, "[$1]").into_owned()
}

/// Remove anything that looks like an HTML tag, keeping surrounding text.
fn strip_tags(line: &str) -> String {
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("valid regex"));

    TAG_RE.replace_all(line, "").into_owned()
}

/// Upper-case the first character and leave the rest as written.
///
/// The tail is not lower-cased: `already Capital` becomes `Already Capital`,
/// `iPhone` becomes `IPhone`.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalize every whitespace-separated word, preserving the spacing.
///
/// Same rule as [`capitalize`]: only each word's first character changes, so
/// `API reference` becomes `API Reference`.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
