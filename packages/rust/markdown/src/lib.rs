//! Markdown-to-plain-text rendering.
//!
//! Turns the model's Markdown answer into text that reads well in a surface
//! without rich-text support. Structure survives as whitespace and
//! punctuation: headings become ruled or underlined blocks, emphasis becomes
//! case, and fenced code is set off by horizontal rules and passed through
//! untouched.
//!
//! This is not a Markdown parser. Input is scanned line by line and the only
//! state carried between lines is whether we are inside a code fence.

mod inline;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Width of the rule emitted for a code fence.
const FENCE_RULE_WIDTH: usize = 50;

/// Width of the `=` rule around a level-1 heading.
const H1_RULE_WIDTH: usize = 50;

/// Width of the `-` rule around a level-2 heading.
const H2_RULE_WIDTH: usize = 40;

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Render Markdown text as plain text.
///
/// Never fails: malformed input renders best-effort. An unclosed fence leaves
/// the rest of the document in verbatim mode.
///
/// Rendering the output again is a no-op unless the input had fenced code or
/// inline markers inside heading text. Neither survives a second pass intact:
/// fenced content is no longer fenced, and heading text was never substituted.
pub fn render_plain_text(markdown: &str) -> String {
    let rendered = markdown
        .split('\n')
        .fold(RenderState::default(), RenderState::push_line);

    if rendered.in_code_block {
        debug!("unterminated code fence, remainder rendered verbatim");
    }

    rendered.lines.join("\n").trim().to_string()
}

/// Fold accumulator: the fence flag plus everything emitted so far.
#[derive(Debug, Default)]
struct RenderState {
    in_code_block: bool,
    lines: Vec<String>,
}

impl RenderState {
    fn push_line(mut self, line: &str) -> Self {
        if is_fence(line) {
            self.in_code_block = !self.in_code_block;
            self.lines
                .push(format!("\n{}\n", "-".repeat(FENCE_RULE_WIDTH)));
        } else if self.in_code_block {
            self.lines.push(line.to_string());
        } else {
            self.lines.push(render_line(line));
        }
        self
    }
}

/// A fence is three backticks, optionally followed by a language tag.
fn is_fence(line: &str) -> bool {
    static FENCE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^```[^`\s]*$").expect("valid regex"));

    FENCE_RE.is_match(line.trim())
}

/// Render one line outside a code block.
fn render_line(line: &str) -> String {
    if let Some(text) = line.strip_prefix("### ") {
        let heading = inline::title_case(text.trim());
        let underline = "-".repeat(heading.chars().count());
        return format!("\n{heading}\n{underline}");
    }

    if let Some(text) = line.strip_prefix("## ") {
        return ruled_heading(text, '-', H2_RULE_WIDTH);
    }

    if let Some(text) = line.strip_prefix("# ") {
        return ruled_heading(text, '=', H1_RULE_WIDTH);
    }

    inline::substitute(line)
}

/// Upper-cased heading between two rules, preceded by a blank line.
fn ruled_heading(text: &str, rule_char: char, width: usize) -> String {
    let rule = rule_char.to_string().repeat(width);
    format!("\n{rule}\n{}\n{rule}", text.trim().to_uppercase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
