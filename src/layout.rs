//! Width-aware message layout.
//!
//! Reflows a message body into lines that fit a rendering budget (terminal
//! width minus the already-emitted header prefix). Embedded line breaks are
//! hard breaks; blank segments are dropped; words wider than the budget are
//! split hard at the budget. The budget is computed by the renderer against
//! the *live* terminal width on every call — nothing here caches widths.

use crate::ansi::visible_width;

/// Branch connector for a non-final field line.
pub const BRANCH: char = '├';
/// Terminal connector for the final field line, also the head of the
/// closing rule.
pub const TERMINAL: char = '└';
/// Continuation gutter bar for wrapped message lines.
pub const GUTTER_BAR: char = '│';
/// Fill character of the closing rule.
pub const RULE_FILL: char = '─';

/// Wrap budgets below this are clamped up; a pathologically narrow terminal
/// still gets readable output.
const MIN_BUDGET: usize = 8;

/// Result of laying out one message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLayout {
    /// Text placed inline on the header line. Empty when the message was
    /// empty or all-blank.
    pub first: String,
    /// Continuation lines, unprefixed; the renderer aligns them under the
    /// gutter with a [`GUTTER_BAR`].
    pub rest: Vec<String>,
    /// Whether the block must be terminated with a closing rule. True
    /// exactly when the message occupied more than one line.
    pub closed: bool,
}

/// Reflow `message` to `budget` columns.
///
/// A single line that fits is emitted inline with no wrapping artifacts.
/// Any overflow or additional segment forces continuation lines and the
/// closing rule.
pub fn wrap(message: &str, budget: usize) -> MessageLayout {
    let budget = budget.max(MIN_BUDGET);
    let mut lines: Vec<String> = Vec::new();
    for segment in message.split('\n') {
        if segment.trim().is_empty() {
            continue;
        }
        wrap_segment(segment, budget, &mut lines);
    }
    let mut lines = lines.into_iter();
    let first = lines.next().unwrap_or_default();
    let rest: Vec<String> = lines.collect();
    let closed = !rest.is_empty();
    MessageLayout { first, rest, closed }
}

/// The dash-filled rule terminating an overflowing message, e.g. `└────`.
pub fn closing_rule(budget: usize) -> String {
    let budget = budget.max(MIN_BUDGET);
    let mut rule = String::with_capacity(budget * RULE_FILL.len_utf8() + TERMINAL.len_utf8());
    rule.push(TERMINAL);
    for _ in 0..budget {
        rule.push(RULE_FILL);
    }
    rule
}

/// Greedy word wrap of one hard-break-free segment.
#[allow(unused_assignments)]
fn wrap_segment(segment: &str, budget: usize, lines: &mut Vec<String>) {
    let mut line = String::new();
    let mut line_width = 0;
    for word in segment.split_whitespace() {
        let word_width = visible_width(word);
        if line_width > 0 && line_width + 1 + word_width <= budget {
            line.push(' ');
            line.push_str(word);
            line_width += 1 + word_width;
            continue;
        }
        if line_width > 0 {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }
        if word_width <= budget {
            line.push_str(word);
            line_width = word_width;
        } else {
            (line, line_width) = hard_split(word, budget, lines);
        }
    }
    if line_width > 0 {
        lines.push(line);
    }
}

/// Split a word wider than the budget into budget-width chunks, pushing all
/// full chunks and returning the trailing partial line.
fn hard_split(word: &str, budget: usize, lines: &mut Vec<String>) -> (String, usize) {
    let mut chunk = String::new();
    let mut chunk_width = 0;
    for c in word.chars() {
        let w = visible_width(&c.to_string());
        if chunk_width + w > budget && chunk_width > 0 {
            lines.push(std::mem::take(&mut chunk));
            chunk_width = 0;
        }
        chunk.push(c);
        chunk_width += w;
    }
    (chunk, chunk_width)
}
