//! ANSI escape handling and display-width measurement.
//!
//! Styled text carries non-printing escape sequences that must never count
//! toward column width when computing wrap budgets or gutter alignment.
//! [`strip_ansi_codes`] removes CSI and OSC sequences; [`visible_width`]
//! measures what a terminal actually renders, using `unicode-width` for
//! wide characters.

use std::borrow::Cow;
use unicode_width::UnicodeWidthStr;

const ESC: char = '\u{1b}';
const BEL: char = '\u{07}';

/// Remove ANSI escape sequences from `input`.
///
/// Handles CSI sequences (`ESC [ … final`), OSC sequences (`ESC ] … BEL` or
/// `ESC ] … ESC \`), and two-character escapes. Returns the input unchanged
/// (borrowed) when it contains no escape character.
pub fn strip_ansi_codes(input: &str) -> Cow<'_, str> {
    if !input.contains(ESC) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ESC {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                // Consume parameter and intermediate bytes until the final
                // byte in 0x40..=0x7e.
                for c in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                // OSC terminates at BEL or ST (ESC \).
                while let Some(c) = chars.next() {
                    if c == BEL {
                        break;
                    }
                    if c == ESC {
                        if chars.peek() == Some(&'\\') {
                            chars.next();
                        }
                        break;
                    }
                }
            }
            Some(_) => {
                chars.next();
            }
            None => {}
        }
    }
    Cow::Owned(out)
}

/// Display width of `text` as a terminal renders it: escape sequences
/// excluded, wide characters counted at their column width.
pub fn visible_width(text: &str) -> usize {
    strip_ansi_codes(text).width()
}
