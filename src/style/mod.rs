//! Style registry: severity and field-name styling.
//!
//! Maps well-known field names and severity levels to terminal styles, with
//! a total lookup — there is no error path, every query returns a usable
//! style. Configured once at construction and read-only afterwards, so the
//! registry can be shared across concurrent render calls without locking.

use crate::model::{fields, Severity};
use nu_ansi_term::{Color, Style};
use std::collections::HashMap;

/// Selector invoked for field names without an explicit style.
///
/// Receives the raw field name and the record's severity; the default
/// implementation ignores the name and returns the severity's style, so
/// free-form fields pick up the level color.
pub type DefaultKeyStyle = Box<dyn Fn(&str, Severity) -> Style + Send + Sync>;

/// Registry of visual styles for severities and field names.
pub struct StyleRegistry {
    severity_styles: HashMap<Severity, Style>,
    key_styles: HashMap<String, Style>,
    default_key_style: DefaultKeyStyle,
}

impl StyleRegistry {
    /// Build the default registry.
    ///
    /// The palette follows the usual leveled-logging conventions: cool
    /// colors for trace/debug, green for info, yellow for warn, red for
    /// everything error-like, all bold. `message` is bold white, location
    /// fields are bold dark gray, error-carrying fields bold red.
    pub fn new() -> Self {
        let severity_styles = default_severity_styles();
        let fallback = severity_styles.clone();
        StyleRegistry {
            severity_styles,
            key_styles: default_key_styles(),
            default_key_style: Box::new(move |_, sev| {
                fallback.get(&sev).copied().unwrap_or_default()
            }),
        }
    }

    /// Style for a severity. Unrecognized severities (no registered style)
    /// get the neutral default.
    pub fn severity_style(&self, severity: Severity) -> Style {
        self.severity_styles
            .get(&severity)
            .copied()
            .unwrap_or_default()
    }

    /// Style for a field name at a given severity.
    ///
    /// Lookup order: explicit per-name style, then the default key-style
    /// selector. Total.
    pub fn key_style(&self, key: &str, severity: Severity) -> Style {
        match self.key_styles.get(key) {
            Some(style) => *style,
            None => (self.default_key_style)(key, severity),
        }
    }

    /// Register or replace a severity style. Builder-time only.
    pub(crate) fn set_severity_style(&mut self, severity: Severity, style: Style) {
        self.severity_styles.insert(severity, style);
    }

    /// Register or replace a per-field-name style. Builder-time only.
    pub(crate) fn set_key_style(&mut self, key: impl Into<String>, style: Style) {
        self.key_styles.insert(key.into(), style);
    }

    /// Replace the default key-style selector. Builder-time only.
    pub(crate) fn set_default_key_style(&mut self, selector: DefaultKeyStyle) {
        self.default_key_style = selector;
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleRegistry")
            .field("severity_styles", &self.severity_styles.len())
            .field("key_styles", &self.key_styles.len())
            .finish_non_exhaustive()
    }
}

fn default_severity_styles() -> HashMap<Severity, Style> {
    let bold = |c: Color| Style::new().bold().fg(c);
    HashMap::from([
        (Severity::Trace, bold(Color::Cyan)),
        (Severity::Debug, bold(Color::Blue)),
        (Severity::Info, bold(Color::Green)),
        (Severity::Warn, bold(Color::Yellow)),
        (Severity::Error, bold(Color::Red)),
        (Severity::Fatal, bold(Color::Red)),
        (Severity::Panic, bold(Color::Red)),
        (Severity::NoLevel, bold(Color::White)),
    ])
}

fn default_key_styles() -> HashMap<String, Style> {
    let bold = |c: Color| Style::new().bold().fg(c);
    HashMap::from([
        (fields::MESSAGE.to_string(), bold(Color::White)),
        (fields::TIMESTAMP.to_string(), bold(Color::DarkGray)),
        (fields::CALLER.to_string(), bold(Color::DarkGray)),
        (fields::ERROR.to_string(), bold(Color::Red)),
        (fields::STACK.to_string(), bold(Color::Red)),
    ])
}
