//! Tree renderer: the top-level orchestration.
//!
//! [`TreeWriter`] consumes one serialized record plus an out-of-band
//! severity and emits one tree-shaped block of styled terminal text:
//!
//! ```text
//! 2024-01-01 00:00:00 INFO   a message that wraps across the
//!                          │ available width, aligned under a
//!                          └──────────────────────────────────
//!                          ├ caller: src/main.rs:10
//!                          ├ n: 42
//!                          └ user: alice
//! ```
//!
//! The whole block is composed in a private buffer and written to the sink
//! in one logical write, so concurrent callers sharing a `TreeWriter` never
//! interleave partial blocks. All configuration is immutable after
//! [`TreeWriterBuilder::build`]; the sink is the only shared mutable state
//! and sits behind a mutex.

use crate::ansi::visible_width;
use crate::layout::{self, BRANCH, GUTTER_BAR, TERMINAL};
use crate::model::{fields, frame_keys, Record, RenderError, RenderField, Severity};
use crate::order::{default_key_order, KeyOrder};
use crate::parser;
use crate::style::{DefaultKeyStyle, StyleRegistry};
use nu_ansi_term::Style;
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Mutex;

/// Per-field value formatter.
///
/// Receives the dynamic value and the current left-padding width (the
/// gutter column), so multiline values can align their continuation lines
/// under the same gutter as the field keys.
pub type ValueFormatter = Box<dyn Fn(&Value, usize) -> String + Send + Sync>;

/// Column width reserved for the severity label in the header line.
const LEVEL_COLUMN: usize = 5;

/// Columns kept free at the right edge when computing the wrap budget.
const WRAP_MARGIN: usize = 2;

/// Fallback width when neither the terminal nor the caller supplies one.
const FALLBACK_WIDTH: usize = 80;

/// Renders structured records as styled tree blocks onto a byte sink.
///
/// Construct via [`TreeWriter::new`] for defaults or
/// [`TreeWriter::builder`] to customize styles, formatters, ordering and
/// width. One instance may be shared across threads.
pub struct TreeWriter<W: Write> {
    max_width: usize,
    out: Mutex<W>,
    styles: StyleRegistry,
    value_formatters: HashMap<String, ValueFormatter>,
    default_formatter: ValueFormatter,
    key_order: KeyOrder,
}

impl<W: Write> TreeWriter<W> {
    /// A writer with the default configuration.
    pub fn new(sink: W) -> Self {
        Self::builder(sink).build()
    }

    /// Start configuring a writer.
    pub fn builder(sink: W) -> TreeWriterBuilder<W> {
        TreeWriterBuilder::new(sink)
    }

    /// Render one record and write the composed block to the sink.
    ///
    /// `raw` is the serialized record; `severity` is authoritative and the
    /// map's own `level` member is discarded. Returns the number of bytes
    /// written. On a decode failure nothing is written; on a sink failure
    /// the error carries the count of bytes the sink accepted.
    pub fn write_record(&self, severity: Severity, raw: &[u8]) -> Result<usize, RenderError> {
        let record = parser::decode(raw)?;
        let block = self.compose(severity, record);
        self.write_block(block.as_bytes())
    }

    /// Consume the writer and recover the sink. Handy for buffer sinks in
    /// tests and for callers that need to flush-and-take-back ownership.
    pub fn into_sink(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// One atomic write of the composed block.
    fn write_block(&self, mut buf: &[u8]) -> Result<usize, RenderError> {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut written = 0;
        while !buf.is_empty() {
            match out.write(buf) {
                Ok(0) => {
                    return Err(RenderError::SinkWrite {
                        written,
                        source: io::Error::new(
                            io::ErrorKind::WriteZero,
                            "sink accepted no more bytes",
                        ),
                    })
                }
                Ok(n) => {
                    written += n;
                    buf = &buf[n..];
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(RenderError::SinkWrite { written, source: e }),
            }
        }
        Ok(written)
    }

    /// Compose the full block for one record.
    fn compose(&self, severity: Severity, mut record: Record) -> String {
        // Reserved-field extraction. The out-of-band severity wins over
        // whatever the map carried.
        record.remove(fields::LEVEL);
        let timestamp = record
            .remove(fields::TIMESTAMP)
            .map(|v| scalar_text(&v))
            .unwrap_or_default();
        let message = record
            .remove(fields::MESSAGE)
            .map(|v| scalar_text(&v))
            .unwrap_or_default();

        let label = format!("{:<width$}", severity.label(), width = LEVEL_COLUMN);
        // Plain-text prefix of the header line; its *visible* width drives
        // every later alignment decision.
        let prefix_plain = if timestamp.is_empty() {
            format!("{label}  ")
        } else {
            format!("{timestamp} {label}  ")
        };
        let prefix_width = visible_width(&prefix_plain);
        let gutter_width = prefix_width.saturating_sub(2);
        let gutter = " ".repeat(gutter_width);

        // Width is resolved live on every render; a resize between calls
        // must be picked up.
        let width = self.max_width.min(live_terminal_width(self.max_width));
        let budget = width.saturating_sub(prefix_width + WRAP_MARGIN);

        let ts_style = self.styles.key_style(fields::TIMESTAMP, severity);
        let msg_style = self.styles.key_style(fields::MESSAGE, severity);
        let level_style = self.styles.severity_style(severity);

        let laid_out = layout::wrap(&message, budget);
        let mut block = String::new();
        if !timestamp.is_empty() {
            block.push_str(&ts_style.paint(timestamp.as_str()).to_string());
            block.push(' ');
        }
        block.push_str(&level_style.paint(label.as_str()).to_string());
        if laid_out.first.is_empty() {
            block.push('\n');
        } else {
            block.push_str("  ");
            block.push_str(&msg_style.paint(laid_out.first.as_str()).to_string());
            block.push('\n');
        }
        for line in &laid_out.rest {
            block.push_str(&gutter);
            block.push(GUTTER_BAR);
            block.push(' ');
            block.push_str(&msg_style.paint(line.as_str()).to_string());
            block.push('\n');
        }
        if laid_out.closed {
            block.push_str(&gutter);
            block.push_str(&layout::closing_rule(budget));
            block.push('\n');
        }

        // Remaining fields become tree leaves.
        let mut render_fields: Vec<RenderField> = record
            .iter()
            .map(|(key, value)| {
                let formatter = self
                    .value_formatters
                    .get(key)
                    .unwrap_or(&self.default_formatter);
                RenderField {
                    key: key.clone(),
                    styled_key: self
                        .styles
                        .key_style(key, severity)
                        .paint(key.as_str())
                        .to_string(),
                    styled_value: formatter(value, gutter_width),
                }
            })
            .collect();
        // Stable by construction: keys comparing equal keep decode order.
        render_fields.sort_by(|a, b| (self.key_order)(&a.key, &b.key));

        let last = render_fields.len().saturating_sub(1);
        for (i, field) in render_fields.iter().enumerate() {
            block.push_str(&gutter);
            block.push(if i == last { TERMINAL } else { BRANCH });
            block.push(' ');
            block.push_str(&field.styled_key);
            block.push_str(": ");
            block.push_str(&field.styled_value);
            block.push('\n');
        }
        block
    }
}

impl<W: Write> Write for TreeWriter<W> {
    /// Raw passthrough for callers that bypass structured rendering.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .flush()
    }
}

impl<W: Write> std::fmt::Debug for TreeWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWriter")
            .field("max_width", &self.max_width)
            .field("styles", &self.styles)
            .field("value_formatters", &self.value_formatters.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`TreeWriter`]. Setters may be applied in any order; each
/// later call overrides the earlier one for the same concern.
pub struct TreeWriterBuilder<W: Write> {
    sink: W,
    max_width: usize,
    styles: StyleRegistry,
    value_formatters: HashMap<String, ValueFormatter>,
    default_formatter: ValueFormatter,
    key_order: KeyOrder,
}

impl<W: Write> TreeWriterBuilder<W> {
    fn new(sink: W) -> Self {
        let mut value_formatters: HashMap<String, ValueFormatter> = HashMap::new();
        value_formatters.insert(fields::STACK.to_string(), Box::new(format_stack));
        TreeWriterBuilder {
            sink,
            max_width: live_terminal_width(FALLBACK_WIDTH),
            styles: StyleRegistry::new(),
            value_formatters,
            default_formatter: Box::new(|value, _| scalar_text(value)),
            key_order: Box::new(default_key_order),
        }
    }

    /// Cap the rendered width. The live terminal width still wins when it
    /// is narrower.
    pub fn max_width(mut self, columns: usize) -> Self {
        self.max_width = columns;
        self
    }

    /// Replace the whole style registry.
    pub fn styles(mut self, styles: StyleRegistry) -> Self {
        self.styles = styles;
        self
    }

    /// Style one severity level.
    pub fn severity_style(mut self, severity: Severity, style: Style) -> Self {
        self.styles.set_severity_style(severity, style);
        self
    }

    /// Style one field name, overriding the default selector for it.
    pub fn key_style(mut self, key: impl Into<String>, style: Style) -> Self {
        self.styles.set_key_style(key, style);
        self
    }

    /// Replace the default key-style selector used for unregistered names.
    pub fn default_key_style(mut self, selector: DefaultKeyStyle) -> Self {
        self.styles.set_default_key_style(selector);
        self
    }

    /// Register a value formatter for one field name.
    pub fn value_formatter(mut self, key: impl Into<String>, formatter: ValueFormatter) -> Self {
        self.value_formatters.insert(key.into(), formatter);
        self
    }

    /// Replace the default scalar formatter.
    pub fn default_value_formatter(mut self, formatter: ValueFormatter) -> Self {
        self.default_formatter = formatter;
        self
    }

    /// Replace the field ordering comparator.
    pub fn key_order(mut self, order: KeyOrder) -> Self {
        self.key_order = order;
        self
    }

    /// Finalize. Configuration is immutable from here on.
    pub fn build(self) -> TreeWriter<W> {
        TreeWriter {
            max_width: self.max_width,
            out: Mutex::new(self.sink),
            styles: self.styles,
            value_formatters: self.value_formatters,
            default_formatter: self.default_formatter,
            key_order: self.key_order,
        }
    }
}

impl<W: Write> std::fmt::Debug for TreeWriterBuilder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWriterBuilder")
            .field("max_width", &self.max_width)
            .finish_non_exhaustive()
    }
}

/// Live terminal width, or `fallback` when no terminal is attached.
fn live_terminal_width(fallback: usize) -> usize {
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        _ => fallback,
    }
}

/// Default scalar rendering of a dynamic value.
///
/// Strings render bare (no quotes); everything else renders as compact
/// JSON, which for numbers reproduces the exact decoded text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Nested tree formatter for marshaled stack frames.
///
/// Expects the frame-map array produced by
/// [`crate::stack::stack_marshaler`]; each frame renders on its own line
/// as `func (source:line)`, aligned two columns right of the gutter so the
/// frames read as children of the `stack` leaf. Values of any other shape
/// fall back to scalar rendering.
fn format_stack(value: &Value, pad: usize) -> String {
    let Value::Array(frames) = value else {
        return scalar_text(value);
    };
    let indent = " ".repeat(pad + 2);
    let mut out = String::new();
    for frame in frames {
        let Value::Object(map) = frame else {
            continue;
        };
        let get = |key: &str| map.get(key).map(scalar_text).unwrap_or_default();
        out.push('\n');
        out.push_str(&indent);
        out.push(GUTTER_BAR);
        out.push(' ');
        out.push_str(&format!(
            "{} ({}:{})",
            get(frame_keys::FUNC),
            get(frame_keys::SOURCE),
            get(frame_keys::LINE)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_ansi_codes;
    use serde_json::json;

    fn render_plain(severity: Severity, raw: &[u8]) -> String {
        let writer = TreeWriter::builder(Vec::new()).max_width(100).build();
        writer.write_record(severity, raw).expect("render succeeds");
        let sink = writer.into_sink();
        strip_ansi_codes(std::str::from_utf8(&sink).expect("utf8 output")).into_owned()
    }

    #[test]
    fn header_contains_timestamp_label_and_message() {
        let out = render_plain(
            Severity::Info,
            br#"{"time":"2024-01-01T00:00:00Z","level":"info","message":"hello"}"#,
        );
        let first = out.lines().next().expect("header line");
        assert!(first.contains("2024-01-01T00:00:00Z"));
        assert!(first.contains("INFO"));
        assert!(first.contains("hello"));
    }

    #[test]
    fn map_level_is_discarded_in_favor_of_out_of_band_severity() {
        let out = render_plain(Severity::Warn, br#"{"level":"error","message":"m"}"#);
        assert!(out.contains("WARN"));
        assert!(!out.contains("level"));
    }

    #[test]
    fn reserved_fields_never_render_as_leaves() {
        let out = render_plain(
            Severity::Info,
            br#"{"time":"t","level":"info","message":"m","user":"alice"}"#,
        );
        for line in out.lines().skip(1) {
            assert!(!line.contains("time:"), "timestamp leaked: {line}");
            assert!(!line.contains("level:"), "level leaked: {line}");
            assert!(!line.contains("message:"), "message leaked: {line}");
        }
        assert!(out.contains("user: alice"));
    }

    #[test]
    fn connector_counts_match_field_count() {
        let out = render_plain(
            Severity::Info,
            br#"{"message":"m","a":1,"b":2,"c":3,"d":4}"#,
        );
        let branches = out.matches(BRANCH).count();
        let terminals = out.matches(TERMINAL).count();
        assert_eq!(branches, 3);
        assert_eq!(terminals, 1);
    }

    #[test]
    fn fields_sort_lexicographically_in_middle_bucket() {
        let out = render_plain(
            Severity::Info,
            br#"{"message":"hello","user":"alice","n":42}"#,
        );
        let n_pos = out.find("n: 42").expect("n rendered");
        let user_pos = out.find("user: alice").expect("user rendered");
        assert!(n_pos < user_pos, "n must precede user");
        assert!(
            out.lines().last().is_some_and(|l| l.contains("user")),
            "user takes the terminal connector"
        );
    }

    #[test]
    fn decode_failure_writes_nothing() {
        let writer = TreeWriter::new(Vec::new());
        let err = writer
            .write_record(Severity::Info, b"not json")
            .expect_err("must fail");
        assert!(matches!(err, RenderError::Decode(_)));
        let sink = writer.into_sink();
        assert!(sink.is_empty(), "no partial output on decode failure");
    }

    #[test]
    fn write_record_returns_block_byte_count() {
        let writer = TreeWriter::builder(Vec::new()).max_width(100).build();
        let n = writer
            .write_record(Severity::Info, br#"{"message":"hi"}"#)
            .expect("render succeeds");
        let sink = writer.into_sink();
        assert_eq!(n, sink.len());
    }

    #[test]
    fn long_message_wraps_and_closes_with_rule() {
        let msg = "one two three four five six seven eight nine ten eleven twelve";
        let raw = serde_json::to_vec(&json!({ "message": msg })).expect("serialize");
        let writer = TreeWriter::builder(Vec::new()).max_width(40).build();
        writer.write_record(Severity::Info, &raw).expect("render succeeds");
        let sink = writer.into_sink();
        let out = strip_ansi_codes(std::str::from_utf8(&sink).expect("utf8")).into_owned();

        assert!(out.contains(GUTTER_BAR), "wrapped lines carry the gutter bar");
        let rule_line = out
            .lines()
            .find(|l| l.contains(layout::RULE_FILL))
            .expect("closing rule present");
        assert!(rule_line.trim_start().starts_with(TERMINAL));
    }

    #[test]
    fn missing_timestamp_and_message_render_header_only() {
        let out = render_plain(Severity::Debug, br#"{"k":"v"}"#);
        let first = out.lines().next().expect("header line");
        assert_eq!(first.trim_end(), "DEBUG");
        assert!(out.contains("k: v"));
    }

    #[test]
    fn numbers_render_with_exact_text() {
        let out = render_plain(Severity::Info, br#"{"message":"m","id":9007199254740993}"#);
        assert!(out.contains("id: 9007199254740993"));
    }

    #[test]
    fn stack_field_renders_nested_frames() {
        let raw = serde_json::to_vec(&json!({
            "message": "boom",
            "stack": [
                {"source": "./src/main.rs", "line": "10", "func": "main"},
                {"source": "./src/app.rs", "line": "42", "func": "run"}
            ]
        }))
        .expect("serialize");
        let out = {
            let writer = TreeWriter::builder(Vec::new()).max_width(120).build();
            writer.write_record(Severity::Error, &raw).expect("render succeeds");
            let sink = writer.into_sink();
            strip_ansi_codes(std::str::from_utf8(&sink).expect("utf8")).into_owned()
        };
        assert!(out.contains("main (./src/main.rs:10)"));
        assert!(out.contains("run (./src/app.rs:42)"));
        // The stack leaf takes the terminal connector: it sorts last.
        let stack_line = out
            .lines()
            .find(|l| l.contains("stack:"))
            .expect("stack leaf present");
        assert!(stack_line.trim_start().starts_with(TERMINAL));
    }

    #[test]
    fn custom_formatter_and_order_are_honored() {
        let writer = TreeWriter::builder(Vec::new())
            .max_width(100)
            .value_formatter("n", Box::new(|v, _| format!("<{v}>")))
            .key_order(Box::new(|a, b| b.cmp(a)))
            .build();
        writer
            .write_record(Severity::Info, br#"{"message":"m","a":1,"n":2}"#)
            .expect("render succeeds");
        let sink = writer.into_sink();
        let out = strip_ansi_codes(std::str::from_utf8(&sink).expect("utf8")).into_owned();
        assert!(out.contains("n: <2>"));
        let n_pos = out.find("n: <2>").expect("n rendered");
        let a_pos = out.find("a: 1").expect("a rendered");
        assert!(n_pos < a_pos, "reversed comparator puts n first");
    }

    #[test]
    fn raw_write_passes_through_unrendered() {
        let mut writer = TreeWriter::new(Vec::new());
        writer.write_all(b"raw bytes\n").expect("passthrough write");
        writer.flush().expect("flush");
        let sink = writer.into_sink();
        assert_eq!(sink, b"raw bytes\n");
    }

    #[test]
    fn failing_sink_reports_written_count() {
        struct FailAfter {
            budget: usize,
        }
        impl Write for FailAfter {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                if self.budget == 0 {
                    return Err(io::Error::new(io::ErrorKind::Other, "sink full"));
                }
                let n = buf.len().min(self.budget);
                self.budget -= n;
                Ok(n)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let writer = TreeWriter::builder(FailAfter { budget: 4 })
            .max_width(100)
            .build();
        let err = writer
            .write_record(Severity::Info, br#"{"message":"hello world"}"#)
            .expect_err("sink must fail");
        match err {
            RenderError::SinkWrite { written, .. } => assert_eq!(written, 4),
            other => panic!("unexpected error: {other}"),
        }
    }
}
