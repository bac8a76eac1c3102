//! Severity levels for structured log records.
//!
//! Severity is supplied out-of-band by the caller alongside the raw record
//! bytes; it is never re-derived from the decoded map. Unknown wire values
//! degrade to [`Severity::NoLevel`] rather than failing.

// Wire spellings accepted by `Severity::from_wire`.
const WIRE_TRACE: &str = "trace";
const WIRE_DEBUG: &str = "debug";
const WIRE_INFO: &str = "info";
const WIRE_WARN: &str = "warn";
const WIRE_ERROR: &str = "error";
const WIRE_FATAL: &str = "fatal";
const WIRE_PANIC: &str = "panic";
const WIRE_DISABLED: &str = "disabled";

/// Discrete severity bucket of a log record.
///
/// The ordering mirrors the usual leveled-logging hierarchy: `Trace` is the
/// chattiest, `Panic` the most severe. `NoLevel` marks records logged without
/// a level, `Disabled` records that should never have reached the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Finest-grained diagnostic output.
    Trace,
    /// Developer-facing diagnostic output.
    Debug,
    /// Routine operational messages.
    Info,
    /// Something unexpected but recoverable.
    Warn,
    /// An operation failed.
    Error,
    /// An unrecoverable failure; the process is expected to exit.
    Fatal,
    /// An unrecoverable failure surfaced as a panic.
    Panic,
    /// Record logged without a level.
    NoLevel,
    /// Logging disabled; present for completeness of the wire enum.
    Disabled,
}

impl Severity {
    /// Parse a wire-format level string.
    ///
    /// Total: unrecognized input (including out-of-range numerics sent as
    /// text) maps to [`Severity::NoLevel`] so a malformed level can never
    /// fail a render. The empty string is the wire spelling of `NoLevel`.
    pub fn from_wire(s: &str) -> Self {
        match s {
            WIRE_TRACE => Severity::Trace,
            WIRE_DEBUG => Severity::Debug,
            WIRE_INFO => Severity::Info,
            WIRE_WARN => Severity::Warn,
            WIRE_ERROR => Severity::Error,
            WIRE_FATAL => Severity::Fatal,
            WIRE_PANIC => Severity::Panic,
            WIRE_DISABLED => Severity::Disabled,
            _ => Severity::NoLevel,
        }
    }

    /// The wire spelling of this severity.
    pub fn as_wire_str(self) -> &'static str {
        match self {
            Severity::Trace => WIRE_TRACE,
            Severity::Debug => WIRE_DEBUG,
            Severity::Info => WIRE_INFO,
            Severity::Warn => WIRE_WARN,
            Severity::Error => WIRE_ERROR,
            Severity::Fatal => WIRE_FATAL,
            Severity::Panic => WIRE_PANIC,
            Severity::NoLevel => "",
            Severity::Disabled => WIRE_DISABLED,
        }
    }

    /// Uppercase label shown in the rendered header line.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
            Severity::Panic => "PANIC",
            Severity::NoLevel => "???",
            Severity::Disabled => "",
        }
    }

    /// All severities, in hierarchy order. Used by the style registry to
    /// seed its default palette.
    pub fn all() -> [Severity; 9] {
        [
            Severity::Trace,
            Severity::Debug,
            Severity::Info,
            Severity::Warn,
            Severity::Error,
            Severity::Fatal,
            Severity::Panic,
            Severity::NoLevel,
            Severity::Disabled,
        ]
    }
}
