//! Stack trace capture and extraction.
//!
//! [`TracedError`] is the crate's trace-carrying error wrapper: it captures a
//! backtrace at construction, the way annotated errors in other ecosystems
//! do. [`extract_frames`] walks an arbitrary error chain looking for the
//! *deepest* `TracedError` — the innermost annotation is assumed to carry
//! the most complete, original trace. [`stack_marshaler`] packages extracted
//! frames as the `stack` field value consumed by the renderer's nested
//! formatter.

use crate::model::StackFrame;
use backtrace::Backtrace;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

/// An error wrapper that records a call-frame trace at construction.
///
/// This is the only source of frame traces the extractor recognizes; plain
/// errors in a chain are walked through transparently.
pub struct TracedError {
    message: String,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
    trace: Backtrace,
}

impl TracedError {
    /// Create a new root error, capturing the current call stack.
    pub fn new(message: impl Into<String>) -> Self {
        TracedError {
            message: message.into(),
            source: None,
            trace: Backtrace::new(),
        }
    }

    /// Wrap an existing error with a message, capturing the current call
    /// stack at the wrap site.
    pub fn wrap(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        TracedError {
            message: message.into(),
            source: Some(Box::new(source)),
            trace: Backtrace::new(),
        }
    }

    /// The symbolized frames of this error's own trace.
    fn frames(&self) -> Vec<StackFrame> {
        let mut out = Vec::new();
        for frame in self.trace.frames() {
            for symbol in frame.symbols() {
                let Some(file) = symbol.filename() else {
                    continue;
                };
                out.push(StackFrame {
                    source: file.display().to_string(),
                    line: symbol
                        .lineno()
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "?".to_string()),
                    func: symbol
                        .name()
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "?".to_string()),
                });
            }
        }
        out
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedError")
            .field("message", &self.message)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Error for TracedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

/// Find the deepest trace-carrying error in the chain.
///
/// Walks outermost to innermost and keeps the *last* match. Deliberate
/// policy: the innermost annotation holds the original trace, while outer
/// wrappers usually re-capture at less interesting call sites.
fn find_deepest_trace<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a TracedError> {
    let mut deepest = None;
    let mut cursor = Some(err);
    while let Some(e) = cursor {
        if let Some(traced) = e.downcast_ref::<TracedError>() {
            deepest = Some(traced);
        }
        cursor = e.source();
    }
    deepest
}

/// Extract the call-frame trace of the deepest trace-carrying error in
/// `err`'s chain.
///
/// Produces zero frames — silently, never an error — when no error in the
/// chain carries a trace.
pub fn extract_frames(err: &(dyn Error + 'static)) -> Vec<StackFrame> {
    find_deepest_trace(err)
        .map(TracedError::frames)
        .unwrap_or_default()
}

/// Rewrite in-project paths to `./…` form and drop everything else.
///
/// Frames from dependencies and the standard library live outside `wd` and
/// are filtered out entirely; only frames local to the project survive.
fn simplify_frames(frames: Vec<StackFrame>, wd: &Path) -> Vec<StackFrame> {
    frames
        .into_iter()
        .filter_map(|mut frame| {
            let rel = Path::new(&frame.source).strip_prefix(wd).ok()?;
            frame.source = format!("./{}", rel.display());
            Some(frame)
        })
        .collect()
}

/// Build the stack serializer to register with the upstream logging layer.
///
/// The returned closure converts an error chain into the array of frame maps
/// attached under the record's `stack` field, each map carrying the fixed
/// keys `source`, `line` and `func`.
///
/// With `simplify` on, the working directory is captured **once, here** —
/// not per call. A later `chdir` makes the filter stale; that is the
/// documented contract, preserved because callers depend on it.
pub fn stack_marshaler(
    simplify: bool,
) -> impl Fn(&(dyn Error + 'static)) -> Value + Send + Sync {
    let wd: Option<PathBuf> = if simplify {
        std::env::current_dir().ok()
    } else {
        None
    };
    move |err| {
        let mut frames = extract_frames(err);
        if let Some(wd) = &wd {
            frames = simplify_frames(frames, wd);
        }
        // String-only structs cannot fail to serialize; the fallback is the
        // usual silent-degradation path of an empty frame list.
        serde_json::to_value(&frames).unwrap_or_else(|_| Value::Array(Vec::new()))
    }
}
