//! logtree
//!
//! Tree-shaped, width-aware terminal renderer for structured log records.
//!
//! One serialized record (a flat JSON object produced by a logging layer)
//! goes in together with an out-of-band severity; one styled, tree-shaped
//! block of terminal text comes out:
//!
//! ```no_run
//! use logtree::{Severity, TreeWriter};
//!
//! let writer = TreeWriter::new(std::io::stdout());
//! writer.write_record(
//!     Severity::Info,
//!     br#"{"time":"2024-01-01T00:00:00Z","message":"hello","user":"alice","n":42}"#,
//! )?;
//! # Ok::<(), logtree::RenderError>(())
//! ```
//!
//! The crate performs no filtering, aggregation or persistence: exactly one
//! record in, one rendered block out. Styling, per-field formatting and
//! field ordering are configured once through [`TreeWriter::builder`] and
//! immutable afterwards, so a writer can be shared across threads; each
//! block is written to the sink in a single logical write.
//!
//! Errors logged with a stack trace use [`stack::stack_marshaler`] to attach
//! frame data under the `stack` field, which the renderer lays out as a
//! nested tree.

pub mod ansi;
pub mod layout;
pub mod model;
pub mod order;
pub mod parser;
pub mod render;
pub mod stack;
pub mod style;

// Re-export the surface most callers need.
pub use model::{fields, frame_keys, DecodeError, Record, RenderError, Severity, StackFrame};
pub use render::{TreeWriter, TreeWriterBuilder, ValueFormatter};
pub use stack::{extract_frames, stack_marshaler, TracedError};
pub use style::StyleRegistry;

#[cfg(test)]
mod tests;
