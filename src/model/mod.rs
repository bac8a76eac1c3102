//! Domain model types (pure).
//!
//! All types in this module are pure data; rendering behavior lives in the
//! sibling modules.

pub mod error;
pub mod record;
pub mod severity;

// Re-export for convenience
pub use error::{DecodeError, RenderError};
pub use record::{fields, frame_keys, Record, RenderField, StackFrame};
pub use severity::Severity;
