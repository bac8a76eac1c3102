//! Error taxonomy for the renderer.
//!
//! Two failure classes exist: the input record is malformed
//! ([`DecodeError`]), or the composed block could not be written to the sink
//! ([`RenderError::SinkWrite`]). Everything else degrades silently by
//! contract — missing optional reserved fields, unrecognized severities,
//! errors without a stack-trace capability, and fields without a registered
//! formatter all fall back to defaults rather than failing.
//!
//! The renderer never logs about its own failures; errors propagate to the
//! caller of [`crate::render::TreeWriter::write_record`] and nothing is
//! written to the sink on the decode path.

use thiserror::Error;

/// The raw record bytes are not a well-formed structured record.
///
/// Non-fatal from the sink's point of view: no partial output is emitted.
/// The caller decides whether to drop the record or fall back to raw
/// passthrough.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not syntactically valid JSON.
    ///
    /// The parser message is extracted as a `String` rather than wrapping
    /// `serde_json::Error`, which keeps this type cheap to match on and free
    /// of parser state.
    #[error("malformed record: {message}")]
    InvalidJson {
        /// The JSON parser's description of what went wrong.
        message: String,
    },

    /// The bytes decoded, but the root is not an object.
    ///
    /// A record is by definition a field map; scalars and arrays at the root
    /// cannot be rendered as a tree.
    #[error("record root is {found}, expected an object")]
    NotAnObject {
        /// JSON type name of what was found at the root.
        found: &'static str,
    },
}

/// Top-level error returned by the render entrypoint.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The input record failed to decode. Nothing was written to the sink.
    #[error("cannot decode record: {0}")]
    Decode(#[from] DecodeError),

    /// The single sink write failed partway through.
    ///
    /// `written` is the number of bytes the sink accepted before the
    /// failure, surfaced for diagnostics. The write is not retried.
    #[error("sink write failed after {written} bytes: {source}")]
    SinkWrite {
        /// Bytes accepted by the sink before the failure.
        written: usize,
        /// The underlying I/O error, propagated verbatim.
        #[source]
        source: std::io::Error,
    },
}
