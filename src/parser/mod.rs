//! Record decoding.
//!
//! This module provides the pure decoding function that turns one serialized
//! record (a JSON object produced by an upstream logging layer) into a
//! validated [`Record`]. Reserved-field extraction happens in the renderer,
//! not here: the decoder's only jobs are syntax, root shape, and numeric
//! fidelity.
//!
//! Numeric fidelity matters because records routinely carry 64-bit IDs and
//! nanosecond timestamps. The crate enables `serde_json`'s
//! `arbitrary_precision` feature, so numbers survive as exact text instead of
//! being forced through `f64`.

use crate::model::{DecodeError, Record};
use serde_json::Value;

/// Decode one serialized record into a [`Record`].
///
/// Fails with [`DecodeError::InvalidJson`] on malformed input and
/// [`DecodeError::NotAnObject`] when the root is a scalar or array. A missing
/// `message`, `time`, or any other reserved field is not a decode concern —
/// the renderer tolerates their absence.
pub fn decode(raw: &[u8]) -> Result<Record, DecodeError> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| DecodeError::InvalidJson {
            message: e.to_string(),
        })?;
    match value {
        Value::Object(map) => Ok(Record::new(map)),
        other => Err(DecodeError::NotAnObject {
            found: json_type_name(&other),
        }),
    }
}

/// Human-readable JSON type name, used in decode diagnostics.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DecodeError;

    #[test]
    fn decodes_flat_object() {
        let rec = decode(br#"{"message":"hi","n":1}"#).expect("valid record");
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn malformed_json_is_invalid_json() {
        let err = decode(b"{\"message\":").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidJson { .. }));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = decode(b"[1,2,3]").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject { found: "an array" }));

        let err = decode(b"42").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject { found: "a number" }));
    }

    #[test]
    fn large_integers_keep_exact_text() {
        // Beyond f64's 53-bit mantissa; must not round.
        let mut rec = decode(br#"{"id":9007199254740993}"#).expect("valid record");
        let id = rec.remove("id").expect("id present");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "9007199254740993");
    }

    #[test]
    fn nested_values_survive_decode() {
        let mut rec =
            decode(br#"{"stack":[{"source":"./a.rs","line":"3","func":"main"}]}"#)
                .expect("valid record");
        let stack = rec.remove("stack").expect("stack present");
        assert!(stack.is_array());
    }
}
