//! Core record types: the decoded field map, rendered field pairs, and
//! extracted stack frames.

use serde_json::{Map, Value};

/// Well-known reserved field names.
///
/// These are located by name during rendering and removed from the generic
/// field list; they never appear as tree leaves in the output (except
/// `caller`, `error` and `stack`, which stay in the list but get dedicated
/// styles and sort positions).
pub mod fields {
    /// Timestamp of the record, pre-formatted by the producing logger.
    pub const TIMESTAMP: &str = "time";
    /// Severity. Carried out-of-band; the map copy is discarded.
    pub const LEVEL: &str = "level";
    /// Human-readable message body.
    pub const MESSAGE: &str = "message";
    /// Call-site annotation added by the producing logger.
    pub const CALLER: &str = "caller";
    /// Error display text attached to the record.
    pub const ERROR: &str = "error";
    /// Array of frame maps attached by a stack marshaler.
    pub const STACK: &str = "stack";
}

/// Fixed key names of a marshaled stack frame map.
///
/// Downstream consumers match on these exact spellings, so they are part of
/// the wire contract.
pub mod frame_keys {
    /// Source file path of the frame.
    pub const SOURCE: &str = "source";
    /// Line number, carried as text.
    pub const LINE: &str = "line";
    /// Function name.
    pub const FUNC: &str = "func";
}

/// One decoded log record: an unordered map of field name to dynamic value.
///
/// Produced once per log call by [`crate::parser::decode`] and consumed
/// exactly once by the renderer. The only mutation after decode is the
/// removal of reserved fields as they are extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap an already-decoded field map.
    pub fn new(map: Map<String, Value>) -> Self {
        Record(map)
    }

    /// Remove and return a field by name.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Number of fields currently in the map.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the remaining fields in map order.
    ///
    /// Map order is an implementation detail of the decoder; render order
    /// must come solely from the field comparator, never from this.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// One rendered key/value line, pre-sort.
///
/// `key` is the raw (unstyled) field name and is the only input to the
/// ordering comparator; the styled twins carry the ANSI sequences emitted to
/// the sink.
#[derive(Debug, Clone)]
pub struct RenderField {
    /// Raw field name as it appeared in the record.
    pub key: String,
    /// Field name with its key style applied.
    pub styled_key: String,
    /// Formatted value with styling applied by its formatter.
    pub styled_value: String,
}

/// One extracted call frame of an error's stack trace.
///
/// Produced only by [`crate::stack::extract_frames`]; never constructed by
/// hand elsewhere. Serializes to the frame-map wire shape — the field names
/// are exactly the [`frame_keys`] spellings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StackFrame {
    /// Source file path, possibly rewritten to `./…` form in simplify mode.
    pub source: String,
    /// Line number as text.
    pub line: String,
    /// Function name.
    pub func: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        let Value::Object(map) = json!({"a": 1, "b": "two"}) else {
            unreachable!()
        };
        Record::new(map)
    }

    #[test]
    fn remove_extracts_and_shrinks() {
        let mut rec = sample();
        assert_eq!(rec.remove("a"), Some(json!(1)));
        assert_eq!(rec.remove("a"), None);
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn iter_yields_remaining_fields() {
        let mut rec = sample();
        rec.remove("b");
        let keys: Vec<_> = rec.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a"]);
    }
}
