//! Field ordering policy.
//!
//! Defines the total order in which non-reserved fields are rendered:
//! `caller` first (context), free-form fields alphabetically (scannable),
//! `error` and then `stack` last (most detail, read last). Comparison always
//! operates on ANSI-stripped key text, so styling can never perturb the
//! order. Callers must apply the comparator with a stable sort — keys that
//! compare equal keep their decode order.

use crate::ansi::strip_ansi_codes;
use std::borrow::Cow;
use std::cmp::Ordering;

use crate::model::fields;

/// Replaceable field comparator held by the renderer.
pub type KeyOrder = Box<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

// Precedence buckets of the composite sort key. Gaps are deliberate so a
// custom comparator can slot fields between the fixed ones.
const BUCKET_CALLER: u8 = 0;
const BUCKET_MIDDLE: u8 = 127;
const BUCKET_ERROR: u8 = 254;
const BUCKET_STACK: u8 = u8::MAX;

/// The default ordering: composite (bucket, key-text) comparison.
pub fn default_key_order(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

fn sort_key(key: &str) -> (u8, Cow<'_, str>) {
    let clean = strip_ansi_codes(key);
    let bucket = match clean.as_ref() {
        fields::CALLER => BUCKET_CALLER,
        fields::ERROR => BUCKET_ERROR,
        fields::STACK => BUCKET_STACK,
        _ => BUCKET_MIDDLE,
    };
    // Fixed-bucket keys compare equal within their bucket; middle-bucket
    // keys compare by their stripped text.
    if bucket == BUCKET_MIDDLE {
        (bucket, clean)
    } else {
        (bucket, Cow::Borrowed(""))
    }
}
