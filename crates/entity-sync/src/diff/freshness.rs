//! Ordering of per-record freshness markers.
//!
//! Markers are supplied by the write's originating request. Integers and
//! floats compare numerically; two RFC 3339 timestamps compare
//! chronologically; other pairs of strings compare lexicographically.
//! Any other pairing (absent, null, mixed kinds) is incomparable, and an
//! incomparable write is never stale.

use std::cmp::Ordering;

use chrono::DateTime;
use serde_json::Value;

/// Order `incoming` against `existing`, or `None` if the two cannot be
/// compared.
pub fn compare_freshness(incoming: Option<&Value>, existing: Option<&Value>) -> Option<Ordering> {
    match (incoming?, existing?) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                Some(a.cmp(&b))
            } else if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                Some(a.cmp(&b))
            } else {
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
        }
        (Value::String(a), Value::String(b)) => {
            match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
                (Ok(a), Ok(b)) => Some(a.cmp(&b)),
                _ => Some(a.cmp(b)),
            }
        }
        _ => None,
    }
}

/// True only when `incoming` is strictly older than `existing`.
/// Equal markers are not stale.
pub fn is_stale(incoming: Option<&Value>, existing: Option<&Value>) -> bool {
    compare_freshness(incoming, existing) == Some(Ordering::Less)
}
