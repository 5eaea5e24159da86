//! Structural equality over JSON records.

use serde_json::{Number, Value};

/// Deep equality used by the diff gate.
///
/// Objects must have identical key sets and recursively equal values;
/// arrays are compared element by element; numbers compare by numeric
/// value, so `1` equals `1.0`. `null` is a value and differs from an absent
/// key.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structurally_equal(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(key, x)| ym.get(key).is_some_and(|y| structurally_equal(x, y)))
        }
        _ => a == b,
    }
}

/// [`structurally_equal`] on two records, skipping their top-level `ignored`
/// attribute. Nested attributes of the same name still count.
pub fn records_equal_except(a: &Value, b: &Value, ignored: &str) -> bool {
    match (a, b) {
        (Value::Object(xm), Value::Object(ym)) => {
            let visible = |(key, _): &(&String, &Value)| key.as_str() != ignored;
            xm.iter().filter(visible).count() == ym.iter().filter(visible).count()
                && xm
                    .iter()
                    .filter(visible)
                    .all(|(key, x)| ym.get(key).is_some_and(|y| structurally_equal(x, y)))
        }
        _ => structurally_equal(a, b),
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
