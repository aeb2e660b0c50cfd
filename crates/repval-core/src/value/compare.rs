use crate::value::Value;
use std::cmp::Ordering;

/// Strict comparator for identical orderable variants.
///
/// Returns `None` for mismatched or non-orderable variants (maps, NaN).
/// Lists and tuples compare lexicographically, then by length.
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Uint(a), Value::Uint(b)) => a.partial_cmp(b),
        (Value::Float64(a), Value::Float64(b)) => a.partial_cmp(b),
        (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
        (Value::Blob(a), Value::Blob(b)) => a.partial_cmp(b),
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            strict_order_seq(a, b)
        }
        _ => None,
    }
}

fn strict_order_seq(left: &[Value], right: &[Value]) -> Option<Ordering> {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = strict_order_cmp(left, right)?;
        if cmp != Ordering::Equal {
            return Some(cmp);
        }
    }

    Some(left.len().cmp(&right.len()))
}
