// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property values and the scalar comparison used by change detection.

use serde_json::Value;

/// A node property value as it travels between storage, server and UI.
///
/// Objects (and arrays) stand for object-typed properties such as assets or
/// references; they are never tracked.
pub type PropertyValue = Value;

/// Returns `true` for values that may appear in an accepted-state snapshot.
#[inline]
pub fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

/// Compares a current value against its last-accepted value.
///
/// Numbers compare numerically so `1` and `1.0` (or `0` and `-0.0`) are the
/// same value. A non-scalar on either side never matches.
#[allow(clippy::float_cmp)]
pub fn scalars_match(current: &Value, accepted: &Value) -> bool {
    if !is_scalar(current) || !is_scalar(accepted) {
        return false;
    }
    match (current, accepted) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => current == accepted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_and_arrays_are_not_scalar() {
        assert!(is_scalar(&json!("text")));
        assert!(is_scalar(&json!(3)));
        assert!(is_scalar(&json!(null)));
        assert!(is_scalar(&json!(false)));
        assert!(!is_scalar(&json!({"__identifier": "abc"})));
        assert!(!is_scalar(&json!(["a"])));
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(scalars_match(&json!(1), &json!(1.0)));
        assert!(scalars_match(&json!(0.0), &json!(-0.0)));
        assert!(scalars_match(&json!(0), &json!(-0.0)));
        assert!(!scalars_match(&json!(1), &json!("1")));
        assert!(scalars_match(&json!("Hello"), &json!("Hello")));
        assert!(!scalars_match(&json!("Hello"), &json!("hello")));
    }

    #[test]
    fn non_scalars_never_match() {
        assert!(!scalars_match(&json!({"a": 1}), &json!({"a": 1})));
        assert!(!scalars_match(&json!([1]), &json!([1])));
    }
}
