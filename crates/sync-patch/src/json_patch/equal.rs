//! Value equality used by the `test` operation.

use serde_json::Value;

/// Deep equality where numbers compare by real value.
///
/// Unlike `Value`'s `PartialEq`, integers and floats with the same value are
/// equal regardless of how they were parsed.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sync_patch::json_patch::json_equal;
///
/// assert!(json_equal(&json!(1), &json!(1.0)));
/// assert!(json_equal(&json!({"a": [1, "two"]}), &json!({"a": [1.0, "two"]})));
/// assert!(!json_equal(&json!([1, 2]), &json!([1, 3])));
/// ```
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (Value::String(a), Value::String(b)) => a == b,

        (Value::Array(arr_a), Value::Array(arr_b)) => {
            arr_a.len() == arr_b.len() && arr_a.iter().zip(arr_b).all(|(x, y)| json_equal(x, y))
        }

        (Value::Object(obj_a), Value::Object(obj_b)) => {
            if obj_a.len() != obj_b.len() {
                return false;
            }
            obj_a
                .iter()
                .all(|(key, val_a)| obj_b.get(key).is_some_and(|val_b| json_equal(val_a, val_b)))
        }

        // Different kinds are never equal
        _ => false,
    }
}
