use serde_json::Value;

/// Performs a deep structural equality check between two JSON values.
///
/// Lists are compared element by element (order-sensitive); mappings are
/// compared key by key (insertion order is irrelevant). Numbers compare by
/// `serde_json::Number` equality.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use annotab_util::deep_equal;
///
/// let a = json!({"tags": ["x", "y"], "n": 1});
/// let b = json!({"n": 1, "tags": ["x", "y"]});
/// let c = json!({"n": 1, "tags": ["y", "x"]});
///
/// assert!(deep_equal(&a, &b));
/// assert!(!deep_equal(&a, &c));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, va)| b.get(k).is_some_and(|vb| deep_equal(va, vb)))
        }
        // Different types are never equal
        _ => false,
    }
}

/// Deep equality over optional values, where `None` models an absent key.
///
/// Absent and absent are equal; absent never equals a present value, not
/// even an explicit `null`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use annotab_util::opt_equal;
///
/// assert!(opt_equal(None, None));
/// assert!(!opt_equal(None, Some(&json!(null))));
/// assert!(opt_equal(Some(&json!([1])), Some(&json!([1]))));
/// ```
pub fn opt_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => deep_equal(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars() {
        assert!(deep_equal(&json!(1), &json!(1)));
        assert!(!deep_equal(&json!(1), &json!(2)));
        assert!(!deep_equal(&json!(1), &json!("1")));
        assert!(deep_equal(&json!(null), &json!(null)));
        assert!(!deep_equal(&json!(null), &json!(false)));
    }

    #[test]
    fn arrays_order_sensitive() {
        assert!(deep_equal(&json!([1, 2]), &json!([1, 2])));
        assert!(!deep_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!deep_equal(&json!([1, 2]), &json!([1, 2, 3])));
    }

    #[test]
    fn objects_order_insensitive() {
        let a = json!({"x": 1, "y": {"z": [true]}});
        let b = json!({"y": {"z": [true]}, "x": 1});
        assert!(deep_equal(&a, &b));
        assert!(!deep_equal(&a, &json!({"x": 1, "y": {"z": [false]}})));
        assert!(!deep_equal(&a, &json!({"x": 1})));
    }

    #[test]
    fn opt_absent_vs_null() {
        assert!(opt_equal(None, None));
        assert!(!opt_equal(Some(&json!(null)), None));
        assert!(!opt_equal(None, Some(&json!(0))));
        assert!(opt_equal(Some(&json!({"a": 1})), Some(&json!({"a": 1}))));
    }
}
