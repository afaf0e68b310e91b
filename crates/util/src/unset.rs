use serde_json::Value;

/// Check whether a field value is unset.
///
/// A value counts as unset when the key is absent (`None`), the value is an
/// explicit `null`, or the value is the empty string. Everything else
/// (including `false`, `0`, empty lists and empty mappings) counts as set.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use annotab_util::is_unset;
///
/// assert!(is_unset(None));
/// assert!(is_unset(Some(&json!(null))));
/// assert!(is_unset(Some(&json!(""))));
/// assert!(!is_unset(Some(&json!(0))));
/// assert!(!is_unset(Some(&json!([]))));
/// ```
pub fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Inverse of [`is_unset`]: the field has a defined, non-null, non-empty value.
pub fn is_answered(value: Option<&Value>) -> bool {
    !is_unset(value)
}
