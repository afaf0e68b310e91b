//! Read-only path resolution.

use serde_json::Value;

use crate::Segment;

/// Get a reference to the value at `path` inside `value`.
///
/// At a plain segment, descends via key lookup; returns `None` if the
/// current value is not a mapping or the key is absent. At a wildcard
/// segment, descends via the key into a list and continues with element 0;
/// returns `None` if the entry is not a list or the list is empty.
///
/// The resolver operates on already-unwrapped object-level values; document
/// wrapper handling (`{items: [...], type: "array"}`) belongs to the
/// document buffer. For callers holding a raw document, see
/// [`get_in_document`].
///
/// # Example
///
/// ```
/// use annotab_field_path::{get, parse};
/// use serde_json::json;
///
/// let doc = json!({"sections": [{"text": "hello"}], "empty": []});
/// assert_eq!(
///     get(&doc, &parse("sections[].text").unwrap()),
///     Some(&json!("hello"))
/// );
/// assert_eq!(get(&doc, &parse("empty[]").unwrap()), None);
/// assert_eq!(get(&doc, &parse("missing").unwrap()), None);
/// ```
pub fn get<'a>(value: &'a Value, path: &[Segment]) -> Option<&'a Value> {
    let mut current = value;
    for seg in path {
        let entry = current.as_object()?.get(&seg.key)?;
        current = if seg.array_wildcard {
            match entry {
                Value::Array(arr) => arr.first()?,
                _ => return None,
            }
        } else {
            entry
        };
    }
    Some(current)
}

/// Wrapper-aware lookup for callers holding a raw document value.
///
/// When the root is shaped `{items: [...], type: "array"}` resolution
/// begins from `items[0]`; otherwise this is plain [`get`]. Kept for
/// compatibility with content produced by the external document loader.
pub fn get_in_document<'a>(document: &'a Value, path: &[Segment]) -> Option<&'a Value> {
    if let Value::Object(map) = document {
        if map.get("type").and_then(Value::as_str) == Some("array") {
            if let Some(Value::Array(items)) = map.get("items") {
                return get(items.first()?, path);
            }
        }
    }
    get(document, path)
}
