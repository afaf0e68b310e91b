//! Non-mutating writes: set and remove with clone-on-write semantics.

use serde_json::{Map, Value};

use crate::{PathError, Segment};

/// Return a new value with `path` replaced by `new_value`.
///
/// Never mutates its input: every container along the path is rebuilt,
/// untouched siblings are carried over. Intermediate plain segments over
/// `null` or an absent key create a fresh mapping; a wildcard segment whose
/// list is absent or empty creates a single-element list holding an empty
/// mapping before continuing.
///
/// # Errors
///
/// `PathError::InvalidTarget` when a segment would have to descend through
/// an existing non-container value (string, number, bool) or through a list
/// without the wildcard marker. Overwriting `null` is always allowed.
///
/// # Example
///
/// ```
/// use annotab_field_path::{get, parse, set};
/// use serde_json::json;
///
/// let doc = json!({"a": 1});
/// let path = parse("sections[].text").unwrap();
/// let out = set(&doc, &path, json!("hi")).unwrap();
/// assert_eq!(out, json!({"a": 1, "sections": [{"text": "hi"}]}));
/// ```
pub fn set(value: &Value, path: &[Segment], new_value: Value) -> Result<Value, PathError> {
    let Some((seg, rest)) = path.split_first() else {
        return Ok(new_value);
    };

    let mut map = as_writable_map(value, seg)?;

    if seg.array_wildcard {
        let mut arr = match map.get(&seg.key) {
            Some(Value::Array(arr)) if !arr.is_empty() => arr.clone(),
            Some(Value::Array(_)) | Some(Value::Null) | None => {
                vec![Value::Object(Map::new())]
            }
            Some(_) => {
                return Err(PathError::InvalidTarget {
                    segment: seg.key.clone(),
                })
            }
        };
        arr[0] = if rest.is_empty() {
            new_value
        } else {
            set(&arr[0], rest, new_value)?
        };
        map.insert(seg.key.clone(), Value::Array(arr));
    } else if rest.is_empty() {
        map.insert(seg.key.clone(), new_value);
    } else {
        let child = map.get(&seg.key).cloned().unwrap_or(Value::Null);
        let rebuilt = set(&child, rest, new_value)?;
        map.insert(seg.key.clone(), rebuilt);
    }

    Ok(Value::Object(map))
}

/// Return a new value with the leaf addressed by `path` deleted.
///
/// For a plain leaf segment the mapping key is removed; for a wildcard leaf
/// the list's first element is removed. When the path does not resolve the
/// input is returned unchanged (by value).
///
/// # Example
///
/// ```
/// use annotab_field_path::{parse, remove};
/// use serde_json::json;
///
/// let doc = json!({"a": 1, "b": 2});
/// assert_eq!(remove(&doc, &parse("a").unwrap()), json!({"b": 2}));
/// assert_eq!(remove(&doc, &parse("zzz.deep").unwrap()), doc);
/// ```
pub fn remove(value: &Value, path: &[Segment]) -> Value {
    remove_resolved(value, path).unwrap_or_else(|| value.clone())
}

/// Clone-on-write removal; `None` when the path does not resolve.
fn remove_resolved(value: &Value, path: &[Segment]) -> Option<Value> {
    let (seg, rest) = path.split_first()?;
    let map = value.as_object()?;
    let entry = map.get(&seg.key)?;

    let rebuilt_entry = if seg.array_wildcard {
        let arr = entry.as_array()?;
        let first = arr.first()?;
        let mut arr = arr.clone();
        if rest.is_empty() {
            arr.remove(0);
        } else {
            arr[0] = remove_resolved(first, rest)?;
        }
        Some(Value::Array(arr))
    } else if rest.is_empty() {
        None
    } else {
        Some(remove_resolved(entry, rest)?)
    };

    let mut map = map.clone();
    match rebuilt_entry {
        Some(v) => {
            map.insert(seg.key.clone(), v);
        }
        None => {
            map.remove(&seg.key);
        }
    }
    Some(Value::Object(map))
}

/// Clone the mapping at a write position, materializing one from `null`.
fn as_writable_map(value: &Value, seg: &Segment) -> Result<Map<String, Value>, PathError> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        Value::Null => Ok(Map::new()),
        _ => Err(PathError::InvalidTarget {
            segment: seg.key.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{get, parse};
    use serde_json::json;

    #[test]
    fn set_replaces_leaf() {
        let doc = json!({"name": "old", "keep": true});
        let out = set(&doc, &parse("name").unwrap(), json!("new")).unwrap();
        assert_eq!(out, json!({"name": "new", "keep": true}));
        // input untouched
        assert_eq!(doc, json!({"name": "old", "keep": true}));
    }

    #[test]
    fn set_creates_missing_intermediates() {
        let doc = json!({});
        let out = set(&doc, &parse("meta.author.name").unwrap(), json!("ada")).unwrap();
        assert_eq!(out, json!({"meta": {"author": {"name": "ada"}}}));
    }

    #[test]
    fn set_overwrites_null_intermediate() {
        let doc = json!({"meta": null});
        let out = set(&doc, &parse("meta.name").unwrap(), json!(1)).unwrap();
        assert_eq!(out, json!({"meta": {"name": 1}}));
    }

    #[test]
    fn set_rejects_scalar_intermediate() {
        let doc = json!({"meta": "oops"});
        let err = set(&doc, &parse("meta.name").unwrap(), json!(1)).unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidTarget {
                segment: "meta".to_string()
            }
        );
    }

    #[test]
    fn set_rejects_list_without_wildcard() {
        let doc = json!({"rows": [1, 2]});
        assert!(set(&doc, &parse("rows.name").unwrap(), json!(1)).is_err());
    }

    #[test]
    fn set_wildcard_writes_first_element() {
        let doc = json!({"sections": [{"text": "a"}, {"text": "b"}]});
        let out = set(&doc, &parse("sections[].text").unwrap(), json!("edited")).unwrap();
        assert_eq!(
            out,
            json!({"sections": [{"text": "edited"}, {"text": "b"}]})
        );
    }

    #[test]
    fn set_wildcard_materializes_missing_list() {
        let doc = json!({});
        let out = set(&doc, &parse("sections[].text").unwrap(), json!("hi")).unwrap();
        assert_eq!(out, json!({"sections": [{"text": "hi"}]}));
    }

    #[test]
    fn set_wildcard_materializes_empty_list() {
        let doc = json!({"sections": []});
        let out = set(&doc, &parse("sections[].text").unwrap(), json!("hi")).unwrap();
        assert_eq!(out, json!({"sections": [{"text": "hi"}]}));
    }

    #[test]
    fn set_wildcard_leaf_replaces_first_element() {
        let doc = json!({"tags": ["x", "y"]});
        let out = set(&doc, &parse("tags[]").unwrap(), json!("z")).unwrap();
        assert_eq!(out, json!({"tags": ["z", "y"]}));
    }

    #[test]
    fn set_wildcard_over_scalar_entry_is_error() {
        let doc = json!({"tags": "not-a-list"});
        assert!(set(&doc, &parse("tags[]").unwrap(), json!("z")).is_err());
    }

    #[test]
    fn set_empty_path_replaces_root() {
        let doc = json!({"a": 1});
        assert_eq!(set(&doc, &[], json!(42)).unwrap(), json!(42));
    }

    #[test]
    fn remove_leaf_key() {
        let doc = json!({"a": 1, "b": {"c": 2, "d": 3}});
        let out = remove(&doc, &parse("b.c").unwrap());
        assert_eq!(out, json!({"a": 1, "b": {"d": 3}}));
        assert_eq!(doc, json!({"a": 1, "b": {"c": 2, "d": 3}}));
    }

    #[test]
    fn remove_unresolved_is_noop() {
        let doc = json!({"a": 1});
        assert_eq!(remove(&doc, &parse("a.b.c").unwrap()), doc);
        assert_eq!(remove(&doc, &parse("zzz").unwrap()), doc);
    }

    #[test]
    fn remove_wildcard_leaf_drops_first_element() {
        let doc = json!({"tags": ["x", "y"]});
        assert_eq!(remove(&doc, &parse("tags[]").unwrap()), json!({"tags": ["y"]}));
    }

    #[test]
    fn remove_through_wildcard() {
        let doc = json!({"sections": [{"text": "a", "n": 1}]});
        let out = remove(&doc, &parse("sections[].text").unwrap());
        assert_eq!(out, json!({"sections": [{"n": 1}]}));
    }

    #[test]
    fn removed_key_is_absent_not_null() {
        let doc = json!({"a": 1});
        let out = remove(&doc, &parse("a").unwrap());
        assert_eq!(get(&out, &parse("a").unwrap()), None);
        assert_eq!(out, json!({}));
    }
}
