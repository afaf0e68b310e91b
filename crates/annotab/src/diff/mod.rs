//! Structural diff between an original and an annotated value.
//!
//! Read-only, for the review/compare view. Mappings are recursed key by
//! key; every other value, lists included, is compared by deep equality
//! as a whole at its own path. That keeps the walk linear in the leaf
//! count and avoids a list-alignment policy.

use annotab_util::deep_equal;
use serde_json::{Map, Value};

/// Classification of one diffed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Added,
    Deleted,
    Modified,
    Unchanged,
}

/// One leaf entry of a structural diff.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry {
    pub path: String,
    pub original: Option<Value>,
    pub annotated: Option<Value>,
    pub kind: DiffKind,
}

/// Diff `annotated` against `original`.
///
/// Entry order is deterministic: the original's own key order first, then
/// any annotated-only keys, at every level.
pub fn diff(original: &Value, annotated: &Value) -> Vec<DiffEntry> {
    let mut entries = Vec::new();
    diff_at(&mut entries, "", original, annotated);
    entries
}

fn diff_at(entries: &mut Vec<DiffEntry>, prefix: &str, original: &Value, annotated: &Value) {
    match (original, annotated) {
        (Value::Object(orig), Value::Object(annot)) => diff_maps(entries, prefix, orig, annot),
        _ => {
            let kind = if deep_equal(original, annotated) {
                DiffKind::Unchanged
            } else {
                DiffKind::Modified
            };
            entries.push(DiffEntry {
                path: prefix.to_string(),
                original: Some(original.clone()),
                annotated: Some(annotated.clone()),
                kind,
            });
        }
    }
}

fn diff_maps(
    entries: &mut Vec<DiffEntry>,
    prefix: &str,
    original: &Map<String, Value>,
    annotated: &Map<String, Value>,
) {
    for (key, orig_val) in original {
        let path = join(prefix, key);
        match annotated.get(key) {
            None => entries.push(DiffEntry {
                path,
                original: Some(orig_val.clone()),
                annotated: None,
                kind: DiffKind::Deleted,
            }),
            Some(annot_val) => {
                if orig_val.is_object() && annot_val.is_object() {
                    // Recurse: only the deeper leaf entries are emitted,
                    // never a single entry for the container.
                    diff_at(entries, &path, orig_val, annot_val);
                } else {
                    let kind = if deep_equal(orig_val, annot_val) {
                        DiffKind::Unchanged
                    } else {
                        DiffKind::Modified
                    };
                    entries.push(DiffEntry {
                        path,
                        original: Some(orig_val.clone()),
                        annotated: Some(annot_val.clone()),
                        kind,
                    });
                }
            }
        }
    }
    for (key, annot_val) in annotated {
        if !original.contains_key(key) {
            entries.push(DiffEntry {
                path: join(prefix, key),
                original: None,
                annotated: Some(annot_val.clone()),
                kind: DiffKind::Added,
            });
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
