//! Per-object annotation buffer.
//!
//! Holds one JSON object's original data and its edited counterpart, plus
//! the derived state the UI renders from: the set of modified field paths,
//! per-path validation errors, and the completion percentage. Buffers are
//! functionally updated (every mutation returns a new value), which keeps
//! the "original data is immutable" invariant mechanically checkable.
//!
//! Error provenance is tracked in two layers. The local layer holds only
//! the required-field check an edit can re-validate itself; the server
//! layer holds the authoritative verdict from the last save attempt and is
//! only ever replaced wholesale by the next one. An edit therefore never
//! clears a server error it cannot re-check.

use std::collections::BTreeSet;
use std::sync::Arc;

use annotab_field_path::{self as field_path, Segment};
use annotab_util::{is_unset, opt_equal};
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::EngineError;
use crate::template::AnnotationField;
use crate::value_codec;

#[derive(Debug, Clone)]
pub struct ObjectBuffer {
    index: usize,
    original_data: Value,
    annotation_data: Value,
    fields: Arc<Vec<AnnotationField>>,
    modified_paths: BTreeSet<String>,
    local_errors: IndexMap<String, Vec<String>>,
    server_errors: IndexMap<String, Vec<String>>,
    completion_percentage: f64,
}

impl ObjectBuffer {
    /// Build a buffer for one object.
    ///
    /// `annotation_data` starts as a clone of `original_data` with any
    /// value found in `previous_annotation` at a declared field path
    /// overlaid. A previously-saved value that cannot be written back
    /// (shape conflict with the document) is skipped rather than failing
    /// the whole document load.
    pub fn new(
        index: usize,
        original_data: Value,
        fields: Arc<Vec<AnnotationField>>,
        previous_annotation: Option<&Value>,
    ) -> Result<Self, EngineError> {
        let mut annotation_data = original_data.clone();
        if let Some(previous) = previous_annotation {
            for field in fields.iter() {
                let segments = field_path::parse(&field.path)?;
                if let Some(saved) = field_path::get(previous, &segments) {
                    if let Ok(next) =
                        field_path::set(&annotation_data, &segments, saved.clone())
                    {
                        annotation_data = next;
                    }
                }
            }
        }

        let mut buffer = Self {
            index,
            original_data,
            annotation_data,
            fields,
            modified_paths: BTreeSet::new(),
            local_errors: IndexMap::new(),
            server_errors: IndexMap::new(),
            completion_percentage: 0.0,
        };
        buffer.modified_paths = buffer.compute_modified_paths();
        buffer.completion_percentage = buffer.compute_completion();
        Ok(buffer)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn original_data(&self) -> &Value {
        &self.original_data
    }

    pub fn annotation_data(&self) -> &Value {
        &self.annotation_data
    }

    pub fn fields(&self) -> &[AnnotationField] {
        &self.fields
    }

    /// Paths whose current value differs from the original (sorted, distinct).
    pub fn modified_paths(&self) -> &BTreeSet<String> {
        &self.modified_paths
    }

    pub fn is_dirty(&self) -> bool {
        !self.modified_paths.is_empty()
    }

    pub fn completion_percentage(&self) -> f64 {
        self.completion_percentage
    }

    pub fn local_errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.local_errors
    }

    pub fn server_errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.server_errors
    }

    /// Merged view of both error layers (server messages first per path).
    pub fn errors_by_path(&self) -> IndexMap<String, Vec<String>> {
        let mut merged = self.server_errors.clone();
        for (path, messages) in &self.local_errors {
            merged
                .entry(path.clone())
                .or_default()
                .extend(messages.iter().cloned());
        }
        merged
    }

    pub fn is_valid(&self) -> bool {
        self.local_errors.is_empty() && self.server_errors.is_empty()
    }

    /// Look up the declared field for a path.
    pub fn field(&self, path: &str) -> Result<&AnnotationField, EngineError> {
        self.fields
            .iter()
            .find(|f| f.path == path)
            .ok_or_else(|| EngineError::UnknownField(path.to_string()))
    }

    /// Apply a raw edit-box value to one field.
    ///
    /// The raw value is codec-parsed per the field's declared kind, written
    /// into a fresh `annotation_data` (or removed, when parsing yields
    /// "unset"), and the path's dirty/required state plus the overall
    /// completion are recomputed. Server errors, on this path and every
    /// other, are left untouched.
    pub fn apply_field_edit(&self, path: &str, raw: &Value) -> Result<Self, EngineError> {
        let field = self.field(path)?.clone();
        let segments = field_path::parse(path)?;
        let previous = field_path::get(&self.annotation_data, &segments);
        let parsed = value_codec::parse_input(raw, field.kind, previous);
        let annotation_data = match parsed {
            Some(value) => field_path::set(&self.annotation_data, &segments, value)?,
            None => field_path::remove(&self.annotation_data, &segments),
        };
        Ok(self.with_annotation(annotation_data, path, &segments, &field))
    }

    /// Reset one field to the original document value.
    pub fn reset_field(&self, path: &str) -> Result<Self, EngineError> {
        let field = self.field(path)?.clone();
        let segments = field_path::parse(path)?;
        let original = field_path::get(&self.original_data, &segments).cloned();
        let annotation_data = match original {
            Some(value) => field_path::set(&self.annotation_data, &segments, value)?,
            None => field_path::remove(&self.annotation_data, &segments),
        };
        Ok(self.with_annotation(annotation_data, path, &segments, &field))
    }

    /// Reset every declared field to the original document value.
    pub fn reset_all(&self) -> Result<Self, EngineError> {
        let fields = Arc::clone(&self.fields);
        let mut buffer = self.clone();
        for field in fields.iter() {
            buffer = buffer.reset_field(&field.path)?;
        }
        Ok(buffer)
    }

    /// Fill unset fields from their template `default_value`.
    ///
    /// Defaults are applied as ordinary edits: a default differing from
    /// the original marks the path modified.
    pub fn apply_defaults(&self) -> Result<Self, EngineError> {
        let fields = Arc::clone(&self.fields);
        let mut buffer = self.clone();
        for field in fields.iter() {
            let Some(default) = field.default_value.clone() else {
                continue;
            };
            let segments = field_path::parse(&field.path)?;
            if is_unset(field_path::get(&buffer.annotation_data, &segments)) {
                let annotation_data =
                    field_path::set(&buffer.annotation_data, &segments, default)?;
                buffer = buffer.with_annotation(annotation_data, &field.path, &segments, field);
            }
        }
        Ok(buffer)
    }

    /// Replace the server error layer wholesale (after a save attempt).
    pub fn apply_server_errors(&self, errors: IndexMap<String, Vec<String>>) -> Self {
        let mut next = self.clone();
        next.server_errors = errors;
        next
    }

    /// Rebuild derived state for one edited path.
    fn with_annotation(
        &self,
        annotation_data: Value,
        path: &str,
        segments: &[Segment],
        field: &AnnotationField,
    ) -> Self {
        let mut next = self.clone();
        next.annotation_data = annotation_data;

        let current = field_path::get(&next.annotation_data, segments);
        let original = field_path::get(&next.original_data, segments);
        let dirty = !opt_equal(current, original);
        let missing = field.required && is_unset(current);

        if dirty {
            next.modified_paths.insert(path.to_string());
        } else {
            next.modified_paths.remove(path);
        }
        if missing {
            next.local_errors
                .insert(path.to_string(), vec![format!("{path} is required")]);
        } else {
            next.local_errors.shift_remove(path);
        }
        next.completion_percentage = next.compute_completion();
        next
    }

    fn compute_modified_paths(&self) -> BTreeSet<String> {
        let mut paths = BTreeSet::new();
        for field in self.fields.iter() {
            let Ok(segments) = field_path::parse(&field.path) else {
                continue;
            };
            let current = field_path::get(&self.annotation_data, &segments);
            let original = field_path::get(&self.original_data, &segments);
            if !opt_equal(current, original) {
                paths.insert(field.path.clone());
            }
        }
        paths
    }

    fn compute_completion(&self) -> f64 {
        let total = self.fields.len();
        if total == 0 {
            return 0.0;
        }
        let answered = self
            .fields
            .iter()
            .filter(|field| {
                field_path::parse(&field.path).is_ok_and(|segments| {
                    !is_unset(field_path::get(&self.annotation_data, &segments))
                })
            })
            .count();
        100.0 * answered as f64 / total as f64
    }
}
