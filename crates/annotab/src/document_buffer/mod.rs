//! Document-level buffer: shape handling, navigation, aggregates.
//!
//! A document encodes one object, a list of objects, or an `{items: [...]}`
//! wrapper. The shape is detected once at construction and owned here, so
//! the path resolver below never sees wrappers. Reassembly for submission
//! is the exact inverse, preserving any extra wrapper keys.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::object_buffer::ObjectBuffer;
use crate::template::AnnotationField;

/// How the document content encodes its objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// A bare object: the whole content is one annotatable object.
    Bare,
    /// A top-level list of objects.
    List,
    /// An object wrapping its objects in an `items` list.
    ItemsWrapper,
}

#[derive(Debug, Clone)]
pub struct DocumentBuffer {
    document_id: String,
    shape: DocumentShape,
    /// Original wrapper map, retained for reassembly (ItemsWrapper only).
    wrapper: Option<Map<String, Value>>,
    fields: Arc<Vec<AnnotationField>>,
    objects: Vec<ObjectBuffer>,
    current_index: usize,
}

impl DocumentBuffer {
    /// Build a buffer for one opened document.
    ///
    /// `previous_annotation` (the last saved payload, if any) is normalized
    /// by the same shape rules and overlaid per declared field path,
    /// position-matched by object index.
    pub fn from_document(
        document_id: impl Into<String>,
        content: &Value,
        fields: Vec<AnnotationField>,
        previous_annotation: Option<&Value>,
    ) -> Result<Self, EngineError> {
        let fields = Arc::new(fields);
        let (shape, elements, wrapper) = detect_shape(content);
        let previous_elements: Vec<&Value> = previous_annotation
            .map(|prev| detect_shape(prev).1)
            .unwrap_or_default();

        let mut objects = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            objects.push(ObjectBuffer::new(
                index,
                element.clone(),
                Arc::clone(&fields),
                previous_elements.get(index).copied(),
            )?);
        }

        Ok(Self {
            document_id: document_id.into(),
            shape,
            wrapper,
            fields,
            objects,
            current_index: 0,
        })
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn shape(&self) -> DocumentShape {
        self.shape
    }

    pub fn fields(&self) -> &[AnnotationField] {
        &self.fields
    }

    pub fn objects(&self) -> &[ObjectBuffer] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_object(&self) -> Option<&ObjectBuffer> {
        self.objects.get(self.current_index)
    }

    // ── Navigation ────────────────────────────────────────────────────────
    //
    // Pure index changes: no buffer contents are touched, edits survive
    // switching objects.

    pub fn next(&self) -> Self {
        let last = self.objects.len().saturating_sub(1);
        let mut next = self.clone();
        next.current_index = (self.current_index + 1).min(last);
        next
    }

    pub fn previous(&self) -> Self {
        let mut next = self.clone();
        next.current_index = self.current_index.saturating_sub(1);
        next
    }

    pub fn go_to(&self, index: usize) -> Result<Self, EngineError> {
        if index >= self.objects.len() {
            return Err(EngineError::ObjectIndexOutOfRange {
                index,
                count: self.objects.len(),
            });
        }
        let mut next = self.clone();
        next.current_index = index;
        Ok(next)
    }

    // ── Edits ─────────────────────────────────────────────────────────────

    pub fn apply_field_edit(
        &self,
        object_index: usize,
        path: &str,
        raw: &Value,
    ) -> Result<Self, EngineError> {
        self.update_object(object_index, |obj| obj.apply_field_edit(path, raw))
    }

    pub fn reset_field(&self, object_index: usize, path: &str) -> Result<Self, EngineError> {
        self.update_object(object_index, |obj| obj.reset_field(path))
    }

    pub fn reset_all(&self, object_index: usize) -> Result<Self, EngineError> {
        self.update_object(object_index, |obj| obj.reset_all())
    }

    pub fn apply_defaults(&self, object_index: usize) -> Result<Self, EngineError> {
        self.update_object(object_index, |obj| obj.apply_defaults())
    }

    fn update_object(
        &self,
        object_index: usize,
        op: impl FnOnce(&ObjectBuffer) -> Result<ObjectBuffer, EngineError>,
    ) -> Result<Self, EngineError> {
        let object = self
            .objects
            .get(object_index)
            .ok_or(EngineError::ObjectIndexOutOfRange {
                index: object_index,
                count: self.objects.len(),
            })?;
        let updated = op(object)?;
        let mut objects = self.objects.clone();
        objects[object_index] = updated;
        Ok(self.with_objects(objects))
    }

    pub(crate) fn with_objects(&self, objects: Vec<ObjectBuffer>) -> Self {
        let mut next = self.clone();
        next.objects = objects;
        next
    }

    // ── Aggregates ────────────────────────────────────────────────────────

    pub fn is_dirty(&self) -> bool {
        self.objects.iter().any(ObjectBuffer::is_dirty)
    }

    pub fn is_valid(&self) -> bool {
        self.objects.iter().all(ObjectBuffer::is_valid)
    }

    /// Mean completion over all objects (0 for an empty document).
    pub fn completion_percentage(&self) -> f64 {
        if self.objects.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .objects
            .iter()
            .map(ObjectBuffer::completion_percentage)
            .sum();
        sum / self.objects.len() as f64
    }

    pub fn modified_field_count(&self) -> usize {
        self.objects.iter().map(|o| o.modified_paths().len()).sum()
    }

    /// Merged error view per object index (only non-empty maps included).
    pub fn errors_by_object(&self) -> IndexMap<usize, IndexMap<String, Vec<String>>> {
        let mut out = IndexMap::new();
        for object in &self.objects {
            let errors = object.errors_by_path();
            if !errors.is_empty() {
                out.insert(object.index(), errors);
            }
        }
        out
    }

    // ── Reassembly ────────────────────────────────────────────────────────

    /// Re-assemble all per-object edits into the document's original shape.
    pub fn to_submission_payload(&self) -> Value {
        match self.shape {
            DocumentShape::Bare => self
                .objects
                .first()
                .map(|o| o.annotation_data().clone())
                .unwrap_or(Value::Null),
            DocumentShape::List => Value::Array(
                self.objects
                    .iter()
                    .map(|o| o.annotation_data().clone())
                    .collect(),
            ),
            DocumentShape::ItemsWrapper => {
                let mut wrapper = self.wrapper.clone().unwrap_or_default();
                wrapper.insert(
                    "items".to_string(),
                    Value::Array(
                        self.objects
                            .iter()
                            .map(|o| o.annotation_data().clone())
                            .collect(),
                    ),
                );
                Value::Object(wrapper)
            }
        }
    }
}

/// Detect the document shape and split out its object elements.
fn detect_shape(content: &Value) -> (DocumentShape, Vec<&Value>, Option<Map<String, Value>>) {
    match content {
        Value::Array(items) => (DocumentShape::List, items.iter().collect(), None),
        Value::Object(map) => match map.get("items") {
            Some(Value::Array(items)) => (
                DocumentShape::ItemsWrapper,
                items.iter().collect(),
                Some(map.clone()),
            ),
            _ => (DocumentShape::Bare, vec![content], None),
        },
        other => (DocumentShape::Bare, vec![other], None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parse_template;
    use serde_json::json;

    fn name_fields() -> Vec<AnnotationField> {
        parse_template(&json!([
            {"path": "name", "field_type": "str", "required": true}
        ]))
        .unwrap()
    }

    #[test]
    fn bare_document_has_one_object() {
        let doc = DocumentBuffer::from_document(
            "doc-1",
            &json!({"name": "a"}),
            name_fields(),
            None,
        )
        .unwrap();
        assert_eq!(doc.shape(), DocumentShape::Bare);
        assert_eq!(doc.object_count(), 1);
        assert_eq!(doc.to_submission_payload(), json!({"name": "a"}));
    }

    #[test]
    fn list_document_splits_and_reassembles() {
        let doc = DocumentBuffer::from_document(
            "doc-2",
            &json!([{"name": "a"}, {"name": "b"}]),
            name_fields(),
            None,
        )
        .unwrap();
        assert_eq!(doc.shape(), DocumentShape::List);
        assert_eq!(doc.object_count(), 2);

        let edited = doc.apply_field_edit(1, "name", &json!("B")).unwrap();
        assert_eq!(
            edited.to_submission_payload(),
            json!([{"name": "a"}, {"name": "B"}])
        );
    }

    #[test]
    fn items_wrapper_preserves_extra_keys() {
        let content = json!({
            "items": [{"name": "a"}, {"name": "b"}],
            "type": "array",
            "source": "batch-7"
        });
        let doc =
            DocumentBuffer::from_document("doc-3", &content, name_fields(), None).unwrap();
        assert_eq!(doc.shape(), DocumentShape::ItemsWrapper);

        let edited = doc
            .apply_field_edit(0, "name", &json!("A"))
            .unwrap()
            .apply_field_edit(1, "name", &json!("B"))
            .unwrap();
        assert_eq!(
            edited.to_submission_payload(),
            json!({
                "items": [{"name": "A"}, {"name": "B"}],
                "type": "array",
                "source": "batch-7"
            })
        );
    }

    #[test]
    fn previous_annotation_overlays_by_position() {
        let doc = DocumentBuffer::from_document(
            "doc-4",
            &json!({"items": [{"name": "a"}, {"name": "b"}], "type": "array"}),
            name_fields(),
            Some(&json!({"items": [{"name": "saved-a"}], "type": "array"})),
        )
        .unwrap();
        assert_eq!(
            doc.objects()[0].annotation_data(),
            &json!({"name": "saved-a"})
        );
        // No previous element at index 1
        assert_eq!(doc.objects()[1].annotation_data(), &json!({"name": "b"}));
        assert!(doc.is_dirty());
    }

    #[test]
    fn navigation_is_pure_and_preserves_edits() {
        let doc = DocumentBuffer::from_document(
            "doc-5",
            &json!([{"name": "a"}, {"name": "b"}, {"name": "c"}]),
            name_fields(),
            None,
        )
        .unwrap();
        let edited = doc.apply_field_edit(0, "name", &json!("A")).unwrap();

        let moved = edited.next().next().previous();
        assert_eq!(moved.current_index(), 1);
        assert_eq!(
            moved.objects()[0].annotation_data(),
            &json!({"name": "A"})
        );

        // next() saturates at the end
        let end = moved.next().next().next();
        assert_eq!(end.current_index(), 2);
        // previous() saturates at the start
        assert_eq!(end.previous().previous().previous().current_index(), 0);
    }

    #[test]
    fn go_to_rejects_out_of_range() {
        let doc = DocumentBuffer::from_document(
            "doc-6",
            &json!([{"name": "a"}]),
            name_fields(),
            None,
        )
        .unwrap();
        assert!(doc.go_to(0).is_ok());
        assert!(matches!(
            doc.go_to(1),
            Err(EngineError::ObjectIndexOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn aggregates_over_objects() {
        let doc = DocumentBuffer::from_document(
            "doc-7",
            &json!([{"name": "a"}, {"name": ""}]),
            name_fields(),
            None,
        )
        .unwrap();
        assert!(!doc.is_dirty());
        assert!(doc.is_valid());
        // object 0 complete, object 1 empty name
        assert_eq!(doc.completion_percentage(), 50.0);

        // A str-kind edit preserves the explicit "", so the value equals
        // the original (clean), but the required check now fails.
        let edited = doc.apply_field_edit(1, "name", &json!("")).unwrap();
        assert!(!edited.is_dirty());
        assert_eq!(edited.modified_field_count(), 0);
        assert!(!edited.is_valid());
    }

    #[test]
    fn bare_object_with_items_list_is_wrapper() {
        // Shape detection keys off the items list alone; the loader's type
        // tag is not required here.
        let doc = DocumentBuffer::from_document(
            "doc-8",
            &json!({"items": [{"name": "x"}]}),
            name_fields(),
            None,
        )
        .unwrap();
        assert_eq!(doc.shape(), DocumentShape::ItemsWrapper);
    }
}
