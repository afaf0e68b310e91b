//! Audit/review export: a pure serialization of document buffer state.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::document_buffer::DocumentBuffer;
use crate::object_buffer::ObjectBuffer;

/// The export artifact produced on demand for audit/review.
///
/// `export_time` is caller-supplied; the engine has no clock.
#[derive(Debug, Clone, Serialize)]
pub struct ExportArtifact {
    pub document_id: String,
    pub document_filename: String,
    pub export_time: String,
    pub objects_count: usize,
    pub annotation_data: Value,
    pub objects_status: Vec<ObjectStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectStatus {
    pub index: usize,
    pub completion_percentage: f64,
    pub modified_fields: Vec<String>,
    pub validation_status: ValidationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationStatus {
    pub is_valid: bool,
    pub errors: IndexMap<String, Vec<String>>,
}

/// Snapshot a document buffer into the export artifact.
pub fn export_document(
    doc: &DocumentBuffer,
    document_filename: &str,
    export_time: &str,
) -> ExportArtifact {
    ExportArtifact {
        document_id: doc.document_id().to_string(),
        document_filename: document_filename.to_string(),
        export_time: export_time.to_string(),
        objects_count: doc.object_count(),
        annotation_data: doc.to_submission_payload(),
        objects_status: doc.objects().iter().map(object_status).collect(),
    }
}

fn object_status(object: &ObjectBuffer) -> ObjectStatus {
    ObjectStatus {
        index: object.index(),
        completion_percentage: object.completion_percentage(),
        modified_fields: object.modified_paths().iter().cloned().collect(),
        validation_status: ValidationStatus {
            is_valid: object.is_valid(),
            errors: object.errors_by_path(),
        },
    }
}
