//! annotab — annotation data engine over semi-structured JSON documents.
//!
//! Annotators fill in structured fields addressed by dotted paths inside
//! deeply nested, possibly array-wrapped JSON values. This crate holds the
//! state logic: per-object annotation buffers (original vs. edited data,
//! dirty set, completion), document-level shape handling and reassembly,
//! structural diff for review, and the merge of server-side validation
//! errors back onto the right buffers. Pure data in, data out; no I/O.

pub mod error;
pub mod template;
pub mod value_codec;

pub mod object_buffer;
pub mod document_buffer;

pub mod diff;
pub mod validation;
pub mod export;
pub mod schedule;

// Re-exports for convenience
pub use diff::{diff, DiffEntry, DiffKind};
pub use document_buffer::{DocumentBuffer, DocumentShape};
pub use error::EngineError;
pub use export::{export_document, ExportArtifact};
pub use object_buffer::ObjectBuffer;
pub use schedule::{DebounceQueue, SaveAction, SaveCoordinator};
pub use template::{parse_template, AnnotationField, FieldConstraints, FieldKind};
pub use validation::{
    apply_save_response, apply_to_document, group_by_field, parse_save_response, ErrorDetail,
    SaveDisposition, SaveResponse,
};
