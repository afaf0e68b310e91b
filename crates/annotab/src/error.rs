//! Engine error taxonomy.
//!
//! Validation conditions (required-field, server verdicts) are buffer
//! state, never `Err`. These variants cover only the truly exceptional
//! cases: malformed paths, templates, and server payload shapes.

use annotab_field_path::PathError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("no declared field for path {0:?}")]
    UnknownField(String),
    #[error("object index {index} out of range for document with {count} objects")]
    ObjectIndexOutOfRange { index: usize, count: usize },
    #[error("malformed template: {0}")]
    MalformedTemplate(String),
    #[error("malformed save response: {0}")]
    MalformedResponse(String),
}
