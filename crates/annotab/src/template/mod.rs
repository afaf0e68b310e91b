//! Annotation templates: field descriptors loaded at session start.
//!
//! A template is an ordered list of field declarations, deserialized from
//! the external descriptor format and immutable for the lifetime of one
//! editing session. Paths are validated here so the rest of the engine can
//! treat them as well-formed.

use annotab_field_path as field_path;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;

/// Primitive kind a field declares for its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    #[serde(rename = "str")]
    Str,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "List", alias = "list")]
    List,
    #[serde(rename = "dict")]
    Dict,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    #[serde(rename = "time")]
    Time,
}

/// Declarative constraints carried by a field.
///
/// The engine does not enforce these (domain validation is the server's
/// job); they are template data surfaced to presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub le: Option<f64>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldConstraints {
    /// Compile the regex constraint, if any.
    ///
    /// An invalid pattern yields `None` rather than an error; constraint
    /// enforcement is authoritative on the server side anyway.
    pub fn pattern_regex(&self) -> Option<regex::Regex> {
        let pattern = self.pattern.as_deref()?;
        RegexBuilder::new(pattern).build().ok()
    }
}

/// One declared annotation field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationField {
    /// Dotted field path into the object (see `annotab-field-path`).
    pub path: String,
    #[serde(rename = "field_type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub constraints: FieldConstraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl AnnotationField {
    /// Parse this field's path into segments.
    pub fn segments(&self) -> Result<Vec<field_path::Segment>, field_path::PathError> {
        field_path::parse(&self.path)
    }
}

/// Deserialize and validate a template descriptor.
///
/// # Errors
///
/// `EngineError::MalformedTemplate` when the descriptor does not match the
/// expected shape; `EngineError::Path` when a declared field path does not
/// parse. External template input is the one place malformed paths can
/// enter the engine, so they are rejected here.
pub fn parse_template(descriptor: &Value) -> Result<Vec<AnnotationField>, EngineError> {
    let fields: Vec<AnnotationField> = serde_json::from_value(descriptor.clone())
        .map_err(|err| EngineError::MalformedTemplate(err.to_string()))?;
    for field in &fields {
        field_path::parse(&field.path)?;
    }
    Ok(fields)
}
