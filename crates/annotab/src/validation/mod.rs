//! Server validation-error mapping.
//!
//! The save endpoint returns field-level error records keyed by the same
//! path language the templates use. This module groups them per path,
//! formats each record into one message string (structure is contract,
//! wording is presentation), routes groups to the owning object buffer,
//! and applies a whole save response to a document buffer.

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::document_buffer::DocumentBuffer;
use crate::error::EngineError;

/// One field-level error record from the save endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub field: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub original_message: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub input: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseDetail {
    #[serde(default)]
    pub error_details: Vec<ErrorDetail>,
}

/// The save endpoint's response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<ResponseDetail>,
}

/// What a save response meant for the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveDisposition {
    /// Accepted; all server errors cleared.
    Success,
    /// Rejected with field-level errors, now applied onto the buffers.
    FieldErrors,
    /// Rejected (or failed) without field attribution; retryable.
    DocumentFailure(String),
}

/// Group raw error records into formatted messages per field path.
///
/// Multi-record fields keep one message per record; the list is never
/// collapsed into a single string.
pub fn group_by_field(details: &[ErrorDetail]) -> IndexMap<String, Vec<String>> {
    let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
    for detail in details {
        grouped
            .entry(detail.field.clone())
            .or_default()
            .push(format_detail(detail));
    }
    grouped
}

/// Render one record as a single message string.
fn format_detail(detail: &ErrorDetail) -> String {
    let base = detail
        .message
        .as_deref()
        .or(detail.original_message.as_deref())
        .unwrap_or("invalid value");
    let mut out = match &detail.error_type {
        Some(t) if t != base => format!("[{t}] {base}"),
        _ => base.to_string(),
    };
    if let Some(input) = &detail.input {
        let rendered = match input {
            Value::String(s) => s.clone(),
            other => serde_json::to_string(other).unwrap_or_default(),
        };
        out.push_str(&format!(" (input: {rendered})"));
    }
    out
}

/// Split an index-qualified path like `items[2].name` into `(2, "name")`.
fn split_object_route(path: &str) -> Option<(usize, String)> {
    let re = Regex::new(r"^items\[(\d+)\]\.(.+)$").ok()?;
    let caps = re.captures(path)?;
    let index = caps[1].parse().ok()?;
    Some((index, caps[2].to_string()))
}

/// Apply grouped errors onto the owning object buffers.
///
/// A single-object document takes the whole map directly. With multiple
/// objects, an index-qualified path routes to that object; an unqualified
/// (or out-of-range) path is broadcast to every object: the server does
/// not always encode ownership, and broadcasting is the documented
/// precision-loss fallback.
pub fn apply_to_document(
    doc: &DocumentBuffer,
    grouped: &IndexMap<String, Vec<String>>,
) -> DocumentBuffer {
    let count = doc.object_count();
    if count <= 1 {
        let objects = doc
            .objects()
            .iter()
            .map(|o| o.apply_server_errors(grouped.clone()))
            .collect();
        return doc.with_objects(objects);
    }

    let mut per_object: Vec<IndexMap<String, Vec<String>>> = vec![IndexMap::new(); count];
    for (path, messages) in grouped {
        match split_object_route(path) {
            Some((index, rest)) if index < count => {
                per_object[index]
                    .entry(rest)
                    .or_default()
                    .extend(messages.iter().cloned());
            }
            _ => {
                for map in &mut per_object {
                    map.entry(path.clone())
                        .or_default()
                        .extend(messages.iter().cloned());
                }
            }
        }
    }

    let objects = doc
        .objects()
        .iter()
        .zip(per_object)
        .map(|(object, errors)| object.apply_server_errors(errors))
        .collect();
    doc.with_objects(objects)
}

/// Deserialize a raw response value into the typed envelope.
pub fn parse_save_response(value: &Value) -> Result<SaveResponse, EngineError> {
    serde_json::from_value(value.clone())
        .map_err(|err| EngineError::MalformedResponse(err.to_string()))
}

/// Reconcile a save response with the document buffer it was issued for.
///
/// # Errors
///
/// `EngineError::MalformedResponse` for a failure response carrying
/// neither a message nor error details.
pub fn apply_save_response(
    doc: &DocumentBuffer,
    response: &SaveResponse,
) -> Result<(DocumentBuffer, SaveDisposition), EngineError> {
    if response.success {
        let objects = doc
            .objects()
            .iter()
            .map(|o| o.apply_server_errors(IndexMap::new()))
            .collect();
        return Ok((doc.with_objects(objects), SaveDisposition::Success));
    }

    let details = response
        .detail
        .as_ref()
        .map(|d| d.error_details.as_slice())
        .unwrap_or_default();
    if !details.is_empty() {
        let grouped = group_by_field(details);
        return Ok((
            apply_to_document(doc, &grouped),
            SaveDisposition::FieldErrors,
        ));
    }

    match response.message.as_deref() {
        Some(message) if !message.is_empty() => Ok((
            doc.clone(),
            SaveDisposition::DocumentFailure(message.to_string()),
        )),
        _ => Err(EngineError::MalformedResponse(
            "failure response carries neither message nor error details".to_string(),
        )),
    }
}
