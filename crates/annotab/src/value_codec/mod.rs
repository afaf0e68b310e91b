//! Raw edit-box input ⇄ typed field values.
//!
//! Pure type coercion, no domain validation: required/length/range checks
//! live elsewhere (required locally in the object buffer, everything else
//! on the server). Unparsable numeric input deliberately passes through as
//! the raw string: the server rejects it with an authoritative message,
//! the engine does not invent one.

use serde_json::Value;

use crate::template::FieldKind;

/// Human-readable rendering of a stored value for display/edit boxes.
///
/// Primitives render via their display form (`null` as the empty string,
/// an unset edit box); lists of primitives join with `", "`; lists
/// containing containers, and bare mappings, render as pretty JSON text so
/// complex fields can be free-typed as JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            if items.iter().any(|v| v.is_object() || v.is_array()) {
                pretty(value)
            } else {
                let parts: Vec<String> = items.iter().map(format_value).collect();
                parts.join(", ")
            }
        }
        Value::Object(_) => pretty(value),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Convert a raw edit-box value to the field's declared kind.
///
/// Returns `None` when the input unsets the field (empty string on any
/// non-string kind). `previous` is the field's current value; it decides
/// whether string input for a structured field should be JSON-parsed back
/// into a list/mapping.
pub fn parse_input(raw: &Value, kind: FieldKind, previous: Option<&Value>) -> Option<Value> {
    if let Value::String(s) = raw {
        if s.is_empty() {
            return match kind {
                // An explicit empty string is preserved; the server decides
                // whether to accept it.
                FieldKind::Str => Some(Value::String(String::new())),
                _ => None,
            };
        }
    }
    match kind {
        FieldKind::Int => Some(parse_int(raw)),
        FieldKind::Float => Some(parse_float(raw)),
        FieldKind::Bool => Some(parse_bool(raw)),
        _ => Some(parse_textual(raw, previous)),
    }
}

fn parse_int(raw: &Value) -> Value {
    match raw {
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => raw.clone(),
        },
        _ => raw.clone(),
    }
}

fn parse_float(raw: &Value) -> Value {
    match raw {
        Value::String(s) => {
            match s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
            {
                Some(n) => Value::Number(n),
                None => raw.clone(),
            }
        }
        _ => raw.clone(),
    }
}

fn parse_bool(raw: &Value) -> Value {
    match raw {
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Value::Bool(true),
            "false" | "0" | "no" => Value::Bool(false),
            _ => raw.clone(),
        },
        _ => raw.clone(),
    }
}

fn parse_textual(raw: &Value, previous: Option<&Value>) -> Value {
    if let (Value::String(s), Some(prev)) = (raw, previous) {
        if prev.is_array() || prev.is_object() {
            if let Ok(parsed) = serde_json::from_str::<Value>(s) {
                return parsed;
            }
        }
    }
    raw.clone()
}
