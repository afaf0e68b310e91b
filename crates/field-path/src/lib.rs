//! Field-path utilities for nested JSON values.
//!
//! Implements the dotted path language annotation templates use to address
//! locations inside a document object: a dot-separated sequence of key
//! segments, where any segment may carry a trailing `[]` marker meaning
//! "descend into this array's first element" (e.g. `sections[].text`).
//!
//! # Example
//!
//! ```
//! use annotab_field_path::{parse, format, get, set};
//!
//! // Parse a path string into segments
//! let path = parse("sections[].text").unwrap();
//! assert_eq!(path.len(), 2);
//! assert!(path[0].array_wildcard);
//!
//! // Format segments back to a path string (round-trip)
//! assert_eq!(format(&path), "sections[].text");
//!
//! // Read and write through the path
//! let doc = serde_json::json!({"sections": [{"text": "old"}]});
//! assert_eq!(get(&doc, &path), Some(&serde_json::json!("old")));
//!
//! let updated = set(&doc, &path, serde_json::json!("new")).unwrap();
//! assert_eq!(get(&updated, &path), Some(&serde_json::json!("new")));
//! // The input document is never mutated
//! assert_eq!(get(&doc, &path), Some(&serde_json::json!("old")));
//! ```

use thiserror::Error;

pub mod types;
pub use types::Segment;

pub mod resolve;
pub use resolve::{get, get_in_document};

pub mod write;
pub use write::{remove, set};

/// Parse a field-path string into segments.
///
/// Splits on `.`; a trailing `[]` on a segment marks it as an array
/// wildcard. The empty path and paths with empty segments (leading,
/// trailing, or consecutive dots; a bare `[]`) are malformed.
///
/// # Example
///
/// ```
/// use annotab_field_path::{parse, Segment};
///
/// let path = parse("meta.tags[]").unwrap();
/// assert_eq!(path, vec![Segment::key("meta"), Segment::wildcard("tags")]);
///
/// assert!(parse("").is_err());
/// assert!(parse("a..b").is_err());
/// assert!(parse("a.[]").is_err());
/// ```
pub fn parse(path: &str) -> Result<Vec<Segment>, PathError> {
    if path.is_empty() {
        return Err(PathError::Malformed {
            path: path.to_string(),
        });
    }
    let mut segments = Vec::new();
    for raw in path.split('.') {
        let (key, array_wildcard) = match raw.strip_suffix("[]") {
            Some(stripped) => (stripped, true),
            None => (raw, false),
        };
        if key.is_empty() {
            return Err(PathError::Malformed {
                path: path.to_string(),
            });
        }
        segments.push(Segment {
            key: key.to_string(),
            array_wildcard,
        });
    }
    Ok(segments)
}

/// Format segments back into a field-path string.
///
/// Inverse of [`parse`]: `format(&parse(p)?) == p` for every valid `p`.
pub fn format(path: &[Segment]) -> String {
    let mut out = String::new();
    for (i, seg) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&seg.key);
        if seg.array_wildcard {
            out.push_str("[]");
        }
    }
    out
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path string cannot be parsed.
    #[error("malformed field path: {path:?}")]
    Malformed { path: String },
    /// A write would have to descend through a non-container value.
    #[error("cannot descend into non-container value at segment {segment:?}")]
    InvalidTarget { segment: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_key() {
        assert_eq!(parse("name").unwrap(), vec![Segment::key("name")]);
    }

    #[test]
    fn parse_nested() {
        assert_eq!(
            parse("meta.author.name").unwrap(),
            vec![
                Segment::key("meta"),
                Segment::key("author"),
                Segment::key("name")
            ]
        );
    }

    #[test]
    fn parse_wildcard_segments() {
        assert_eq!(
            parse("sections[].text").unwrap(),
            vec![Segment::wildcard("sections"), Segment::key("text")]
        );
        assert_eq!(parse("tags[]").unwrap(), vec![Segment::wildcard("tags")]);
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(parse(""), Err(PathError::Malformed { .. })));
    }

    #[test]
    fn parse_rejects_empty_segments() {
        assert!(parse("a..b").is_err());
        assert!(parse(".a").is_err());
        assert!(parse("a.").is_err());
        assert!(parse("[]").is_err());
        assert!(parse("a.[]").is_err());
    }

    #[test]
    fn format_roundtrip() {
        let cases = ["name", "meta.author.name", "sections[].text", "tags[]", "a[].b[].c"];
        for case in cases {
            let path = parse(case).unwrap();
            assert_eq!(format(&path), case, "failed roundtrip for {case:?}");
        }
    }

    #[test]
    fn wildcard_marker_only_trailing() {
        // An interior "[]" is part of the key, not a wildcard marker
        let path = parse("a[]b").unwrap();
        assert_eq!(path, vec![Segment::key("a[]b")]);
        assert_eq!(format(&path), "a[]b");
    }
}
