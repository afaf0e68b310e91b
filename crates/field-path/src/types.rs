//! Type definitions for field paths.

/// A step in a field path.
///
/// `key` addresses a mapping entry. When `array_wildcard` is set, the entry
/// is expected to hold a list and resolution continues with its first
/// element (annotation templates address array fields positionally).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    /// The mapping key this segment descends through.
    pub key: String,
    /// Whether this segment carries the `[]` marker ("first element of this
    /// array").
    pub array_wildcard: bool,
}

impl Segment {
    /// A plain key segment.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            array_wildcard: false,
        }
    }

    /// A key segment with the array-wildcard marker.
    pub fn wildcard(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            array_wildcard: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        let s = Segment::key("name");
        assert_eq!(s.key, "name");
        assert!(!s.array_wildcard);

        let w = Segment::wildcard("sections");
        assert_eq!(w.key, "sections");
        assert!(w.array_wildcard);
    }
}
