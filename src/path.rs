//! Dotted-path keys for field-level errors.
//!
//! This module provides [`FieldPath`], the key type used by
//! [`ErrorNode`](crate::ErrorNode) field maps. A path is kept as an explicit
//! list of segments internally and only joined into a dotted string at
//! display boundaries, so field names never have to be re-split.

use std::fmt::{self, Display};

use thiserror::Error;

/// Error returned when a dotted path string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The input string was empty.
    #[error("field path cannot be empty")]
    Empty,
    /// The input contained an empty segment (a leading, trailing, or doubled dot).
    #[error("field path cannot contain empty segments: {0:?}")]
    EmptySegment(String),
}

/// A path to a field-level error in a nested error tree.
///
/// `FieldPath` represents keys like `addresses.0.zip` as an ordered list of
/// segments. Array indices are rendered as decimal segments, so field and
/// index access share one representation.
///
/// # Example
///
/// ```rust
/// use trellis::FieldPath;
///
/// let path = FieldPath::field("addresses").push("0").push("zip");
/// assert_eq!(path.to_string(), "addresses.0.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

// A FieldPath is never empty, so `len` has no `is_empty` counterpart.
#[allow(clippy::len_without_is_empty)]
impl FieldPath {
    /// Creates a single-segment path from a field name.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Creates a single-segment path from an array index.
    pub fn index(index: usize) -> Self {
        Self {
            segments: vec![index.to_string()],
        }
    }

    /// Parses a dotted path string into segments.
    ///
    /// Rejects empty input and empty segments (`"a..b"`, `".a"`, `"a."`).
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if path.split('.').any(str::is_empty) {
            return Err(PathError::EmptySegment(path.to_string()));
        }
        Ok(Self {
            segments: path.split('.').map(String::from).collect(),
        })
    }

    /// Returns a new path with one segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Returns a new path with all of `other`'s segments appended.
    pub fn join(&self, other: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Returns the first segment.
    pub fn first(&self) -> &str {
        &self.segments[0]
    }

    /// Returns the last segment.
    pub fn last(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Returns true if `name` is acceptable as a single merge-step field name.
///
/// A plain field name must be non-empty, must not contain a period, and must
/// not begin with an underscore — except the two reserved identity fields
/// `_id` and `__v`.
pub(crate) fn is_valid_field_name(name: &str) -> bool {
    if name.is_empty() || name.contains('.') {
        return false;
    }
    !name.starts_with('_') || name == "_id" || name == "__v"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field() {
        let path = FieldPath::field("user");
        assert_eq!(path.to_string(), "user");
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_index_renders_as_decimal_segment() {
        let path = FieldPath::index(3);
        assert_eq!(path.to_string(), "3");
    }

    #[test]
    fn test_push_and_join() {
        let base = FieldPath::field("addresses");
        let path = base.push("0").push("zip");
        assert_eq!(path.to_string(), "addresses.0.zip");
        // base is unchanged
        assert_eq!(base.to_string(), "addresses");

        let joined = FieldPath::field("user").join(&path);
        assert_eq!(joined.to_string(), "user.addresses.0.zip");
    }

    #[test]
    fn test_parse_dotted() {
        let path = FieldPath::parse("a.b.c").unwrap();
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(FieldPath::parse(""), Err(PathError::Empty));
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse(".a").is_err());
        assert!(FieldPath::parse("a.").is_err());
    }

    #[test]
    fn test_first_and_last() {
        let path = FieldPath::parse("a.b.c").unwrap();
        assert_eq!(path.first(), "a");
        assert_eq!(path.last(), "c");
    }

    #[test]
    fn test_equality_and_hash_by_segments() {
        let a = FieldPath::field("a").push("b");
        let b = FieldPath::parse("a.b").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_field_name_validity() {
        assert!(is_valid_field_name("name"));
        assert!(is_valid_field_name("_id"));
        assert!(is_valid_field_name("__v"));
        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("_secret"));
        assert!(!is_valid_field_name("a.b"));
    }
}
