//! Field paths for addressing values inside records
//!
//! Provides [`FieldPath`], the parsed form of a column's `dataIndex`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Path to a value inside a record
///
/// Hierarchical structure using string segments, one per nesting level.
///
/// # Examples
/// - `"price"` → `["price"]`
/// - `"customer.name"` → `["customer", "name"]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Create path from a single top-level field
    ///
    /// The segment is not validated; use [`FromStr`] for untrusted input.
    #[inline]
    #[must_use]
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Paths are never empty once parsed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Top-level field name
    #[inline]
    #[must_use]
    pub fn first(&self) -> &str {
        self.0.first().map_or("", String::as_str)
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0 == other.0[..self.0.len()]
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(PathError::Empty);
        }

        let segments: Vec<String> = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment(s.to_string()))
                } else if seg.contains(|c: char| !c.is_alphanumeric() && c != '_') {
                    Err(PathError::InvalidSegment(seg.to_string()))
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl TryFrom<String> for FieldPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

/// Errors related to field paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path has no segments at all
    #[error("field path is empty")]
    Empty,

    /// Empty segment in path
    #[error("field path '{0}' contains an empty segment")]
    EmptySegment(String),

    /// Invalid segment characters
    #[error("invalid segment: {0} (must be alphanumeric or underscore)")]
    InvalidSegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_path() {
        let path: FieldPath = "customer.name".parse().unwrap();
        assert_eq!(path.segments(), &["customer", "name"]);
        assert_eq!(path.first(), "customer");
        assert_eq!(path.to_string(), "customer.name");
    }

    #[test]
    fn rejects_empty_and_malformed_paths() {
        assert_eq!("".parse::<FieldPath>(), Err(PathError::Empty));
        assert!(matches!(
            "a..b".parse::<FieldPath>(),
            Err(PathError::EmptySegment(_))
        ));
        assert!(matches!(
            "due-date".parse::<FieldPath>(),
            Err(PathError::InvalidSegment(_))
        ));
    }

    #[test]
    fn prefix_and_child() {
        let parent = FieldPath::single("customer");
        let child = parent.child("email");
        assert!(parent.is_prefix_of(&child));
        assert!(!child.is_prefix_of(&parent));
        assert_eq!(child.len(), 2);
    }

    #[test]
    fn serde_uses_dotted_form() {
        let path: FieldPath = serde_json::from_str("\"a.b\"").unwrap();
        assert_eq!(path.segments(), &["a", "b"]);
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"a.b\"");
        assert!(serde_json::from_str::<FieldPath>("\"a..b\"").is_err());
    }
}
