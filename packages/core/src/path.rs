//! Absolute slash-delimited paths into a tree.

use std::fmt;

/// The path separator.
pub const SEPARATOR: char = '/';

/// Errors related to path parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A separator was followed directly by another separator.
    #[error("empty segment at position {position} in path '{path}'")]
    EmptySegment { path: String, position: usize },

    /// A segment produced from a mapping key cannot be addressed by a path.
    #[error("invalid path segment '{segment}': {message}")]
    InvalidSegment { segment: String, message: String },
}

/// A normalized absolute path.
///
/// The root is the empty sequence of segments and displays as `/`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    pub segments: Vec<String>,
}

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Path::default()
    }

    /// Parse a path string.
    ///
    /// # Path Syntax
    ///
    /// - Exactly one leading and one trailing separator are stripped
    /// - What remains is split on `/`; an empty remainder is the root
    /// - Empty segments in the middle (`a//b`) are rejected
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pathtree_core::Path;
    ///
    /// let path = Path::parse("/users/123/name").unwrap();
    /// assert_eq!(path.len(), 3);
    ///
    /// // Leading and trailing separators are insignificant
    /// assert_eq!(Path::parse("users/123/").unwrap(), Path::parse("/users/123").unwrap());
    /// assert!(Path::parse("/").unwrap().is_root());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let trimmed = s.strip_prefix(SEPARATOR).unwrap_or(s);
        let trimmed = trimmed.strip_suffix(SEPARATOR).unwrap_or(trimmed);

        if trimmed.is_empty() {
            return Ok(Path::root());
        }

        let mut segments = Vec::new();
        for (position, segment) in trimmed.split(SEPARATOR).enumerate() {
            if segment.is_empty() {
                return Err(PathError::EmptySegment {
                    path: s.to_string(),
                    position,
                });
            }
            segments.push(segment.to_string());
        }

        Ok(Path { segments })
    }

    /// Validate a string for use as a single segment.
    pub fn validate_segment(segment: &str) -> Result<(), PathError> {
        if segment.is_empty() {
            return Err(PathError::InvalidSegment {
                segment: segment.to_string(),
                message: "segment is empty".to_string(),
            });
        }
        if segment.contains(SEPARATOR) {
            return Err(PathError::InvalidSegment {
                segment: segment.to_string(),
                message: format!("segment contains the separator '{}'", SEPARATOR),
            });
        }
        Ok(())
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Same as [`Path::is_root`].
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Iterate over segments.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.segments.iter()
    }

    /// The last segment, or `None` for the root.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Extend this path by one validated segment.
    pub fn child(&self, segment: impl Into<String>) -> Result<Path, PathError> {
        let segment = segment.into();
        Self::validate_segment(&segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Path { segments })
    }

    /// The path of the parent node, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.segments.split_last()?;
        Some(Path {
            segments: init.to_vec(),
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SEPARATOR, self.segments.join("/"))
    }
}

impl std::str::FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

/// Macro for creating paths from literals.
///
/// # Example
///
/// ```rust
/// use pathtree_core::path;
///
/// let p = path!("/users/123/name");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::Path::parse($s).expect("invalid path literal")
    };
}
