use crate::errors::{ErrorKind, StormError, StormResult};
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};

type SegmentVec = SmallVec<[String; 8]>;

/// A single step handed to `get`/`set`.
///
/// Text is split on the store's field separator, so `"user.name"` walks
/// two levels. An index walks exactly one level and is treated as an
/// array position (or as the key `"0"`, `"1"`, ... against an object).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    Name(String),
    Index(usize),
}

impl From<&str> for FieldRef {
    fn from(value: &str) -> Self {
        FieldRef::Name(value.to_string())
    }
}

impl From<String> for FieldRef {
    fn from(value: String) -> Self {
        FieldRef::Name(value)
    }
}

impl From<&String> for FieldRef {
    fn from(value: &String) -> Self {
        FieldRef::Name(value.clone())
    }
}

impl From<usize> for FieldRef {
    fn from(value: usize) -> Self {
        FieldRef::Index(value)
    }
}

/// An absolute path from the document root, as a list of segments.
///
/// The empty path is the root itself. The path remembers the separator it
/// was split on and renders with it, so a path printed in an error message
/// can be passed back to `get`/`set` unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SegmentVec,
    separator: String,
}

impl FieldPath {
    pub fn root(separator: &str) -> Self {
        FieldPath {
            segments: SegmentVec::new(),
            separator: separator.to_string(),
        }
    }

    /// Returns a new path with `field` appended.
    pub fn join(&self, field: FieldRef) -> Self {
        let mut segments = self.segments.clone();
        match field {
            FieldRef::Index(index) => segments.push(index.to_string()),
            FieldRef::Name(name) if name.is_empty() => {}
            FieldRef::Name(name) => {
                segments.extend(name.split(self.separator.as_str()).map(str::to_string));
            }
        }
        FieldPath {
            segments,
            separator: self.separator.clone(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Rejects paths that contain an empty segment, such as `"a..b"`.
    pub fn validate(&self) -> StormResult<()> {
        if self.segments.iter().any(|segment| segment.is_empty()) {
            log::error!("Path {} contains an empty field name", self);
            return Err(StormError::new(
                &format!("Path {} contains an empty field name", self),
                ErrorKind::InvalidFieldName,
            ));
        }
        Ok(())
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.segments.join(self.separator.as_str()))
        }
    }
}
