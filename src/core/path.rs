//! Field paths identifying validated locations.

use crate::core::types::MapKey;
use serde::{Serialize, Serializer};
use std::fmt;

/// One step from a value to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named struct field.
    Field(String),
    /// An array element.
    Index(usize),
    /// The value stored under a map key.
    Entry(MapKey),
    /// A map key itself (for `keys ... endkeys` rules).
    Key(MapKey),
}

/// Location of a value inside the value being validated.
///
/// Rendered as `Addresses[0].City` or `Schools[SMP].Name`. The root
/// renders as an empty string. Paths are for reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// A new path with a field segment appended.
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.child(PathSegment::Field(name.into()))
    }

    /// All segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the path ends at a map key rather than a value.
    pub fn is_key(&self) -> bool {
        matches!(self.segments.last(), Some(PathSegment::Key(_)))
    }

    /// The innermost field name with any element or key suffixes,
    /// e.g. `Hobbies[2]` for `Hobbies[2]` or `Name` for `Schools[SMP].Name`.
    pub fn leaf(&self) -> String {
        let start = self
            .segments
            .iter()
            .rposition(|s| matches!(s, PathSegment::Field(_)))
            .unwrap_or(0);
        render(&self.segments[start..])
    }
}

fn render(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSegment::Index(i) => out.push_str(&format!("[{}]", i)),
            PathSegment::Entry(key) | PathSegment::Key(key) => {
                out.push_str(&format!("[{}]", key))
            }
        }
    }
    out
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.segments))
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested_path() {
        let path = FieldPath::root()
            .field("Schools")
            .child(PathSegment::Entry(MapKey::from("SMP")))
            .field("Name");
        assert_eq!(path.to_string(), "Schools[SMP].Name");
        assert_eq!(path.leaf(), "Name");
    }

    #[test]
    fn test_leaf_keeps_index_suffix() {
        let path = FieldPath::root().field("Hobbies").child(PathSegment::Index(2));
        assert_eq!(path.to_string(), "Hobbies[2]");
        assert_eq!(path.leaf(), "Hobbies[2]");
        assert!(!path.is_key());
    }

    #[test]
    fn test_root_renders_empty() {
        let root = FieldPath::root();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "");
        assert_eq!(root.leaf(), "");
    }

    #[test]
    fn test_key_path() {
        let path = FieldPath::root().field("Wallet").child(PathSegment::Key(MapKey::from("")));
        assert!(path.is_key());
        assert_eq!(path.to_string(), "Wallet[]");
    }
}
