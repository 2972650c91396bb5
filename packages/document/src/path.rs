//! # Tree Paths
//!
//! A path is an ordered list of alternating collection keys and indices that
//! addresses one node, one column, or one collection from the document root:
//!
//! ```text
//! elements                          root collection
//! elements.0                        first top-level node
//! elements.0.elements               a form's children
//! elements.1.columns.0.elements.2   third node of the first column
//! ```
//!
//! `Path` itself does not enforce the alternation; malformed paths are
//! representable and rejected by the resolver with a `PathError`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named child collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKey {
    Elements,
    Columns,
}

impl CollectionKey {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKey::Elements => "elements",
            CollectionKey::Columns => "columns",
        }
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One hop of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Index(usize),
    Key(CollectionKey),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(index) => write!(f, "{}", index),
            Segment::Key(key) => f.write_str(key.as_str()),
        }
    }
}

/// Address of a node or collection slot; serialized as `["elements", 0]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Segment>);

impl Path {
    /// Empty path
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// The root collection: `elements`
    pub fn root() -> Self {
        Self(vec![Segment::Key(CollectionKey::Elements)])
    }

    /// Path of the top-level node at `index`
    pub fn top_level(index: usize) -> Self {
        Self::root().index(index)
    }

    pub fn from_segments(segments: impl Into<Vec<Segment>>) -> Self {
        Self(segments.into())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend with a collection key
    pub fn key(mut self, key: CollectionKey) -> Self {
        self.0.push(Segment::Key(key));
        self
    }

    /// Extend with an index
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Segment::Index(index));
        self
    }

    pub fn elements(self) -> Self {
        self.key(CollectionKey::Elements)
    }

    pub fn columns(self) -> Self {
        self.key(CollectionKey::Columns)
    }

    pub fn last(&self) -> Option<Segment> {
        self.0.last().copied()
    }

    /// Path without its last segment
    pub fn parent(&self) -> Option<Path> {
        self.0.split_last().map(|(_, rest)| Path(rest.to_vec()))
    }

    /// Split a slot path into (collection path, index)
    pub fn split_index(&self) -> Option<(Path, usize)> {
        match self.0.split_last() {
            Some((Segment::Index(index), rest)) => Some((Path(rest.to_vec()), *index)),
            _ => None,
        }
    }

    /// True when `prefix` addresses this path or one of its ancestors
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Number of collections traversed below the root collection.
    ///
    /// `elements` is 0, `elements.0.elements` is 1,
    /// `elements.0.columns.1.elements` is 2.
    pub fn nesting_depth(&self) -> usize {
        self.0
            .iter()
            .filter(|segment| matches!(segment, Segment::Key(_)))
            .count()
            .saturating_sub(1)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = String;

    /// Parse the dotted form, e.g. `elements.0.elements`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Path::new());
        }

        s.split('.')
            .map(|part| match part {
                "elements" => Ok(Segment::Key(CollectionKey::Elements)),
                "columns" => Ok(Segment::Key(CollectionKey::Columns)),
                other => other
                    .parse::<usize>()
                    .map(Segment::Index)
                    .map_err(|_| format!("invalid path segment: {}", other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Path)
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let path = Path::top_level(1).columns().index(0).elements().index(2);
        assert_eq!(path.to_string(), "elements.1.columns.0.elements.2");
        assert_eq!("elements.1.columns.0.elements.2".parse::<Path>().unwrap(), path);
    }

    #[test]
    fn test_parse_rejects_unknown_segment() {
        assert!("elements.x".parse::<Path>().is_err());
        assert!("children.0".parse::<Path>().is_err());
    }

    #[test]
    fn test_split_index() {
        let path = Path::top_level(3);
        assert_eq!(path.split_index(), Some((Path::root(), 3)));
        assert_eq!(Path::root().split_index(), None);
    }

    #[test]
    fn test_starts_with_is_prefix_containment() {
        let form = Path::top_level(0);
        assert!(form.clone().elements().starts_with(&form));
        assert!(form.starts_with(&form));
        assert!(!Path::top_level(1).elements().starts_with(&form));
        // Index 1 must not be confused with index 10
        assert!(!Path::top_level(10).starts_with(&Path::top_level(1)));
    }

    #[test]
    fn test_nesting_depth() {
        assert_eq!(Path::root().nesting_depth(), 0);
        assert_eq!(Path::top_level(0).elements().nesting_depth(), 1);
        assert_eq!(Path::top_level(0).columns().index(1).elements().nesting_depth(), 2);
    }

    #[test]
    fn test_serializes_as_mixed_array() {
        let path = Path::top_level(2).elements();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["elements",2,"elements"]"#);
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
