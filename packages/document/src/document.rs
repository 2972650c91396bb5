//! # Card Document
//!
//! Root of the editable tree: an ordered list of top-level nodes plus
//! layout-level scalars.
//!
//! Child collections hold `Arc<Node>`, so cloning a `Document` is shallow and
//! every subtree is shared. Editing goes through the resolver, which copies
//! only the nodes along the edited path (`Arc::make_mut`); a document that has
//! been handed out is never changed afterwards.

use crate::node::Node;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Editable card document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,

    pub direction: Direction,

    /// Vertical gap between top-level elements, in pixels
    pub spacing: u32,

    /// Free-form payload metadata, preserved verbatim
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,

    pub elements: Vec<Arc<Node>>,
}

/// Card header shown above the body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

impl Document {
    pub fn new() -> Self {
        Self {
            header: None,
            direction: Direction::Vertical,
            spacing: 8,
            metadata: Map::new(),
            elements: Vec::new(),
        }
    }

    /// Build a document from top-level nodes
    pub fn with_elements(elements: impl IntoIterator<Item = Node>) -> Self {
        Self {
            elements: elements.into_iter().map(Arc::new).collect(),
            ..Self::new()
        }
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.elements.iter().map(|node| node.subtree_len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Form, NodeKind};

    #[test]
    fn test_default_document_is_empty_vertical() {
        let doc = Document::default();
        assert!(doc.is_empty());
        assert_eq!(doc.direction, Direction::Vertical);
        assert_eq!(doc.spacing, 8);
    }

    #[test]
    fn test_clone_shares_subtrees() {
        let doc = Document::with_elements([Node::Form(Form {
            id: "form-1".to_string(),
            elements: vec![Arc::new(Node::new(NodeKind::Input, "input-1"))],
            ..Default::default()
        })]);
        let copy = doc.clone();

        assert!(Arc::ptr_eq(&doc.elements[0], &copy.elements[0]));
        assert_eq!(copy.node_count(), 2);
    }
}
