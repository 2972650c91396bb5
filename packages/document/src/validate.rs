//! Structural invariants every accepted document satisfies:
//!
//! - containers (`form`, `column_set`) only appear in the root collection
//! - node ids are non-empty and pairwise distinct

use crate::document::Document;
use crate::error::InvariantError;
use crate::node::Node;
use crate::path::Path;
use crate::visitor::{walk_node, Visitor};
use std::collections::HashSet;
use std::sync::Arc;

struct InvariantChecker {
    seen: HashSet<String>,
    error: Option<InvariantError>,
}

impl Visitor for InvariantChecker {
    fn visit_node(&mut self, node: &Arc<Node>, path: &Path) {
        if self.error.is_some() {
            return;
        }

        let id = node.id();
        if id.is_empty() {
            self.error = Some(InvariantError::EmptyId(path.clone()));
            return;
        }
        if !self.seen.insert(id.to_string()) {
            self.error = Some(InvariantError::DuplicateId {
                id: id.to_string(),
                path: path.clone(),
            });
            return;
        }
        if node.is_container() && path.nesting_depth() > 0 {
            self.error = Some(InvariantError::NestedContainer {
                id: id.to_string(),
                kind: node.kind(),
                path: path.clone(),
            });
            return;
        }

        walk_node(self, node, path);
    }
}

/// Check nesting and id invariants, reporting the first violation
pub fn check_invariants(doc: &Document) -> Result<(), InvariantError> {
    let mut checker = InvariantChecker {
        seen: HashSet::new(),
        error: None,
    };
    checker.visit_document(doc);
    match checker.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ColumnSet, Form, NodeKind};

    #[test]
    fn test_valid_document_passes() {
        let doc = Document::with_elements([
            Node::Form(Form {
                id: "f".to_string(),
                elements: vec![Arc::new(Node::new(NodeKind::Input, "i"))],
                ..Default::default()
            }),
            Node::new(NodeKind::Divider, "d"),
        ]);
        assert_eq!(check_invariants(&doc), Ok(()));
    }

    #[test]
    fn test_nested_container_rejected() {
        let mut set = ColumnSet {
            id: "cs".to_string(),
            ..Default::default()
        };
        set.columns[0].elements.push(Arc::new(Node::new(NodeKind::Form, "inner")));
        let doc = Document::with_elements([Node::ColumnSet(set)]);

        assert!(matches!(
            check_invariants(&doc),
            Err(InvariantError::NestedContainer { ref id, kind: NodeKind::Form, .. })
                if id == "inner"
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let doc = Document::with_elements([
            Node::new(NodeKind::Text, "same"),
            Node::new(NodeKind::Button, "same"),
        ]);
        assert!(matches!(check_invariants(&doc), Err(InvariantError::DuplicateId { .. })));
    }

    #[test]
    fn test_empty_id_rejected() {
        let doc = Document::with_elements([Node::new(NodeKind::Text, "")]);
        assert!(matches!(check_invariants(&doc), Err(InvariantError::EmptyId(_))));
    }
}
