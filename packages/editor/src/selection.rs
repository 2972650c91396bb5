//! Tracks the selected node across edits.
//!
//! The selection remembers the node and where it was. After every document
//! change it is re-resolved: a node still at its path keeps the selection
//! (refreshed to the new node value when its fields changed), a node that
//! was removed or moved elsewhere clears it.

use cardkit_document::{resolver, Document, Node, Path, PathError};
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub node: Arc<Node>,
    pub path: Path,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    current: Option<Selection>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, node: Arc<Node>, path: Path) {
        trace!(id = node.id(), path = %path, "Select");
        self.current = Some(Selection { node, path });
    }

    /// Select whatever node `path` addresses in `doc`
    pub fn select_path(&mut self, doc: &Document, path: &Path) -> Result<(), PathError> {
        let node = resolver::node_at(doc, path)?;
        self.select(Arc::clone(node), path.clone());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    pub fn node(&self) -> Option<&Arc<Node>> {
        self.current.as_ref().map(|s| &s.node)
    }

    pub fn path(&self) -> Option<&Path> {
        self.current.as_ref().map(|s| &s.path)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Re-resolve against `doc`; returns whether the selection changed
    pub fn revalidate(&mut self, doc: &Document) -> bool {
        let Some(selection) = &mut self.current else {
            return false;
        };

        match resolver::node_at(doc, &selection.path) {
            Ok(node) if Arc::ptr_eq(node, &selection.node) => false,
            Ok(node) if node.id() == selection.node.id() => {
                selection.node = Arc::clone(node);
                true
            }
            _ => {
                trace!(id = selection.node.id(), "Selected node gone, clearing selection");
                self.current = None;
                true
            }
        }
    }
}
