//! Single-slot clipboard.
//!
//! Copy keeps a reference to the node; documents are never mutated in place,
//! so later edits cannot reach the copied value. Paste appends a copy to the
//! root collection with every id in the subtree regenerated.

use crate::mutations::{insert, Change, MutationError, NoopReason};
use cardkit_document::{collect_ids, reassign_ids, Document, IdGenerator, Node, Path};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entry: Option<Arc<Node>>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy(&mut self, node: Arc<Node>) {
        debug!(id = node.id(), kind = %node.kind(), "Copy");
        self.entry = Some(node);
    }

    pub fn has_content(&self) -> bool {
        self.entry.is_some()
    }

    pub fn peek(&self) -> Option<&Arc<Node>> {
        self.entry.as_ref()
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// Append a fresh-id copy of the clipboard node to the root collection
    pub fn paste(&self, doc: &Document, ids: &mut IdGenerator) -> Result<Change, MutationError> {
        let Some(entry) = &self.entry else {
            return Ok(Change::Noop(NoopReason::EmptyClipboard));
        };

        let mut copy = entry.as_ref().clone();
        let mut taken = collect_ids(doc);
        reassign_ids(&mut copy, ids, &mut taken);

        debug!(source = entry.id(), copy = copy.id(), "Paste");
        insert(doc, &Path::root(), doc.elements.len(), Arc::new(copy))
    }
}
