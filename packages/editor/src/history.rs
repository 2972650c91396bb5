//! # Undo/Redo History
//!
//! Linear list of document snapshots with a cursor.
//!
//! ## Design
//!
//! - `snapshots[index]` is always the current document
//! - Pushing drops every snapshot after the cursor, then appends
//! - Undo and redo only move the cursor
//! - Snapshots share unchanged subtrees with their neighbours, so keeping
//!   one per edit is cheap
//! - With `max_levels > 0`, the oldest snapshots are discarded once more than
//!   `max_levels` undo steps are stored
//!
//! ## Example
//!
//! ```rust
//! use cardkit_document::Document;
//! use cardkit_editor::History;
//!
//! let mut history = History::new(Document::new());
//! let mut edited = Document::new();
//! edited.spacing = 16;
//! history.push(edited, "spacing");
//!
//! assert_eq!(history.undo().map(|doc| doc.spacing), Some(8));
//! assert_eq!(history.redo().map(|doc| doc.spacing), Some(16));
//! assert!(history.redo().is_none());
//! ```

use cardkit_document::Document;
use tracing::trace;

/// Default number of undo levels kept
pub const DEFAULT_MAX_LEVELS: usize = 100;

#[derive(Debug, Clone)]
struct Snapshot {
    document: Document,
    /// What produced this snapshot; `None` for the initial one
    label: Option<String>,
}

/// Snapshot history for one document
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    index: usize,
    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl History {
    /// Start a history at `initial` with the default level limit
    pub fn new(initial: Document) -> Self {
        Self::with_max_levels(initial, DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(initial: Document, max_levels: usize) -> Self {
        Self {
            snapshots: vec![Snapshot {
                document: initial,
                label: None,
            }],
            index: 0,
            max_levels,
        }
    }

    /// Record `doc` as the new current state
    pub fn push(&mut self, doc: Document, label: impl Into<String>) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(Snapshot {
            document: doc,
            label: Some(label.into()),
        });
        self.index = self.snapshots.len() - 1;

        if self.max_levels > 0 && self.snapshots.len() > self.max_levels + 1 {
            let excess = self.snapshots.len() - (self.max_levels + 1);
            self.snapshots.drain(..excess);
            self.index -= excess;
        }

        trace!(index = self.index, len = self.snapshots.len(), "History push");
    }

    /// Step back; `None` at the oldest snapshot
    pub fn undo(&mut self) -> Option<&Document> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index].document)
    }

    /// Step forward; `None` at the newest snapshot
    pub fn redo(&mut self) -> Option<&Document> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index].document)
    }

    pub fn current(&self) -> &Document {
        &self.snapshots[self.index].document
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Number of undo steps available
    pub fn undo_levels(&self) -> usize {
        self.index
    }

    /// Number of redo steps available
    pub fn redo_levels(&self) -> usize {
        self.snapshots.len() - self.index - 1
    }

    /// Label of the edit the next undo reverts
    pub fn undo_label(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.snapshots[self.index].label.as_deref()
    }

    /// Label of the edit the next redo reapplies
    pub fn redo_label(&self) -> Option<&str> {
        self.snapshots
            .get(self.index + 1)
            .and_then(|snapshot| snapshot.label.as_deref())
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Drop all history and start again from `doc`
    pub fn reset(&mut self, doc: Document) {
        self.snapshots = vec![Snapshot {
            document: doc,
            label: None,
        }];
        self.index = 0;
    }
}
