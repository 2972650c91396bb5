//! # Cardkit Editor
//!
//! Editing engine for card documents: the operations a visual builder runs
//! when components are dropped, rearranged, configured, copied or deleted.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: typed tree, paths, import/export  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor                                      │
//! │  - nesting rules for containers and leaves  │
//! │  - pure mutations (insert/move/update/...)  │
//! │  - snapshot history, selection, clipboard   │
//! │  - drag and drop state machine              │
//! │  - DocumentStore tying them together        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ canvas / property panel (subscribers)       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Documents are values**: every edit produces a new document sharing
//!    unchanged subtrees with the old one
//! 2. **One history entry per edit**: rejected and no-op requests leave no trace
//! 3. **Invariants hold after every edit**: no nested containers, unique ids
//!
//! ## Usage
//!
//! ```rust
//! use cardkit_document::{NodeKind, Path};
//! use cardkit_editor::{DocumentStore, EditOutcome};
//!
//! let mut store = DocumentStore::default();
//! store.import_json(r#"[{ "type": "form", "id": "signup" }]"#)?;
//!
//! let fields = Path::top_level(0).elements();
//! assert_eq!(store.insert_new(NodeKind::Input, &fields, 0), EditOutcome::Applied);
//! assert!(!store.insert_new(NodeKind::Form, &fields, 0).is_applied());
//!
//! store.undo();
//! assert_eq!(store.document().node_count(), 1);
//! # Ok::<(), cardkit_editor::EditorError>(())
//! ```

mod clipboard;
mod config;
mod drag;
mod errors;
mod history;
mod mutations;
mod nesting;
mod selection;
mod store;

pub use clipboard::Clipboard;
pub use config::EditorConfig;
pub use drag::{
    drop_zone, CancelReason, DragDrop, DragOutcome, DragSource, DragState, DropCommand,
    DropPosition, DropZone, HoverTarget, Point, Rect, SiblingHit, DEFAULT_DRAG_THRESHOLD,
};
pub use errors::EditorError;
pub use history::{History, DEFAULT_MAX_LEVELS};
pub use mutations::{
    delete_at, duplicate, insert, insert_new, move_node, update_document, update_node, Change,
    DocumentPatch, MutationError, NoopReason, Patch,
};
pub use nesting::{can_place, can_place_in, check_place, slot_shape, SlotShape};
pub use selection::{Selection, SelectionTracker};
pub use store::{ChangeCause, Command, DocumentStore, EditOutcome, ListenerId, StoreEvent};
