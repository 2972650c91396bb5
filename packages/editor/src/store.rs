//! # Document Store
//!
//! Owns the current document together with its history, selection,
//! clipboard and drag state, and is the only place they change.
//!
//! Every command runs the same way:
//!
//! 1. the matching pure mutation computes a [`Change`]
//! 2. an applied change replaces the document and is pushed to history once
//! 3. the selection is re-resolved against the new document
//! 4. listeners are told what changed
//!
//! Rejected and no-op commands leave everything as it was and notify nobody.

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::drag::{DragDrop, DragOutcome, DragSource, DropCommand, DropZone, HoverTarget, Point};
use crate::errors::EditorError;
use crate::history::History;
use crate::mutations::{self, Change, DocumentPatch, MutationError, NoopReason, Patch};
use crate::selection::{Selection, SelectionTracker};
use cardkit_document::{
    check_invariants, collect_ids, export_string, fill_missing_ids, import_str, resolver, Document,
    IdGenerator, Node, NodeKind, Path, PathError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// What replaced the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCause {
    Edit,
    Undo,
    Redo,
    Import,
}

/// Notification sent to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    DocumentChanged { cause: ChangeCause, version: u64 },
    /// Id of the newly selected node, `None` when cleared
    SelectionChanged { selected: Option<String> },
    DragChanged,
}

/// Result of a store command
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Applied,
    Unchanged(NoopReason),
    Rejected(MutationError),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }

    /// `Ok(true)` if applied, `Ok(false)` for a no-op
    pub fn into_result(self) -> Result<bool, MutationError> {
        match self {
            EditOutcome::Applied => Ok(true),
            EditOutcome::Unchanged(_) => Ok(false),
            EditOutcome::Rejected(err) => Err(err),
        }
    }
}

impl From<Result<(), PathError>> for EditOutcome {
    fn from(result: Result<(), PathError>) -> Self {
        match result {
            Ok(()) => EditOutcome::Applied,
            Err(err) => EditOutcome::Rejected(err.into()),
        }
    }
}

/// Serializable store command, as replayed from scripts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Insert { container: Path, index: usize, node: Node },
    InsertNew { container: Path, index: usize, kind: NodeKind },
    Move { from: Path, container: Path, index: usize },
    Delete { path: Path },
    DeleteSelected,
    Update { path: Path, patch: Patch },
    UpdateSelected { patch: Patch },
    UpdateDocument { patch: DocumentPatch },
    Duplicate { path: Path },
    Select { path: Path },
    ClearSelection,
    Copy { path: Path },
    CopySelected,
    Paste,
    Undo,
    Redo,
}

/// Single-document editing state
pub struct DocumentStore {
    document: Document,
    history: History,
    selection: SelectionTracker,
    clipboard: Clipboard,
    drag: DragDrop,
    ids: IdGenerator,
    config: EditorConfig,
    /// Bumped on every document replacement
    version: u64,
    listeners: BTreeMap<ListenerId, Listener>,
    next_listener: ListenerId,
}

impl DocumentStore {
    /// Store with an empty document
    pub fn new(config: EditorConfig) -> Self {
        let document = Document::new();
        Self {
            history: History::with_max_levels(document.clone(), config.history_limit),
            document,
            selection: SelectionTracker::new(),
            clipboard: Clipboard::new(),
            drag: DragDrop::new(config.drag_threshold),
            ids: IdGenerator::new(&config.id_seed),
            config,
            version: 0,
            listeners: BTreeMap::new(),
            next_listener: 0,
        }
    }

    /// Store opened on an existing document, which must satisfy the invariants
    pub fn with_document(document: Document, config: EditorConfig) -> Result<Self, EditorError> {
        check_invariants(&document)?;
        let mut store = Self::new(config);
        store.history.reset(document.clone());
        store.document = document;
        Ok(store)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.current()
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn drag(&self) -> &DragDrop {
        &self.drag
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Listeners ─────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn emit(&mut self, event: StoreEvent) {
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
    }

    fn emit_selection(&mut self) {
        let selected = self.selection.node().map(|node| node.id().to_string());
        self.emit(StoreEvent::SelectionChanged { selected });
    }

    // ── Selection ─────────────────────────────────────────────────────

    pub fn select(&mut self, node: Arc<Node>, path: Path) {
        self.selection.select(node, path);
        self.emit_selection();
    }

    pub fn select_path(&mut self, path: &Path) -> Result<(), PathError> {
        self.selection.select_path(&self.document, path)?;
        self.emit_selection();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.emit_selection();
        }
    }

    // ── Edits ─────────────────────────────────────────────────────────

    /// Insert `node` at `index`. Blank ids are generated, as on import.
    pub fn insert(&mut self, container: &Path, index: usize, mut node: Node) -> EditOutcome {
        let mut taken = collect_ids(&self.document);
        let filled = fill_missing_ids(&mut node, &mut self.ids, &mut taken);
        if filled > 0 {
            debug!(filled, "Generated ids for inserted node");
        }
        let label = format!("insert {}", node.kind());
        let result = mutations::insert(&self.document, container, index, Arc::new(node));
        self.commit(result, label)
    }

    /// Insert a default node of `kind`, as dropped from the palette
    pub fn insert_new(&mut self, kind: NodeKind, container: &Path, index: usize) -> EditOutcome {
        let result = mutations::insert_new(&self.document, container, index, kind, &mut self.ids);
        self.commit(result, format!("insert {}", kind))
    }

    pub fn move_node(&mut self, from: &Path, container: &Path, index: usize) -> EditOutcome {
        let result = mutations::move_node(&self.document, from, container, index);
        let label = self.label_for("move", from);
        self.commit(result, label)
    }

    pub fn delete_at(&mut self, path: &Path) -> EditOutcome {
        let label = self.label_for("delete", path);
        let result = mutations::delete_at(&self.document, path);
        self.commit(result, label)
    }

    pub fn delete_selected(&mut self) -> EditOutcome {
        match self.selection.path().cloned() {
            Some(path) => self.delete_at(&path),
            None => EditOutcome::Unchanged(NoopReason::NothingSelected),
        }
    }

    pub fn update_node(&mut self, path: &Path, patch: &Patch) -> EditOutcome {
        let label = self.label_for("update", path);
        let result = mutations::update_node(&self.document, path, patch);
        self.commit(result, label)
    }

    pub fn update_selected(&mut self, patch: &Patch) -> EditOutcome {
        match self.selection.path().cloned() {
            Some(path) => self.update_node(&path, patch),
            None => EditOutcome::Unchanged(NoopReason::NothingSelected),
        }
    }

    pub fn update_document(&mut self, patch: &DocumentPatch) -> EditOutcome {
        let result = mutations::update_document(&self.document, patch);
        self.commit(result, "update document".to_string())
    }

    pub fn duplicate(&mut self, path: &Path) -> EditOutcome {
        let label = self.label_for("duplicate", path);
        let result = mutations::duplicate(&self.document, path, &mut self.ids);
        self.commit(result, label)
    }

    // ── Clipboard ─────────────────────────────────────────────────────

    pub fn copy(&mut self, path: &Path) -> Result<(), PathError> {
        let node = resolver::node_at(&self.document, path)?;
        self.clipboard.copy(Arc::clone(node));
        Ok(())
    }

    /// Copy the selected node; returns false with nothing selected
    pub fn copy_selected(&mut self) -> bool {
        match self.selection.node() {
            Some(node) => {
                self.clipboard.copy(Arc::clone(node));
                true
            }
            None => false,
        }
    }

    pub fn paste(&mut self) -> EditOutcome {
        let label = match self.clipboard.peek() {
            Some(node) => format!("paste {}", node.kind()),
            None => "paste".to_string(),
        };
        let result = self.clipboard.paste(&self.document, &mut self.ids);
        self.commit(result, label)
    }

    // ── History ───────────────────────────────────────────────────────

    pub fn undo(&mut self) -> EditOutcome {
        match self.history.undo() {
            Some(doc) => {
                self.document = doc.clone();
                self.after_document_change(ChangeCause::Undo);
                EditOutcome::Applied
            }
            None => EditOutcome::Unchanged(NoopReason::HistoryBoundary),
        }
    }

    pub fn redo(&mut self) -> EditOutcome {
        match self.history.redo() {
            Some(doc) => {
                self.document = doc.clone();
                self.after_document_change(ChangeCause::Redo);
                EditOutcome::Applied
            }
            None => EditOutcome::Unchanged(NoopReason::HistoryBoundary),
        }
    }

    // ── Import / Export ───────────────────────────────────────────────

    /// Replace the document with an imported payload and start a new history.
    ///
    /// Returns the paths of nodes that were given generated ids. On error the
    /// store is left untouched.
    #[instrument(skip(self, input), fields(bytes = input.len()))]
    pub fn import_json(&mut self, input: &str) -> Result<Vec<Path>, EditorError> {
        let imported = import_str(input, &mut self.ids)?;
        info!(
            nodes = imported.document.node_count(),
            generated = imported.generated_ids.len(),
            "Document imported"
        );

        self.history.reset(imported.document.clone());
        self.document = imported.document;
        self.drag.cancel();
        self.after_document_change(ChangeCause::Import);
        Ok(imported.generated_ids)
    }

    pub fn export_json(&self) -> Result<String, EditorError> {
        Ok(export_string(&self.document)?)
    }

    // ── Drag and drop ─────────────────────────────────────────────────

    pub fn drag_press(&mut self, source: DragSource, point: Point) {
        self.drag.press(source, point);
        self.emit(StoreEvent::DragChanged);
    }

    /// Press on the node at `path`
    pub fn drag_press_node(&mut self, path: &Path, point: Point) -> Result<(), PathError> {
        let source = DragSource::existing(&self.document, path)?;
        self.drag_press(source, point);
        Ok(())
    }

    pub fn drag_move(&mut self, point: Point) {
        if self.drag.pointer_move(point) {
            self.emit(StoreEvent::DragChanged);
        }
    }

    pub fn drag_hover(&mut self, target: &HoverTarget) -> Option<DropZone> {
        let before = self.drag.zone().cloned();
        let zone = self.drag.hover(&self.document, target).cloned();
        if zone.is_some() && zone != before {
            self.emit(StoreEvent::DragChanged);
        }
        zone
    }

    pub fn drag_leave(&mut self) {
        if self.drag.leave() {
            self.emit(StoreEvent::DragChanged);
        }
    }

    /// Release the pointer and run the resulting insert or move
    pub fn drag_release(&mut self) -> EditOutcome {
        let outcome = self.drag.release();
        self.emit(StoreEvent::DragChanged);
        match outcome {
            DragOutcome::Drop(DropCommand::Insert { kind, container, index }) => {
                self.insert_new(kind, &container, index)
            }
            DragOutcome::Drop(DropCommand::Move { from, container, index }) => {
                self.move_node(&from, &container, index)
            }
            DragOutcome::Cancelled(reason) => {
                debug!(reason = ?reason, "Drop cancelled");
                EditOutcome::Unchanged(NoopReason::DropCancelled)
            }
        }
    }

    pub fn drag_cancel(&mut self) {
        if self.drag.source().is_some() {
            self.drag.cancel();
            self.emit(StoreEvent::DragChanged);
        }
    }

    // ── Commands ──────────────────────────────────────────────────────

    pub fn execute(&mut self, command: Command) -> EditOutcome {
        match command {
            Command::Insert { container, index, node } => self.insert(&container, index, node),
            Command::InsertNew { container, index, kind } => {
                self.insert_new(kind, &container, index)
            }
            Command::Move { from, container, index } => self.move_node(&from, &container, index),
            Command::Delete { path } => self.delete_at(&path),
            Command::DeleteSelected => self.delete_selected(),
            Command::Update { path, patch } => self.update_node(&path, &patch),
            Command::UpdateSelected { patch } => self.update_selected(&patch),
            Command::UpdateDocument { patch } => self.update_document(&patch),
            Command::Duplicate { path } => self.duplicate(&path),
            Command::Select { path } => self.select_path(&path).into(),
            Command::ClearSelection => {
                self.clear_selection();
                EditOutcome::Applied
            }
            Command::Copy { path } => self.copy(&path).into(),
            Command::CopySelected => {
                if self.copy_selected() {
                    EditOutcome::Applied
                } else {
                    EditOutcome::Unchanged(NoopReason::NothingSelected)
                }
            }
            Command::Paste => self.paste(),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
        }
    }

    // ── Internals ─────────────────────────────────────────────────────

    fn label_for(&self, verb: &str, path: &Path) -> String {
        match resolver::node_at(&self.document, path) {
            Ok(node) => format!("{} {}", verb, node.kind()),
            Err(_) => verb.to_string(),
        }
    }

    fn commit(&mut self, result: Result<Change, MutationError>, label: String) -> EditOutcome {
        match result {
            Ok(Change::Applied(document)) => {
                debug!(label = %label, nodes = document.node_count(), "Edit applied");
                self.history.push(document.clone(), label);
                self.document = document;
                self.after_document_change(ChangeCause::Edit);
                EditOutcome::Applied
            }
            Ok(Change::Noop(reason)) => {
                debug!(label = %label, reason = ?reason, "Edit had no effect");
                EditOutcome::Unchanged(reason)
            }
            Err(err) => {
                warn!(label = %label, error = %err, "Edit rejected");
                EditOutcome::Rejected(err)
            }
        }
    }

    fn after_document_change(&mut self, cause: ChangeCause) {
        self.version += 1;
        let was_selected = self.selection.node().map(|node| node.id().to_string());
        let changed = if cause == ChangeCause::Import {
            self.selection.clear();
            was_selected.is_some()
        } else {
            self.selection.revalidate(&self.document)
        };

        let drag_changed = self.drag.revalidate(&self.document);

        self.emit(StoreEvent::DocumentChanged {
            cause,
            version: self.version,
        });
        if drag_changed {
            self.emit(StoreEvent::DragChanged);
        }
        let now_selected = self.selection.node().map(|node| node.id().to_string());
        if changed || was_selected != now_selected {
            self.emit_selection();
        }
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
