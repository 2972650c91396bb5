//! # Document Mutations
//!
//! Pure edit operations on a [`Document`]. Every operation takes the current
//! document by reference and either returns a new document, reports that the
//! request changes nothing, or rejects it. The input is never modified, so
//! the caller can keep it as a history snapshot.
//!
//! ## Mutation Semantics
//!
//! ### Insert
//! - Target must be an `elements` collection that accepts the node's kind
//! - Index is clamped to the collection length
//! - Ids in the inserted subtree must not already be in the document
//!
//! ### Move
//! - Moving a node into itself or its own subtree is a no-op
//! - Moving to the slot a node already occupies is a no-op
//! - Within one collection the target index counts positions before removal
//!
//! ### Update
//! - The patch is merged onto the node's fields
//! - `id`, `type`, `elements` and `columns` cannot be patched
//!
//! ### Delete
//! - Removes the node and all descendants

use crate::nesting::check_place;
use cardkit_document::{
    collect_ids, reassign_ids, resolver, subtree_ids, Direction, Document, Header, IdGenerator,
    Node, NodeKind, Path, PathError, Segment,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Field changes merged onto a node
pub type Patch = Map<String, Value>;

/// Node fields a patch may never touch
const PROTECTED_FIELDS: [&str; 4] = ["id", "type", "elements", "columns"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("Cannot place {kind} at {path}: containers may only live at the root")]
    NestingViolation { kind: NodeKind, path: Path },

    #[error("Node id '{0}' is already in the document")]
    DuplicateId(String),

    #[error("Cannot insert {0} without an id")]
    EmptyId(NodeKind),

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),
}

/// Why an accepted request left the document as it was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    /// Move target is the slot the node already occupies
    SamePosition,
    /// Move target is inside the moved node
    SelfOrDescendant,
    /// Update produced an identical node or document
    Unchanged,
    /// Undo or redo past the end of history
    HistoryBoundary,
    /// Paste with nothing copied
    EmptyClipboard,
    /// Selection command with nothing selected
    NothingSelected,
    /// Drag ended without an accepted drop zone
    DropCancelled,
}

/// Result of an accepted mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Applied(Document),
    Noop(NoopReason),
}

impl Change {
    pub fn is_applied(&self) -> bool {
        matches!(self, Change::Applied(_))
    }

    /// The new document, or `None` for a no-op
    pub fn into_document(self) -> Option<Document> {
        match self {
            Change::Applied(doc) => Some(doc),
            Change::Noop(_) => None,
        }
    }
}

/// Document-level settings to change; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentPatch {
    /// `Some(None)` removes the header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Option<Header>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Insert `node` into the collection at `container` at `index`
pub fn insert(
    doc: &Document,
    container: &Path,
    index: usize,
    node: Arc<Node>,
) -> Result<Change, MutationError> {
    check_place(node.kind(), container)?;
    if let Some(child) = node.children().find(|child| child.is_container()) {
        return Err(MutationError::NestingViolation {
            kind: child.kind(),
            path: container.clone(),
        });
    }

    // children are leaves once the check above has passed
    {
        let mut subtree =
            std::iter::once(node.as_ref()).chain(node.children().map(|child| child.as_ref()));
        if let Some(blank) = subtree.find(|n| n.id().trim().is_empty()) {
            return Err(MutationError::EmptyId(blank.kind()));
        }
    }

    let existing = collect_ids(doc);
    let mut incoming = HashSet::new();
    for id in subtree_ids(&node) {
        if existing.contains(&id) || !incoming.insert(id.clone()) {
            return Err(MutationError::DuplicateId(id));
        }
    }

    debug!(kind = %node.kind(), id = node.id(), container = %container, index, "Insert");
    Ok(Change::Applied(resolver::insert_into(doc, container, index, node)?))
}

/// Create a default node of `kind` with a fresh id and insert it
pub fn insert_new(
    doc: &Document,
    container: &Path,
    index: usize,
    kind: NodeKind,
    ids: &mut IdGenerator,
) -> Result<Change, MutationError> {
    let id = ids.fresh_id(&collect_ids(doc));
    insert(doc, container, index, Arc::new(Node::new(kind, id)))
}

/// Remove the node at `path` and its subtree
pub fn delete_at(doc: &Document, path: &Path) -> Result<Change, MutationError> {
    let node = resolver::node_at(doc, path)?;
    debug!(id = node.id(), path = %path, removed = node.subtree_len(), "Delete");
    let (next, _) = resolver::remove(doc, path)?;
    Ok(Change::Applied(next))
}

/// Move the node at `from` into the collection at `container` at `index`
pub fn move_node(
    doc: &Document,
    from: &Path,
    container: &Path,
    index: usize,
) -> Result<Change, MutationError> {
    if container.starts_with(from) {
        debug!(from = %from, to = %container, "Move into own subtree ignored");
        return Ok(Change::Noop(NoopReason::SelfOrDescendant));
    }

    let node = Arc::clone(resolver::node_at(doc, from)?);
    let (source, source_index) = from
        .split_index()
        .ok_or_else(|| PathError::NotANode(from.clone()))?;
    let len = resolver::elements_at(doc, container)?.len();
    let index = index.min(len);

    if &source == container {
        if index == source_index || index == source_index + 1 {
            return Ok(Change::Noop(NoopReason::SamePosition));
        }
        let (removed, _) = resolver::remove(doc, from)?;
        let adjusted = if source_index < index { index - 1 } else { index };
        debug!(
            id = node.id(),
            from = source_index,
            to = adjusted,
            container = %container,
            "Reorder"
        );
        return Ok(Change::Applied(resolver::insert_into(
            &removed, container, adjusted, node,
        )?));
    }

    check_place(node.kind(), container)?;
    let (removed, _) = resolver::remove(doc, from)?;
    let target = shift_after_removal(container, &source, source_index);
    debug!(id = node.id(), from = %from, to = %target, index, "Move");
    Ok(Change::Applied(resolver::insert_into(&removed, &target, index, node)?))
}

/// Rewrite `path` for a document where `source[removed_index]` is gone.
///
/// Only paths running through a later sibling of the removed node change.
fn shift_after_removal(path: &Path, source: &Path, removed_index: usize) -> Path {
    if !path.starts_with(source) || path.len() == source.len() {
        return path.clone();
    }
    let mut segments = path.segments().to_vec();
    if let Segment::Index(index) = &mut segments[source.len()] {
        if *index > removed_index {
            *index -= 1;
        }
    }
    Path::from_segments(segments)
}

/// Merge `patch` onto the node at `path`
pub fn update_node(doc: &Document, path: &Path, patch: &Patch) -> Result<Change, MutationError> {
    let node = resolver::node_at(doc, path)?;

    let mut value = serde_json::to_value(node.as_ref())
        .map_err(|e| MutationError::InvalidPatch(e.to_string()))?;
    let fields = value
        .as_object_mut()
        .ok_or_else(|| MutationError::InvalidPatch(format!("node at {} is not an object", path)))?;
    for (key, field) in patch {
        if PROTECTED_FIELDS.contains(&key.as_str()) {
            debug!(key = %key, path = %path, "Ignoring protected patch field");
            continue;
        }
        fields.insert(key.clone(), field.clone());
    }

    let mut updated: Node =
        serde_json::from_value(value).map_err(|e| MutationError::InvalidPatch(e.to_string()))?;
    keep_structure(node, &mut updated);

    if &updated == node.as_ref() {
        return Ok(Change::Noop(NoopReason::Unchanged));
    }
    debug!(id = node.id(), fields = patch.len(), "Update");
    Ok(Change::Applied(resolver::set(doc, path, Arc::new(updated))?))
}

/// Carry children and canvas-only state from `original` into `updated`
fn keep_structure(original: &Node, updated: &mut Node) {
    match (original, updated) {
        (Node::Form(original), Node::Form(updated)) => {
            updated.elements = original.elements.clone();
            updated.collapsed = original.collapsed;
        }
        (Node::ColumnSet(original), Node::ColumnSet(updated)) => {
            updated.columns = original.columns.clone();
            updated.collapsed = original.collapsed;
        }
        _ => {}
    }
}

/// Apply document-level settings
pub fn update_document(doc: &Document, patch: &DocumentPatch) -> Result<Change, MutationError> {
    let mut next = doc.clone();
    if let Some(header) = &patch.header {
        next.header = header.clone();
    }
    if let Some(direction) = patch.direction {
        next.direction = direction;
    }
    if let Some(spacing) = patch.spacing {
        next.spacing = spacing;
    }
    if let Some(metadata) = &patch.metadata {
        next.metadata = metadata.clone();
    }

    if &next == doc {
        return Ok(Change::Noop(NoopReason::Unchanged));
    }
    Ok(Change::Applied(next))
}

/// Insert a copy of the node at `path` right after it, with fresh ids
pub fn duplicate(
    doc: &Document,
    path: &Path,
    ids: &mut IdGenerator,
) -> Result<Change, MutationError> {
    let node = resolver::node_at(doc, path)?;
    let (container, index) = path
        .split_index()
        .ok_or_else(|| PathError::NotANode(path.clone()))?;

    let mut copy = node.as_ref().clone();
    let mut taken = collect_ids(doc);
    reassign_ids(&mut copy, ids, &mut taken);

    debug!(source = node.id(), copy = copy.id(), "Duplicate");
    insert(doc, &container, index + 1, Arc::new(copy))
}
