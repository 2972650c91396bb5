//! # Nesting Rules
//!
//! Containers (`form`, `column_set`) may only be placed in the root
//! collection. Leaves may be placed in the root collection or in exactly one
//! container level: a form's `elements` or a column's `elements`.
//!
//! The rule is decided from the path alone, so hover feedback never has to
//! walk the tree. [`can_place_in`] adds the resolution check against a
//! concrete document.

use crate::mutations::MutationError;
use cardkit_document::{resolver, CollectionKey, Document, NodeKind, Path, PathError, Segment};

/// Shape of a collection path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotShape {
    /// `elements`
    Root,
    /// `elements.i.elements` or `elements.i.columns.j.elements`
    InContainer,
    /// Well-formed, but only reachable through a container nested in a container
    TooDeep,
    /// Not an `elements` collection path
    NotASlot,
}

/// Classify `path` as an insertion target
pub fn slot_shape(path: &Path) -> SlotShape {
    let segments = path.segments();
    if segments.first() != Some(&Segment::Key(CollectionKey::Elements)) {
        return SlotShape::NotASlot;
    }
    if segments.last() != Some(&Segment::Key(CollectionKey::Elements)) {
        return SlotShape::NotASlot;
    }

    let mut node_hops = 0;
    let mut previous = CollectionKey::Elements;
    let mut expect_index = true;
    for segment in &segments[1..] {
        match (*segment, expect_index) {
            (Segment::Index(_), true) => {
                if previous == CollectionKey::Elements {
                    node_hops += 1;
                }
            }
            (Segment::Key(key), false) => {
                // A column only owns `elements`
                if previous == CollectionKey::Columns && key != CollectionKey::Elements {
                    return SlotShape::NotASlot;
                }
                previous = key;
            }
            _ => return SlotShape::NotASlot,
        }
        expect_index = !expect_index;
    }

    match node_hops {
        0 => SlotShape::Root,
        1 => SlotShape::InContainer,
        _ => SlotShape::TooDeep,
    }
}

/// Whether a node of `kind` may be placed in the collection at `target`
pub fn can_place(kind: NodeKind, target: &Path) -> bool {
    match slot_shape(target) {
        SlotShape::Root => true,
        SlotShape::InContainer => !kind.is_container(),
        SlotShape::TooDeep | SlotShape::NotASlot => false,
    }
}

/// [`can_place`] plus: `target` resolves to an `elements` collection in `doc`
pub fn can_place_in(doc: &Document, kind: NodeKind, target: &Path) -> bool {
    can_place(kind, target) && resolver::elements_at(doc, target).is_ok()
}

/// [`can_place`] as a `Result`, for gating mutations
pub fn check_place(kind: NodeKind, target: &Path) -> Result<(), MutationError> {
    match slot_shape(target) {
        SlotShape::Root => Ok(()),
        SlotShape::InContainer if !kind.is_container() => Ok(()),
        SlotShape::InContainer | SlotShape::TooDeep => Err(MutationError::NestingViolation {
            kind,
            path: target.clone(),
        }),
        SlotShape::NotASlot => Err(PathError::NotACollection(target.clone()).into()),
    }
}
