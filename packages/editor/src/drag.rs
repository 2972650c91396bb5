//! # Drag and Drop
//!
//! State machine turning pointer interaction into insert or move commands.
//!
//! ```text
//!  press            move ≥ threshold       hover
//! Idle ──────▶ Pressed ──────────────▶ Dragging ◀────────▶ Hovering
//!                 │                        │      leave        │
//!                 └─ release / cancel ─────┴──── release ──────┘
//!                              ▼
//!                    DragOutcome::{Drop, Cancelled} → Idle
//! ```
//!
//! A press only becomes a drag once the pointer has travelled
//! `threshold` pixels, so a plain click never produces a command. Hover
//! feedback is computed from the pointer and the hovered sibling's bounds:
//! the upper half of a sibling inserts before it, the lower half after it,
//! and the empty area of a collection appends.

use crate::nesting::can_place_in;
use cardkit_document::{resolver, visitor::find_path, Document, NodeKind, Path, PathError};
use tracing::{debug, trace};

/// Pointer movement before a press becomes a drag, in pixels
pub const DEFAULT_DRAG_THRESHOLD: f32 = 3.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// What is being dragged
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    /// A new node of `kind` from the component palette
    Palette { kind: NodeKind },
    /// A node already on the canvas
    Existing { path: Path, id: String, kind: NodeKind },
}

impl DragSource {
    /// Source for the node currently at `path`
    pub fn existing(doc: &Document, path: &Path) -> Result<Self, PathError> {
        let node = resolver::node_at(doc, path)?;
        Ok(DragSource::Existing {
            path: path.clone(),
            id: node.id().to_string(),
            kind: node.kind(),
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            DragSource::Palette { kind } | DragSource::Existing { kind, .. } => *kind,
        }
    }
}

/// Sibling under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiblingHit {
    pub index: usize,
    pub bounds: Rect,
}

/// Hover report from the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct HoverTarget {
    /// `elements` collection under the pointer
    pub container: Path,
    /// `None` when hovering empty space in the collection
    pub sibling: Option<SiblingHit>,
    pub pointer: Point,
}

/// Where a drop would land
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPosition {
    Before(usize),
    After(usize),
    Append,
}

impl DropPosition {
    /// Decide from the pointer's height against the hovered sibling
    pub fn from_hover(sibling: Option<&SiblingHit>, pointer: Point) -> Self {
        match sibling {
            Some(hit) if pointer.y > hit.bounds.mid_y() => DropPosition::After(hit.index),
            Some(hit) => DropPosition::Before(hit.index),
            None => DropPosition::Append,
        }
    }

    /// Insertion index in a collection of `len` items
    pub fn index(&self, len: usize) -> usize {
        match self {
            DropPosition::Before(i) => (*i).min(len),
            DropPosition::After(i) => (i + 1).min(len),
            DropPosition::Append => len,
        }
    }
}

/// Hover feedback: target slot and whether dropping there is allowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropZone {
    pub container: Path,
    pub index: usize,
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Pressed { source: DragSource, origin: Point },
    Dragging { source: DragSource },
    Hovering { source: DragSource, zone: DropZone },
}

/// Command a successful drop asks the store to run
#[derive(Debug, Clone, PartialEq)]
pub enum DropCommand {
    Insert { kind: NodeKind, container: Path, index: usize },
    Move { from: Path, container: Path, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Released before the threshold, or nothing was pressed
    NotDragging,
    /// Released away from any collection
    NoDropZone,
    /// Released over a zone that does not accept the source
    Rejected,
    /// Cancelled by the user (escape)
    UserCancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    Drop(DropCommand),
    Cancelled(CancelReason),
}

/// Drag-and-drop state machine
#[derive(Debug, Clone)]
pub struct DragDrop {
    state: DragState,
    threshold: f32,
}

impl Default for DragDrop {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl DragDrop {
    pub fn new(threshold: f32) -> Self {
        Self {
            state: DragState::Idle,
            threshold: threshold.max(0.0),
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether a drag is underway (past the threshold)
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. } | DragState::Hovering { .. })
    }

    pub fn source(&self) -> Option<&DragSource> {
        match &self.state {
            DragState::Idle => None,
            DragState::Pressed { source, .. }
            | DragState::Dragging { source }
            | DragState::Hovering { source, .. } => Some(source),
        }
    }

    /// Current hover feedback
    pub fn zone(&self) -> Option<&DropZone> {
        match &self.state {
            DragState::Hovering { zone, .. } => Some(zone),
            _ => None,
        }
    }

    /// Pointer down on `source`. Replaces any drag in progress.
    pub fn press(&mut self, source: DragSource, origin: Point) {
        if !matches!(self.state, DragState::Idle) {
            debug!("Press during an active drag, restarting");
        }
        trace!(kind = %source.kind(), "Drag pressed");
        self.state = if self.threshold <= 0.0 {
            DragState::Dragging { source }
        } else {
            DragState::Pressed { source, origin }
        };
    }

    /// Pointer moved; returns whether the state changed
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let started = matches!(
            &self.state,
            DragState::Pressed { origin, .. } if origin.distance(point) >= self.threshold
        );
        if !started {
            return false;
        }
        if let DragState::Pressed { source, .. } =
            std::mem::replace(&mut self.state, DragState::Idle)
        {
            debug!(kind = %source.kind(), "Drag started");
            self.state = DragState::Dragging { source };
        }
        true
    }

    /// Pointer over a collection. Ignored unless dragging.
    pub fn hover(&mut self, doc: &Document, target: &HoverTarget) -> Option<&DropZone> {
        let source = match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { source } | DragState::Hovering { source, .. } => source,
            other => {
                self.state = other;
                return None;
            }
        };

        let zone = drop_zone(doc, &source, target);
        trace!(container = %zone.container, index = zone.index, accepted = zone.accepted, "Hover");
        self.state = DragState::Hovering { source, zone };
        self.zone()
    }

    /// Pointer left every collection
    pub fn leave(&mut self) -> bool {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Hovering { source, .. } => {
                self.state = DragState::Dragging { source };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Pointer released (the drop). Always returns to idle.
    pub fn release(&mut self) -> DragOutcome {
        let outcome = match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Hovering { source, zone } if zone.accepted => {
                DragOutcome::Drop(match source {
                    DragSource::Palette { kind } => DropCommand::Insert {
                        kind,
                        container: zone.container,
                        index: zone.index,
                    },
                    DragSource::Existing { path, .. } => DropCommand::Move {
                        from: path,
                        container: zone.container,
                        index: zone.index,
                    },
                })
            }
            DragState::Hovering { .. } => DragOutcome::Cancelled(CancelReason::Rejected),
            DragState::Dragging { .. } => DragOutcome::Cancelled(CancelReason::NoDropZone),
            DragState::Pressed { .. } | DragState::Idle => {
                DragOutcome::Cancelled(CancelReason::NotDragging)
            }
        };
        debug!(outcome = ?outcome, "Drag released");
        outcome
    }

    /// Abort the drag (escape key, pointer lost)
    pub fn cancel(&mut self) -> DragOutcome {
        let was_active = !matches!(self.state, DragState::Idle);
        self.state = DragState::Idle;
        if was_active {
            DragOutcome::Cancelled(CancelReason::UserCancelled)
        } else {
            DragOutcome::Cancelled(CancelReason::NotDragging)
        }
    }

    /// Bring the drag in line with an edited document.
    ///
    /// A dragged node is re-located by id and the drag is abandoned when it
    /// no longer exists. Hover feedback was computed against the old
    /// document, so a hovering drag falls back to dragging until the next
    /// hover. Returns whether the state changed.
    pub fn revalidate(&mut self, doc: &Document) -> bool {
        let relocated = match self.source() {
            Some(DragSource::Existing { path, id, .. }) => match find_path(doc, id) {
                Some(current) if current == *path => None,
                Some(current) => Some(Some(current)),
                None => Some(None),
            },
            _ => None,
        };

        let mut changed = false;
        match relocated {
            Some(None) => {
                debug!("Dragged node removed, cancelling drag");
                self.state = DragState::Idle;
                return true;
            }
            Some(Some(current)) => {
                trace!(path = %current, "Dragged node relocated");
                if let Some(DragSource::Existing { path, .. }) = self.source_mut() {
                    *path = current;
                }
                changed = true;
            }
            None => {}
        }

        if self.leave() {
            changed = true;
        }
        changed
    }

    fn source_mut(&mut self) -> Option<&mut DragSource> {
        match &mut self.state {
            DragState::Idle => None,
            DragState::Pressed { source, .. }
            | DragState::Dragging { source }
            | DragState::Hovering { source, .. } => Some(source),
        }
    }
}

/// Compute hover feedback for `source` over `target`
pub fn drop_zone(doc: &Document, source: &DragSource, target: &HoverTarget) -> DropZone {
    let position = DropPosition::from_hover(target.sibling.as_ref(), target.pointer);
    let len = resolver::elements_at(doc, &target.container)
        .map(|elements| elements.len())
        .ok();

    let into_self = match source {
        DragSource::Existing { path, .. } => target.container.starts_with(path),
        DragSource::Palette { .. } => false,
    };

    DropZone {
        container: target.container.clone(),
        index: position.index(len.unwrap_or(0)),
        accepted: len.is_some()
            && !into_self
            && can_place_in(doc, source.kind(), &target.container),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardkit_document::{Form, Node};
    use std::sync::Arc;

    fn doc() -> Document {
        Document::with_elements([
            Node::Form(Form {
                id: "form".to_string(),
                elements: vec![Arc::new(Node::new(NodeKind::Input, "i"))],
                ..Default::default()
            }),
            Node::new(NodeKind::Text, "t"),
            Node::new(NodeKind::Divider, "d"),
        ])
    }

    fn hover_over(container: Path, index: usize, y: f32) -> HoverTarget {
        HoverTarget {
            container,
            sibling: Some(SiblingHit {
                index,
                bounds: Rect::new(0.0, 100.0, 300.0, 40.0),
            }),
            pointer: Point::new(10.0, y),
        }
    }

    fn dragging(source: DragSource) -> DragDrop {
        let mut drag = DragDrop::new(3.0);
        drag.press(source, Point::new(0.0, 0.0));
        assert!(drag.pointer_move(Point::new(0.0, 5.0)));
        drag
    }

    #[test]
    fn test_drop_position_from_midpoint() {
        let hit = SiblingHit {
            index: 2,
            bounds: Rect::new(0.0, 100.0, 50.0, 40.0),
        };
        let at = |y| DropPosition::from_hover(Some(&hit), Point::new(0.0, y));
        assert_eq!(at(110.0), DropPosition::Before(2));
        assert_eq!(at(120.0), DropPosition::Before(2));
        assert_eq!(at(130.0), DropPosition::After(2));
        assert_eq!(DropPosition::from_hover(None, Point::default()), DropPosition::Append);
        assert_eq!(DropPosition::After(2).index(3), 3);
        assert_eq!(DropPosition::Before(7).index(3), 3);
    }

    #[test]
    fn test_press_below_threshold_is_a_click() {
        let mut drag = DragDrop::new(3.0);
        drag.press(DragSource::Palette { kind: NodeKind::Text }, Point::new(0.0, 0.0));
        assert!(!drag.pointer_move(Point::new(1.0, 1.0)));
        assert!(!drag.is_dragging());
        assert_eq!(drag.release(), DragOutcome::Cancelled(CancelReason::NotDragging));
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_zero_threshold_drags_immediately() {
        let mut drag = DragDrop::new(0.0);
        drag.press(DragSource::Palette { kind: NodeKind::Text }, Point::default());
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_palette_drop_yields_insert() {
        let doc = doc();
        let mut drag = dragging(DragSource::Palette { kind: NodeKind::Button });

        let zone = drag.hover(&doc, &hover_over(Path::root(), 1, 130.0)).cloned().unwrap();
        assert_eq!(zone, DropZone { container: Path::root(), index: 2, accepted: true });

        assert_eq!(
            drag.release(),
            DragOutcome::Drop(DropCommand::Insert {
                kind: NodeKind::Button,
                container: Path::root(),
                index: 2,
            })
        );
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_existing_drop_yields_move() {
        let doc = doc();
        let source = DragSource::existing(&doc, &Path::top_level(2)).unwrap();
        let mut drag = dragging(source);
        let form = Path::top_level(0).elements();

        drag.hover(&doc, &hover_over(form.clone(), 0, 105.0));
        assert_eq!(
            drag.release(),
            DragOutcome::Drop(DropCommand::Move {
                from: Path::top_level(2),
                container: form,
                index: 0,
            })
        );
    }

    #[test]
    fn test_container_over_container_is_rejected() {
        let doc = doc();
        let mut drag = dragging(DragSource::Palette { kind: NodeKind::ColumnSet });

        let zone = drag.hover(&doc, &hover_over(Path::top_level(0).elements(), 0, 130.0)).unwrap();
        assert!(!zone.accepted);
        assert_eq!(drag.release(), DragOutcome::Cancelled(CancelReason::Rejected));
    }

    #[test]
    fn test_drag_into_own_subtree_is_rejected() {
        let doc = doc();
        let source = DragSource::existing(&doc, &Path::top_level(0)).unwrap();
        let mut drag = dragging(source);

        let target = HoverTarget {
            container: Path::top_level(0).elements(),
            sibling: None,
            pointer: Point::default(),
        };
        assert!(!drag.hover(&doc, &target).unwrap().accepted);
    }

    #[test]
    fn test_unresolvable_container_is_rejected() {
        let doc = doc();
        let mut drag = dragging(DragSource::Palette { kind: NodeKind::Text });

        let zone = drag.hover(&doc, &hover_over(Path::top_level(1).elements(), 0, 0.0)).unwrap();
        assert!(!zone.accepted);
    }

    #[test]
    fn test_leave_and_drop_without_zone() {
        let doc = doc();
        let mut drag = dragging(DragSource::Palette { kind: NodeKind::Text });
        drag.hover(&doc, &hover_over(Path::root(), 0, 0.0));

        assert!(drag.leave());
        assert!(drag.zone().is_none());
        assert!(drag.is_dragging());
        assert_eq!(drag.release(), DragOutcome::Cancelled(CancelReason::NoDropZone));
    }

    #[test]
    fn test_hover_ignored_when_not_dragging() {
        let doc = doc();
        let mut drag = DragDrop::default();
        assert!(drag.hover(&doc, &hover_over(Path::root(), 0, 0.0)).is_none());
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_cancel() {
        let mut drag = dragging(DragSource::Palette { kind: NodeKind::Text });
        assert_eq!(drag.cancel(), DragOutcome::Cancelled(CancelReason::UserCancelled));
        assert_eq!(drag.cancel(), DragOutcome::Cancelled(CancelReason::NotDragging));
    }

    #[test]
    fn test_revalidate_relocates_dragged_node() {
        let doc = doc();
        let mut drag = dragging(DragSource::existing(&doc, &Path::top_level(2)).unwrap());
        drag.hover(&doc, &hover_over(Path::root(), 0, 105.0));

        let (edited, _) = resolver::remove(&doc, &Path::top_level(0)).unwrap();
        assert!(drag.revalidate(&edited));
        assert!(drag.zone().is_none());
        match drag.source() {
            Some(DragSource::Existing { path, id, .. }) => {
                assert_eq!(path, &Path::top_level(1));
                assert_eq!(id, "d");
            }
            other => panic!("expected existing source, got {:?}", other),
        }

        assert!(!drag.revalidate(&edited));
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_revalidate_cancels_when_dragged_node_is_gone() {
        let doc = doc();
        let mut drag = dragging(DragSource::existing(&doc, &Path::top_level(1)).unwrap());

        let (edited, _) = resolver::remove(&doc, &Path::top_level(1)).unwrap();
        assert!(drag.revalidate(&edited));
        assert_eq!(drag.state(), &DragState::Idle);
        assert_eq!(drag.release(), DragOutcome::Cancelled(CancelReason::NotDragging));
    }
}
