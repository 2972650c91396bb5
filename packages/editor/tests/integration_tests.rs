//! Integration tests for the editor crate: whole editing sessions through
//! the document store.

use cardkit_document::{check_invariants, resolver, Node, NodeKind, Path};
use cardkit_editor::{
    ChangeCause, DocumentStore, DragSource, EditOutcome, EditorConfig, HoverTarget, MutationError,
    NoopReason, Point, Rect, SiblingHit, StoreEvent,
};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

const SIGNUP: &str = r#"{
    "header": { "title": "Sign up" },
    "elements": [
        { "type": "title", "id": "heading", "title": "Create an account" },
        { "type": "form", "id": "signup", "name": "signup", "elements": [
            { "type": "input", "id": "email", "label": "Email", "required": true },
            { "type": "button", "id": "submit", "text": "Send", "action": "form_submit" }
        ]},
        { "type": "column_set", "id": "links", "columns": [
            { "elements": [ { "type": "text", "id": "terms", "content": "Terms" } ] },
            { "elements": [] }
        ]}
    ]
}"#;

fn open() -> DocumentStore {
    let mut store = DocumentStore::new(EditorConfig {
        drag_threshold: 3.0,
        ..EditorConfig::default()
    });
    let generated = store.import_json(SIGNUP).unwrap();
    assert!(generated.is_empty());
    store
}

fn path(s: &str) -> Path {
    s.parse().unwrap()
}

fn ids(store: &DocumentStore, container: &str) -> Vec<String> {
    resolver::elements_at(store.document(), &path(container))
        .unwrap()
        .iter()
        .map(|node| node.id().to_string())
        .collect()
}

#[test]
fn test_document_lifecycle() {
    let store = open();
    assert_eq!(store.version(), 1);
    assert_eq!(store.document().node_count(), 6);
    assert!(!store.can_undo());

    let exported = store.export_json().unwrap();
    let mut again = DocumentStore::default();
    again.import_json(&exported).unwrap();
    assert_eq!(again.document(), store.document());
}

#[test]
fn test_leaf_kinds_accepted_in_form_and_column() {
    let mut store = open();
    let leaves: Vec<NodeKind> = NodeKind::ALL.into_iter().filter(|k| !k.is_container()).collect();

    for kind in &leaves {
        assert_eq!(store.insert_new(*kind, &path("elements.1.elements"), 0), EditOutcome::Applied);
        assert_eq!(
            store.insert_new(*kind, &path("elements.2.columns.1.elements"), 0),
            EditOutcome::Applied
        );
    }

    assert_eq!(store.history().undo_levels(), leaves.len() * 2);
    assert!(check_invariants(store.document()).is_ok());
}

#[test]
fn test_containers_rejected_below_root() {
    let mut store = open();
    let before = store.document().clone();

    for kind in [NodeKind::Form, NodeKind::ColumnSet] {
        for target in ["elements.1.elements", "elements.2.columns.0.elements"] {
            let outcome = store.insert_new(kind, &path(target), 0);
            assert!(
                matches!(outcome, EditOutcome::Rejected(MutationError::NestingViolation { .. })),
                "{} into {} gave {:?}",
                kind,
                target,
                outcome
            );
        }
    }

    assert_eq!(store.document(), &before);
    assert!(!store.can_undo());
}

#[test]
fn test_form_cannot_move_into_itself() {
    let mut store = open();
    let outcome = store.move_node(&path("elements.1"), &path("elements.1.elements"), 0);
    assert_eq!(outcome, EditOutcome::Unchanged(NoopReason::SelfOrDescendant));
    assert!(!store.can_undo());
}

#[test]
fn test_drag_existing_node_into_column() {
    let mut store = open();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    store.drag_press_node(&path("elements.1.elements.0"), Point::new(10.0, 10.0)).unwrap();
    store.drag_move(Point::new(10.0, 11.0));
    assert!(!store.drag().is_dragging());
    store.drag_move(Point::new(40.0, 60.0));
    assert!(store.drag().is_dragging());

    let zone = store
        .drag_hover(&HoverTarget {
            container: path("elements.2.columns.0.elements"),
            sibling: Some(SiblingHit {
                index: 0,
                bounds: Rect::new(0.0, 50.0, 100.0, 20.0),
            }),
            pointer: Point::new(40.0, 65.0),
        })
        .unwrap();
    assert!(zone.accepted);
    assert_eq!(zone.index, 1);

    assert_eq!(store.drag_release(), EditOutcome::Applied);
    assert_eq!(ids(&store, "elements.1.elements"), vec!["submit"]);
    assert_eq!(ids(&store, "elements.2.columns.0.elements"), vec!["terms", "email"]);
    assert_eq!(store.history().undo_label(), Some("move input"));

    let events = events.borrow();
    assert!(events.contains(&StoreEvent::DragChanged));
    assert!(events.contains(&StoreEvent::DocumentChanged {
        cause: ChangeCause::Edit,
        version: 2
    }));
}

#[test]
fn test_rejected_drop_is_silent() {
    let mut store = open();
    let before = store.document().clone();

    store.drag_press(DragSource::Palette { kind: NodeKind::Form }, Point::default());
    store.drag_move(Point::new(0.0, 50.0));
    let zone = store
        .drag_hover(&HoverTarget {
            container: path("elements.1.elements"),
            sibling: None,
            pointer: Point::new(0.0, 50.0),
        })
        .unwrap();
    assert!(!zone.accepted);

    assert_eq!(store.drag_release(), EditOutcome::Unchanged(NoopReason::DropCancelled));
    assert_eq!(store.document(), &before);
    assert!(!store.drag().is_dragging());
}

#[test]
fn test_drag_cancelled_by_user() {
    let mut store = open();
    store.drag_press(DragSource::Palette { kind: NodeKind::Divider }, Point::default());
    store.drag_move(Point::new(0.0, 10.0));
    store.drag_cancel();

    assert!(store.drag().source().is_none());
    assert_eq!(store.drag_release(), EditOutcome::Unchanged(NoopReason::DropCancelled));
    assert!(!store.can_undo());
}

const THREE_TEXTS: &str = r#"[
    { "type": "text", "id": "a" },
    { "type": "text", "id": "b" },
    { "type": "text", "id": "c" }
]"#;

fn drag_top_level(store: &mut DocumentStore, index: usize) {
    store.drag_press_node(&Path::top_level(index), Point::default()).unwrap();
    store.drag_move(Point::new(0.0, 20.0));
    assert!(store.drag().is_dragging());
}

fn hover_before_first(store: &mut DocumentStore) -> bool {
    store
        .drag_hover(&HoverTarget {
            container: Path::root(),
            sibling: Some(SiblingHit {
                index: 0,
                bounds: Rect::new(0.0, 0.0, 100.0, 40.0),
            }),
            pointer: Point::new(10.0, 5.0),
        })
        .map(|zone| zone.accepted)
        .unwrap_or(false)
}

#[test]
fn test_drag_follows_node_across_edits() {
    let mut store = DocumentStore::default();
    store.import_json(THREE_TEXTS).unwrap();

    drag_top_level(&mut store, 2);
    assert!(hover_before_first(&mut store));
    assert!(store.delete_at(&Path::top_level(0)).is_applied());

    // the hover was against the old document
    assert!(store.drag().zone().is_none());
    assert!(hover_before_first(&mut store));

    assert_eq!(store.drag_release(), EditOutcome::Applied);
    assert_eq!(ids(&store, "elements"), vec!["c", "b"]);
}

#[test]
fn test_drag_cancelled_when_node_deleted() {
    let mut store = DocumentStore::default();
    store.import_json(THREE_TEXTS).unwrap();

    drag_top_level(&mut store, 1);
    assert!(store.delete_at(&Path::top_level(1)).is_applied());
    assert!(store.drag().source().is_none());

    assert!(!hover_before_first(&mut store));
    assert_eq!(store.drag_release(), EditOutcome::Unchanged(NoopReason::DropCancelled));
    assert_eq!(ids(&store, "elements"), vec!["a", "c"]);
}

#[test]
fn test_property_panel_edit_and_undo() {
    let mut store = open();
    store.select_path(&path("elements.1.elements.1")).unwrap();

    let patch = json!({ "text": "Create account", "style": "primary" });
    assert!(store.update_selected(patch.as_object().unwrap()).is_applied());
    match store.selection().unwrap().node.as_ref() {
        Node::Button(button) => assert_eq!(button.text, "Create account"),
        other => panic!("expected button, got {:?}", other),
    }

    store.undo();
    match store.selection().unwrap().node.as_ref() {
        Node::Button(button) => assert_eq!(button.text, "Send"),
        other => panic!("expected button, got {:?}", other),
    }
}

#[test]
fn test_copy_paste_regenerates_ids() {
    let mut store = open();
    store.select_path(&path("elements.1")).unwrap();
    assert!(store.copy_selected());

    assert!(store.paste().is_applied());
    assert!(store.paste().is_applied());

    let doc = store.document();
    assert_eq!(doc.elements.len(), 5);
    assert!(check_invariants(doc).is_ok());
    let pasted: Vec<&str> = doc.elements[3..].iter().map(|node| node.id()).collect();
    assert!(!pasted.contains(&"signup"));
    assert_ne!(pasted[0], pasted[1]);
    assert_eq!(doc.elements[3].subtree_len(), 3);
}

#[test]
fn test_duplicate_places_copy_after_original() {
    let mut store = open();
    assert!(store.duplicate(&path("elements.1.elements.0")).is_applied());

    let fields = ids(&store, "elements.1.elements");
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0], "email");
    assert_ne!(fields[1], "email");
    assert_eq!(fields[2], "submit");
}

#[test]
fn test_import_failure_keeps_session() {
    let mut store = open();
    store.insert_new(NodeKind::Divider, &Path::root(), 0);
    let before = store.document().clone();

    let nested = r#"[{ "type": "form", "id": "a", "elements": [{ "type": "form", "id": "b" }] }]"#;
    assert!(store.import_json(nested).is_err());
    assert_eq!(store.document(), &before);
    assert!(store.can_undo());
}

#[test]
fn test_import_resets_history_and_selection() {
    let mut store = open();
    store.insert_new(NodeKind::Divider, &Path::root(), 0);
    store.select_path(&Path::top_level(0)).unwrap();

    let generated = store.import_json(r#"[{ "type": "text" }]"#).unwrap();
    assert_eq!(generated, vec![Path::top_level(0)]);
    assert!(!store.can_undo());
    assert!(store.selection().is_none());
}
