//! Tests for chains of mutations with history
//!
//! This tests:
//! - Move + update + delete chains
//! - Undo/redo sequences and branch discarding
//! - Document integrity after operations

use cardkit_document::{check_invariants, resolver, Document, Form, Node, NodeKind, Path};
use cardkit_editor::{delete_at, insert, move_node, update_node, Change, History};
use serde_json::json;
use std::sync::Arc;

fn path(s: &str) -> Path {
    s.parse().unwrap()
}

fn base() -> Document {
    Document::with_elements([
        Node::Form(Form {
            id: "a".to_string(),
            elements: vec![Arc::new(Node::new(NodeKind::Text, "a1"))],
            ..Default::default()
        }),
        Node::Form(Form {
            id: "b".to_string(),
            elements: vec![Arc::new(Node::new(NodeKind::Text, "b1"))],
            ..Default::default()
        }),
    ])
}

fn apply(change: Change) -> Document {
    match change {
        Change::Applied(doc) => doc,
        Change::Noop(reason) => panic!("expected an applied change, got {:?}", reason),
    }
}

#[test]
fn test_move_then_delete_sequence() -> anyhow::Result<()> {
    let doc = base();
    let mut history = History::new(doc.clone());

    // Move a1 into form b, after b1
    let from = path("elements.0.elements.0");
    let doc = apply(move_node(&doc, &from, &path("elements.1.elements"), 1)?);
    history.push(doc.clone(), "move text");
    let b = resolver::elements_at(&doc, &path("elements.1.elements"))?;
    assert_eq!(b.iter().map(|n| n.id()).collect::<Vec<_>>(), vec!["b1", "a1"]);

    // Delete the now-empty form a
    let doc = apply(delete_at(&doc, &Path::top_level(0))?);
    history.push(doc.clone(), "delete form");
    assert_eq!(doc.elements.len(), 1);
    assert_eq!(doc.node_count(), 3);
    check_invariants(&doc)?;

    // Undo both
    assert_eq!(history.undo().map(|d| d.node_count()), Some(4));
    assert_eq!(history.undo(), Some(&base()));
    assert!(history.undo().is_none());
    Ok(())
}

#[test]
fn test_update_move_and_back() -> anyhow::Result<()> {
    let mut doc = base();
    let patch = json!({ "content": "renamed" });
    doc = apply(update_node(&doc, &path("elements.1.elements.0"), patch.as_object().unwrap())?);
    doc = apply(move_node(&doc, &path("elements.1.elements.0"), &Path::root(), 0)?);
    doc = apply(move_node(&doc, &Path::top_level(0), &path("elements.2.elements"), 0)?);

    let back = resolver::node_at(&doc, &path("elements.1.elements.0"))?;
    assert_eq!(back.id(), "b1");
    match back.as_ref() {
        Node::Text(text) => assert_eq!(text.content, "renamed"),
        other => panic!("expected text, got {:?}", other),
    }
    assert_eq!(doc.elements.len(), 2);
    Ok(())
}

#[test]
fn test_new_edit_after_undo_discards_branch() -> anyhow::Result<()> {
    let doc = base();
    let mut history = History::new(doc.clone());

    let first = apply(insert(&doc, &Path::root(), 2, Arc::new(Node::new(NodeKind::Divider, "d")))?);
    history.push(first.clone(), "insert divider");
    let second = apply(delete_at(&first, &Path::top_level(0))?);
    history.push(second, "delete form");

    let undone = history.undo().cloned().unwrap();
    assert_eq!(undone, first);

    let image = Arc::new(Node::new(NodeKind::Image, "img"));
    let branch = apply(insert(&undone, &Path::root(), 0, image)?);
    history.push(branch.clone(), "insert image");

    assert!(history.redo().is_none());
    assert_eq!(history.current(), &branch);
    assert_eq!(history.undo(), Some(&first));
    assert_eq!(history.undo(), Some(&doc));
    Ok(())
}

#[test]
fn test_snapshots_share_untouched_subtrees() -> anyhow::Result<()> {
    let doc = base();
    let next = apply(delete_at(&doc, &path("elements.0.elements.0"))?);

    // form b was not on the edited path
    assert!(Arc::ptr_eq(&doc.elements[1], &next.elements[1]));
    assert!(!Arc::ptr_eq(&doc.elements[0], &next.elements[0]));
    assert_eq!(doc.node_count(), 4);
    Ok(())
}
