//! # Path Resolver
//!
//! Reads and copy-on-write edits of a `Document` addressed by `Path`.
//!
//! Every edit takes the document by reference and returns a new one. Only the
//! nodes along the addressed path are copied (`Arc::make_mut` on a shallow
//! clone); everything else is shared with the input. Any path that does not
//! resolve yields a `PathError` and no document.

use crate::document::Document;
use crate::error::PathError;
use crate::node::{Column, Node};
use crate::path::{CollectionKey, Path, Segment};
use std::sync::Arc;

/// What a path resolves to
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Node(&'a Arc<Node>),
    Column(&'a Column),
    Elements(&'a [Arc<Node>]),
    Columns(&'a [Column]),
}

impl<'a> Target<'a> {
    pub fn as_node(self) -> Option<&'a Arc<Node>> {
        match self {
            Target::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_elements(self) -> Option<&'a [Arc<Node>]> {
        match self {
            Target::Elements(elements) => Some(elements),
            _ => None,
        }
    }
}

/// A slot removed by [`remove`]
#[derive(Debug, Clone, PartialEq)]
pub enum Removed {
    Node(Arc<Node>),
    Column(Column),
}

enum Cursor<'a> {
    Root(&'a Document),
    Resolved(Target<'a>),
}

/// Resolve `path`, reporting the first bad hop
pub fn resolve<'a>(doc: &'a Document, path: &Path) -> Result<Target<'a>, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let mut cursor = Cursor::Root(doc);
    for (position, segment) in path.segments().iter().enumerate() {
        let next = match (cursor, *segment) {
            (Cursor::Root(doc), Segment::Key(CollectionKey::Elements)) => {
                Target::Elements(&doc.elements)
            }
            (Cursor::Resolved(Target::Node(node)), Segment::Key(key)) => {
                match (node.as_ref(), key) {
                    (Node::Form(form), CollectionKey::Elements) => Target::Elements(&form.elements),
                    (Node::ColumnSet(set), CollectionKey::Columns) => Target::Columns(&set.columns),
                    _ => return Err(unknown_key(path, position, key)),
                }
            }
            (Cursor::Resolved(Target::Column(column)), Segment::Key(CollectionKey::Elements)) => {
                Target::Elements(&column.elements)
            }
            (Cursor::Resolved(Target::Elements(list)), Segment::Index(index)) => {
                let node = list
                    .get(index)
                    .ok_or_else(|| out_of_range(path, position, index, list.len()))?;
                Target::Node(node)
            }
            (Cursor::Resolved(Target::Columns(list)), Segment::Index(index)) => {
                let column = list
                    .get(index)
                    .ok_or_else(|| out_of_range(path, position, index, list.len()))?;
                Target::Column(column)
            }
            (Cursor::Root(_), Segment::Key(key))
            | (Cursor::Resolved(Target::Column(_)), Segment::Key(key)) => {
                return Err(unknown_key(path, position, key))
            }
            (Cursor::Root(_), Segment::Index(_))
            | (Cursor::Resolved(Target::Node(_)), Segment::Index(_))
            | (Cursor::Resolved(Target::Column(_)), Segment::Index(_)) => {
                return Err(malformed(path, position, "a collection key"))
            }
            (Cursor::Resolved(Target::Elements(_)), Segment::Key(_))
            | (Cursor::Resolved(Target::Columns(_)), Segment::Key(_)) => {
                return Err(malformed(path, position, "an index"))
            }
        };
        cursor = Cursor::Resolved(next);
    }

    match cursor {
        Cursor::Resolved(target) => Ok(target),
        Cursor::Root(_) => Err(PathError::Empty),
    }
}

/// Resolve `path`; `None` on any missing or invalid hop
pub fn get<'a>(doc: &'a Document, path: &Path) -> Option<Target<'a>> {
    resolve(doc, path).ok()
}

/// Resolve a path that must address a node
pub fn node_at<'a>(doc: &'a Document, path: &Path) -> Result<&'a Arc<Node>, PathError> {
    resolve(doc, path)?
        .as_node()
        .ok_or_else(|| PathError::NotANode(path.clone()))
}

/// Resolve a path that must address an `elements` collection
pub fn elements_at<'a>(doc: &'a Document, path: &Path) -> Result<&'a [Arc<Node>], PathError> {
    resolve(doc, path)?
        .as_elements()
        .ok_or_else(|| PathError::NotACollection(path.clone()))
}

/// Replace the node at `path`
pub fn set(doc: &Document, path: &Path, node: Arc<Node>) -> Result<Document, PathError> {
    let (collection, index) = path
        .split_index()
        .ok_or_else(|| PathError::NotANode(path.clone()))?;

    let mut next = doc.clone();
    match collection_mut(&mut next, &collection)? {
        CollectionMut::Elements(list) => {
            let len = list.len();
            let slot = list
                .get_mut(index)
                .ok_or_else(|| out_of_range(path, path.len() - 1, index, len))?;
            *slot = node;
        }
        CollectionMut::Columns(_) => return Err(PathError::NotANode(path.clone())),
    }
    Ok(next)
}

/// Remove the node or column at `path`, shifting later siblings down
pub fn remove(doc: &Document, path: &Path) -> Result<(Document, Removed), PathError> {
    let (collection, index) = path.split_index().ok_or_else(|| {
        if path.is_empty() {
            PathError::Empty
        } else {
            malformed(path, path.len() - 1, "an index")
        }
    })?;

    let mut next = doc.clone();
    let removed = match collection_mut(&mut next, &collection)? {
        CollectionMut::Elements(list) => {
            if index >= list.len() {
                return Err(out_of_range(path, path.len() - 1, index, list.len()));
            }
            Removed::Node(list.remove(index))
        }
        CollectionMut::Columns(list) => {
            if index >= list.len() {
                return Err(out_of_range(path, path.len() - 1, index, list.len()));
            }
            Removed::Column(list.remove(index))
        }
    };
    Ok((next, removed))
}

/// Insert `node` into the `elements` collection at `collection_path`.
///
/// `index` is clamped to `[0, len]`.
pub fn insert_into(
    doc: &Document,
    collection_path: &Path,
    index: usize,
    node: Arc<Node>,
) -> Result<Document, PathError> {
    let mut next = doc.clone();
    match collection_mut(&mut next, collection_path)? {
        CollectionMut::Elements(list) => {
            let index = index.min(list.len());
            list.insert(index, node);
        }
        CollectionMut::Columns(_) => return Err(PathError::NotACollection(collection_path.clone())),
    }
    Ok(next)
}

enum CollectionMut<'a> {
    Elements(&'a mut Vec<Arc<Node>>),
    Columns(&'a mut Vec<Column>),
}

/// Walk to a collection, copying every node on the way that is still shared
fn collection_mut<'a>(doc: &'a mut Document, path: &Path) -> Result<CollectionMut<'a>, PathError> {
    let segments = path.segments();
    let mut cursor = match segments.first() {
        Some(Segment::Key(CollectionKey::Elements)) => CollectionMut::Elements(&mut doc.elements),
        Some(Segment::Key(key)) => return Err(unknown_key(path, 0, *key)),
        Some(Segment::Index(_)) => return Err(malformed(path, 0, "a collection key")),
        None => return Err(PathError::Empty),
    };

    let mut position = 1;
    while position < segments.len() {
        let index = match segments[position] {
            Segment::Index(index) => index,
            Segment::Key(_) => return Err(malformed(path, position, "an index")),
        };
        let key = match segments.get(position + 1) {
            Some(Segment::Key(key)) => *key,
            Some(Segment::Index(_)) => {
                return Err(malformed(path, position + 1, "a collection key"))
            }
            None => return Err(PathError::NotACollection(path.clone())),
        };

        cursor = match cursor {
            CollectionMut::Elements(list) => {
                let len = list.len();
                let slot = list
                    .get_mut(index)
                    .ok_or_else(|| out_of_range(path, position, index, len))?;
                match Arc::make_mut(slot) {
                    Node::Form(form) if key == CollectionKey::Elements => {
                        CollectionMut::Elements(&mut form.elements)
                    }
                    Node::ColumnSet(set) if key == CollectionKey::Columns => {
                        CollectionMut::Columns(&mut set.columns)
                    }
                    _ => return Err(unknown_key(path, position + 1, key)),
                }
            }
            CollectionMut::Columns(list) => {
                let len = list.len();
                let column = list
                    .get_mut(index)
                    .ok_or_else(|| out_of_range(path, position, index, len))?;
                if key != CollectionKey::Elements {
                    return Err(unknown_key(path, position + 1, key));
                }
                CollectionMut::Elements(&mut column.elements)
            }
        };
        position += 2;
    }

    Ok(cursor)
}

fn malformed(path: &Path, position: usize, expected: &'static str) -> PathError {
    PathError::Malformed {
        path: path.clone(),
        position,
        expected,
    }
}

fn unknown_key(path: &Path, position: usize, key: CollectionKey) -> PathError {
    PathError::UnknownKey {
        path: path.clone(),
        position,
        key,
    }
}

fn out_of_range(path: &Path, position: usize, index: usize, len: usize) -> PathError {
    PathError::OutOfRange {
        path: path.clone(),
        position,
        index,
        len,
    }
}
