use crate::document::Document;
use crate::node::{Column, Node};
use crate::path::Path;
use std::sync::Arc;

/// Visitor pattern for traversing the document tree immutably
///
/// Every node and column is visited with the path that addresses it.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &Document) {
        walk_document(self, doc);
    }

    fn visit_node(&mut self, node: &Arc<Node>, path: &Path) {
        walk_node(self, node, path);
    }

    fn visit_column(&mut self, column: &Column, path: &Path) {
        walk_column(self, column, path);
    }
}

/// Mutable visitor for rewriting nodes in place.
///
/// Shared children are copied on the way down (`Arc::make_mut`), so only
/// use this on trees that are not yet published in a document.
pub trait VisitorMut: Sized {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) {
    walk_elements(visitor, &doc.elements, &Path::root());
}

pub fn walk_elements<V: Visitor>(visitor: &mut V, elements: &[Arc<Node>], path: &Path) {
    for (index, node) in elements.iter().enumerate() {
        visitor.visit_node(node, &path.clone().index(index));
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node, path: &Path) {
    match node {
        Node::Form(form) => walk_elements(visitor, &form.elements, &path.clone().elements()),
        Node::ColumnSet(set) => {
            let columns = path.clone().columns();
            for (index, column) in set.columns.iter().enumerate() {
                visitor.visit_column(column, &columns.clone().index(index));
            }
        }
        Node::Text(_)
        | Node::Input(_)
        | Node::Button(_)
        | Node::Image(_)
        | Node::ImageCombination(_)
        | Node::Select(_)
        | Node::MultiSelect(_)
        | Node::Divider(_)
        | Node::RichText(_)
        | Node::Title(_) => {
            // Leaf node, no children to walk
        }
    }
}

pub fn walk_column<V: Visitor>(visitor: &mut V, column: &Column, path: &Path) {
    walk_elements(visitor, &column.elements, &path.clone().elements());
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    match node {
        Node::Form(form) => {
            for child in &mut form.elements {
                visitor.visit_node_mut(Arc::make_mut(child));
            }
        }
        Node::ColumnSet(set) => {
            for column in &mut set.columns {
                for child in &mut column.elements {
                    visitor.visit_node_mut(Arc::make_mut(child));
                }
            }
        }
        _ => {}
    }
}

/// Every node in document order with its path
pub fn collect_nodes(doc: &Document) -> Vec<(Path, Arc<Node>)> {
    struct Collector(Vec<(Path, Arc<Node>)>);

    impl Visitor for Collector {
        fn visit_node(&mut self, node: &Arc<Node>, path: &Path) {
            self.0.push((path.clone(), Arc::clone(node)));
            walk_node(self, node, path);
        }
    }

    let mut collector = Collector(Vec::new());
    collector.visit_document(doc);
    collector.0
}

/// Path of the node with `id`, if present
pub fn find_path(doc: &Document, id: &str) -> Option<Path> {
    struct Finder<'a> {
        id: &'a str,
        found: Option<Path>,
    }

    impl Visitor for Finder<'_> {
        fn visit_node(&mut self, node: &Arc<Node>, path: &Path) {
            if self.found.is_some() {
                return;
            }
            if node.id() == self.id {
                self.found = Some(path.clone());
                return;
            }
            walk_node(self, node, path);
        }
    }

    let mut finder = Finder { id, found: None };
    finder.visit_document(doc);
    finder.found
}
