use crate::document::Document;
use crate::node::Node;
use crate::visitor::{walk_node, walk_node_mut, Visitor, VisitorMut};
use crate::path::Path;
use crc32fast::Hasher;
use std::collections::HashSet;
use std::sync::Arc;

/// Generate an id seed from a session or document name using CRC32
pub fn get_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes within an editing session
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // CRC32 of the session name
    count: u32,   // Sequential counter, never rewinds
}

impl IdGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            seed: get_seed(name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Next sequential id that is not in `taken`
    pub fn fresh_id(&mut self, taken: &HashSet<String>) -> String {
        loop {
            let id = self.new_id();
            if !taken.contains(&id) {
                return id;
            }
        }
    }

    /// Get id seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

/// All node ids in `doc`
pub fn collect_ids(doc: &Document) -> HashSet<String> {
    struct Ids(HashSet<String>);

    impl Visitor for Ids {
        fn visit_node(&mut self, node: &Arc<Node>, path: &Path) {
            self.0.insert(node.id().to_string());
            walk_node(self, node, path);
        }
    }

    let mut ids = Ids(HashSet::new());
    ids.visit_document(doc);
    ids.0
}

/// All ids in the subtree rooted at `node`
pub fn subtree_ids(node: &Node) -> Vec<String> {
    let mut ids = vec![node.id().to_string()];
    for child in node.children() {
        ids.extend(subtree_ids(child));
    }
    ids
}

/// Give `node` and every descendant a fresh id not in `taken`.
///
/// New ids are added to `taken` so repeated calls never collide.
pub fn reassign_ids(node: &mut Node, generator: &mut IdGenerator, taken: &mut HashSet<String>) {
    struct Reassign<'a> {
        generator: &'a mut IdGenerator,
        taken: &'a mut HashSet<String>,
    }

    impl VisitorMut for Reassign<'_> {
        fn visit_node_mut(&mut self, node: &mut Node) {
            let id = self.generator.fresh_id(self.taken);
            self.taken.insert(id.clone());
            node.set_id(id);
            walk_node_mut(self, node);
        }
    }

    Reassign { generator, taken }.visit_node_mut(node);
}

/// Give every node under `node` with a blank id a fresh one not in `taken`.
///
/// Returns how many ids were assigned.
pub fn fill_missing_ids(
    node: &mut Node,
    generator: &mut IdGenerator,
    taken: &mut HashSet<String>,
) -> usize {
    struct Fill<'a> {
        generator: &'a mut IdGenerator,
        taken: &'a mut HashSet<String>,
        filled: usize,
    }

    impl VisitorMut for Fill<'_> {
        fn visit_node_mut(&mut self, node: &mut Node) {
            if node.id().trim().is_empty() {
                let id = self.generator.fresh_id(self.taken);
                self.taken.insert(id.clone());
                node.set_id(id);
                self.filled += 1;
            }
            walk_node_mut(self, node);
        }
    }

    let mut fill = Fill { generator, taken, filled: 0 };
    fill.visit_node_mut(node);
    fill.filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Form, NodeKind};

    #[test]
    fn test_seed_generation() {
        let id1 = get_seed("card.json");
        let id2 = get_seed("card.json");

        // Same name always generates same seed
        assert_eq!(id1, id2);

        // Different names generate different seeds
        let id3 = get_seed("other.json");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("session");

        let id1 = gen.new_id();
        let id2 = gen.new_id();
        let id3 = gen.new_id();

        // IDs are sequential
        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id3.ends_with("-3"));

        // All share same seed
        let seed = gen.seed();
        assert!(id1.starts_with(seed));
        assert!(id3.starts_with(seed));
    }

    #[test]
    fn test_fresh_id_skips_taken() {
        let mut gen = IdGenerator::from_seed("s".to_string());
        let taken: HashSet<String> = ["s-1".to_string(), "s-2".to_string()].into_iter().collect();

        assert_eq!(gen.fresh_id(&taken), "s-3");
    }

    #[test]
    fn test_reassign_ids_covers_descendants() {
        let mut node = Node::Form(Form {
            id: "form".to_string(),
            elements: vec![
                Arc::new(Node::new(NodeKind::Input, "a")),
                Arc::new(Node::new(NodeKind::Button, "b")),
            ],
            ..Default::default()
        });
        let mut gen = IdGenerator::from_seed("x".to_string());
        let mut taken: HashSet<String> =
            ["form", "a", "b", "x-1"].iter().map(|s| s.to_string()).collect();

        reassign_ids(&mut node, &mut gen, &mut taken);

        let ids = subtree_ids(&node);
        assert_eq!(ids, vec!["x-2", "x-3", "x-4"]);
        assert!(taken.contains("x-4"));
    }

    #[test]
    fn test_fill_missing_ids_keeps_existing() {
        let mut form = Node::Form(Form {
            id: "form".to_string(),
            elements: vec![
                Arc::new(Node::new(NodeKind::Text, "")),
                Arc::new(Node::new(NodeKind::Input, "email")),
                Arc::new(Node::new(NodeKind::Divider, "  ")),
            ],
            ..Default::default()
        });
        let mut taken = HashSet::from(["form".to_string(), "email".to_string()]);
        let mut gen = IdGenerator::new("session");

        assert_eq!(fill_missing_ids(&mut form, &mut gen, &mut taken), 2);
        let ids = subtree_ids(&form);
        assert_eq!(ids[0], "form");
        assert_eq!(ids[2], "email");
        assert!(ids.iter().all(|id| !id.trim().is_empty()));
        assert_ne!(ids[1], ids[3]);
        assert_eq!(taken.len(), 4);
    }
}
