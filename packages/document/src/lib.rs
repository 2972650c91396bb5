//! # Cardkit Document
//!
//! Typed model of a card document and the path machinery the editor is built
//! on.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: typed tree + paths                │
//! │  - Node union (containers / leaves)         │
//! │  - Path resolver (copy-on-write edits)      │
//! │  - Invariants, ids, JSON import/export      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: mutations, history, selection,      │
//! │         clipboard, drag and drop            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use cardkit_document::{resolver, IdGenerator, Node, NodeKind, Path};
//! use std::sync::Arc;
//!
//! let mut ids = IdGenerator::new("card.json");
//! let doc = cardkit_document::import_str(r#"[{"type": "form"}]"#, &mut ids)?.document;
//!
//! let input = Arc::new(Node::new(NodeKind::Input, ids.new_id()));
//! let target = Path::top_level(0).elements();
//! let next = resolver::insert_into(&doc, &target, 0, input)?;
//!
//! assert_eq!(next.node_count(), 2);
//! assert_eq!(doc.node_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod codec;
mod document;
mod error;
mod id_generator;
mod node;
mod path;
mod validate;

pub mod resolver;
pub mod visitor;

pub use codec::{export_string, export_value, import_str, import_value, Imported};
pub use document::{Direction, Document, Header};
pub use error::{ImportError, InvariantError, PathError};
pub use id_generator::{
    collect_ids, fill_missing_ids, get_seed, reassign_ids, subtree_ids, IdGenerator,
};
pub use node::{
    Button, ButtonAction, Column, ColumnSet, ColumnWidth, Divider, FlexMode, Form, Image,
    ImageCombination, Input, MultiSelect, Node, NodeKind, RichText, Select, SelectOption, Text,
    Title, VerticalAlign,
};
pub use path::{CollectionKey, Path, Segment};
pub use resolver::{Removed, Target};
pub use validate::check_invariants;
