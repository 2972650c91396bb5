//! Error types for the document model

use crate::node::NodeKind;
use crate::path::{CollectionKey, Path};
use thiserror::Error;

/// A path that does not resolve against a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Empty path")]
    Empty,

    #[error("Malformed path {path}: expected {expected} at segment {position}")]
    Malformed {
        path: Path,
        position: usize,
        expected: &'static str,
    },

    #[error("Path {path}: no '{key}' collection at segment {position}")]
    UnknownKey {
        path: Path,
        position: usize,
        key: CollectionKey,
    },

    #[error("Path {path}: index {index} out of range (len {len}) at segment {position}")]
    OutOfRange {
        path: Path,
        position: usize,
        index: usize,
        len: usize,
    },

    #[error("Path {0} does not address a node")]
    NotANode(Path),

    #[error("Path {0} does not address an element collection")]
    NotACollection(Path),
}

/// A document that breaks a structural invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantError {
    #[error("Container {kind} '{id}' is nested at {path}; containers may only live at the root")]
    NestedContainer { id: String, kind: NodeKind, path: Path },

    #[error("Duplicate node id '{id}' at {path}")]
    DuplicateId { id: String, path: Path },

    #[error("Node at {0} has an empty id")]
    EmptyId(Path),
}

/// Payload rejected by import
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("Node at {path} is missing required field '{field}'")]
    MissingField { path: Path, field: &'static str },

    #[error("Node at {path} has unknown type '{kind}'")]
    UnknownKind { path: Path, kind: String },

    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantError),
}
