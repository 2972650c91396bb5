//! Error types for the editor

use cardkit_document::{ImportError, InvariantError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    Invariant(#[from] InvariantError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),
}
