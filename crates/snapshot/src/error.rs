//! Error types for snapshot documents.

use dynamics::InvalidReferenceError;

/// Errors that can occur while reading or resolving a snapshot document.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to (de)serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),

    #[error("Node {node} names parent {parent}, which is not declared before it")]
    UnknownParent { node: String, parent: String },

    #[error("Duplicate collider id: {0}")]
    DuplicateCollider(String),

    #[error("Invalid reference: {0}")]
    Reference(#[from] InvalidReferenceError),
}
