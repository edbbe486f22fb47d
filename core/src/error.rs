//! Error types for digraph operations.

use thiserror::Error;

use crate::graph::NodeRef;

/// Result type for digraph operations.
pub type DigraphResult<T> = Result<T, DigraphError>;

/// Errors raised while building or converting a digraph.
///
/// Sorting never fails: a cyclic component without a root is omitted from
/// the ordering instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DigraphError {
    /// A node with the same name is already registered.
    #[error("node with name [{name}] already exists")]
    DuplicateNode { name: String },

    /// A handle was issued by another graph or does not name a registered node.
    #[error("node reference {node:?} is not registered in this graph")]
    InvalidReference { node: NodeRef },

    /// An adjacency list names a target that was never declared as a key.
    #[error("node '{name}' is referenced by '{referenced_by}' but not specified")]
    UnknownReference { name: String, referenced_by: String },

    /// The JSON text is not an object of string arrays.
    #[error("invalid adjacency JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DigraphError {
    pub fn duplicate_node(name: impl Into<String>) -> Self {
        Self::DuplicateNode { name: name.into() }
    }

    pub fn invalid_reference(node: NodeRef) -> Self {
        Self::InvalidReference { node }
    }

    pub fn unknown_reference(name: impl Into<String>, referenced_by: impl Into<String>) -> Self {
        Self::UnknownReference {
            name: name.into(),
            referenced_by: referenced_by.into(),
        }
    }
}
