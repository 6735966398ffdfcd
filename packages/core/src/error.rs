//! Error types for tree operations.
//!
//! Every error is local and recoverable by the caller. Composite inserts are
//! not transactional: when one of these is returned from an insert, nodes
//! created before the failing element remain in the tree.

use crate::path::{Path, PathError};
use crate::store::StoreError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Read resolution reached a missing segment.
    #[error("node not found: {path}")]
    NotFound { path: Path },

    /// Attempted to create a child under a node holding a scalar value.
    #[error("node {path} is a leaf, can't create children")]
    LeafConflict { path: Path },

    /// Attempted to set a scalar on a node that has children.
    #[error("node {path} has children, can't set data")]
    BranchConflict { path: Path },

    /// The value's shape cannot be represented in the tree.
    #[error("unsupported type: {type_name}")]
    UnsupportedType { type_name: String },

    /// Malformed path string or mapping key.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// Data read back from a store or a serde type could not be decoded.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Failure reported by a backing store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl Error {
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }
}
