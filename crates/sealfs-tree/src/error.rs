//! Tree lookup errors.

use crate::NodeId;
use sealfs_types::ErrorCode;
use thiserror::Error;

/// Failures of path lookups and id-based arena access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A path segment did not match any child.
    ///
    /// `found` holds the ancestor chain resolved before the miss,
    /// starting at the mount root.
    #[error("{path} no such directory or resource")]
    NotFound { path: String, found: Vec<NodeId> },

    /// The path does not lie under the tree's mount point.
    #[error("{path} not under mount {root}")]
    NotRoot { path: String, root: String },

    /// The id refers to a node that has been removed.
    #[error("node {id} was removed")]
    Stale { id: NodeId },
}

impl ErrorCode for TreeError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "TREE_NOT_FOUND",
            Self::NotRoot { .. } => "TREE_NOT_ROOT",
            Self::Stale { .. } => "TREE_STALE_NODE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
