//! Error types for snapshot indexing

use pagepilot_core_types::AutomationError;
use thiserror::Error;

/// Indexing failure enumeration. All variants surface to callers as
/// `AutomationError::InvalidSnapshot`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndexError {
    /// The snapshot has no nodes at all.
    #[error("snapshot tree is empty")]
    EmptyTree,

    /// A node arrived without a semantic role.
    #[error("node at tree path {path} is missing a role")]
    MissingRole { path: String },

    /// A node arrived without a backing element tag, which makes it
    /// impossible to derive a structural path later.
    #[error("node at tree path {path} is missing a tag name")]
    MissingTag { path: String },
}

impl From<IndexError> for AutomationError {
    fn from(err: IndexError) -> Self {
        AutomationError::InvalidSnapshot(err.to_string())
    }
}
