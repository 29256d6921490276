//! Error types for the locator system

use pagepilot_core_types::{AutomationError, NodeId, SnapshotId};
use thiserror::Error;

/// Locator error enumeration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocatorError {
    /// Node id not present in the snapshot it was resolved against.
    #[error("node {node} is not part of snapshot {snapshot}")]
    UnknownNode { node: NodeId, snapshot: SnapshotId },

    /// An ancestor link is broken and the positional path cannot be built.
    #[error("ancestor chain of {node} is broken: {reason}")]
    BrokenChain { node: NodeId, reason: String },

    /// A path step has no matching live element.
    #[error("no live element for step {step} of {path}")]
    Stale { path: String, step: usize },
}

impl From<LocatorError> for AutomationError {
    fn from(err: LocatorError) -> Self {
        match err {
            LocatorError::UnknownNode { node, snapshot } => AutomationError::UnresolvableNode {
                node,
                reason: format!("absent from snapshot {}", snapshot.0),
            },
            LocatorError::BrokenChain { node, reason } => {
                AutomationError::UnresolvableNode { node, reason }
            }
            LocatorError::Stale { path, step } => AutomationError::StaleLocator { path, step },
        }
    }
}
