//! Core types for the locator system

use std::fmt;

use pagepilot_core_types::{NodeId, SnapshotId};
use serde::{Deserialize, Serialize};

/// One step of a structural path: descend into the `index`-th child sharing
/// `tag` (0-based) under the previous step's element.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub tag: String,
    pub index: usize,
}

impl PathStep {
    pub fn new(tag: impl Into<String>, index: usize) -> Self {
        Self {
            tag: tag.into(),
            index,
        }
    }
}

/// Durable structural locator derived from a `NodeId`: the full `{tag,
/// sibling-index}` path from the document root, in root-to-leaf order.
///
/// Carries the version tag of the snapshot it was derived from; resolving a
/// node against a different snapshot is a caller error and is rejected.
/// Re-resolving against a mutated document may fail (node removed) or land
/// on a different live element (node moved) - a staleness risk owned by the
/// caller, not an error in this layer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocator {
    pub snapshot: SnapshotId,
    pub node: NodeId,
    pub steps: Vec<PathStep>,
}

impl ResolvedLocator {
    /// XPath-style rendering of the path, with 1-based positions.
    pub fn to_xpath(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push('/');
            out.push_str(&step.tag);
            out.push_str(&format!("[{}]", step.index + 1));
        }
        out
    }

    /// Tag name of the target element (last path step).
    pub fn leaf_tag(&self) -> &str {
        self.steps
            .last()
            .map(|step| step.tag.as_str())
            .unwrap_or_default()
    }
}

impl fmt::Display for ResolvedLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.to_xpath(), self.snapshot.0)
    }
}

/// Opaque reference to a live element, minted by the driver-side `DomPort`
/// when a path step matches.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub String);
