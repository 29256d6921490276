//! Shared identifiers and the closed error taxonomy used by every
//! PagePilot crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Identifies one logical automation session (one page, one cache).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies a single executed action, for log correlation.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Version tag of one indexed accessibility snapshot. A locator carries the
/// tag of the snapshot it was derived from; mixing snapshots is rejected.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub String);

impl SnapshotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Frame ordinal: 0 for the main frame, positive in discovery order for
/// nested frames.
pub type FrameIndex = u32;

/// Stable per-snapshot node identifier in `frame-sequence` form, e.g. `0-12`.
/// Assigned depth-first pre-order during indexing, so re-indexing an
/// unchanged tree reproduces the same ids.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId {
    pub frame: FrameIndex,
    pub sequence: u32,
}

impl NodeId {
    pub fn new(frame: FrameIndex, sequence: u32) -> Self {
        Self { frame, sequence }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.frame, self.sequence)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> String {
        id.to_string()
    }
}

impl FromStr for NodeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (frame, sequence) = s
            .split_once('-')
            .ok_or_else(|| format!("node id '{s}' is not in frame-sequence form"))?;
        let frame = frame
            .parse::<u32>()
            .map_err(|_| format!("node id '{s}' has a non-numeric frame part"))?;
        let sequence = sequence
            .parse::<u32>()
            .map_err(|_| format!("node id '{s}' has a non-numeric sequence part"))?;
        Ok(Self { frame, sequence })
    }
}

impl TryFrom<String> for NodeId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Closed failure taxonomy of the automation core. Every failure path in the
/// pipeline surfaces one of these variants; nothing is swallowed or collapsed
/// into a generic error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AutomationError {
    /// The captured tree is empty or structurally malformed.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// The node id is absent from the snapshot or an ancestor cannot be
    /// matched positionally.
    #[error("unresolvable node {node}: {reason}")]
    UnresolvableNode { node: NodeId, reason: String },

    /// A previously valid structural path no longer matches the live
    /// document. The caller must re-observe; this layer never re-queries the
    /// interpreter on its own.
    #[error("stale locator: no live element for step {step} of {path}")]
    StaleLocator { path: String, step: usize },

    /// The interpreter collaborator returned a proposal that violates the
    /// method/arity contract. Carries the offending payload for diagnostics.
    #[error("invalid proposal: {reason}")]
    InvalidProposal { reason: String, payload: Value },

    /// selectOption argument matched neither visible text nor option value.
    #[error("option '{requested}' not found among [{}]", available.join(", "))]
    OptionNotFound {
        requested: String,
        available: Vec<String>,
    },

    /// A bounded wait elapsed before the element became actionable or the
    /// driver call completed.
    #[error("timeout after {waited_ms}ms during {operation}")]
    Timeout { operation: String, waited_ms: u64 },

    /// The primitive automation driver reported a failure.
    #[error("driver error: {0}")]
    DriverError(String),

    /// Interpreter output does not conform to the caller-supplied
    /// extraction schema.
    #[error("schema mismatch at '{field}': {reason}")]
    SchemaMismatch { field: String, reason: String },
}

impl AutomationError {
    /// Contract violations by a collaborator or caller; never retried.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AutomationError::InvalidSnapshot(_)
                | AutomationError::InvalidProposal { .. }
                | AutomationError::SchemaMismatch { .. }
        )
    }

    /// Failures that mean a cached resolution went stale and the caller
    /// should re-observe before trying again.
    pub fn needs_reobservation(&self) -> bool {
        matches!(
            self,
            AutomationError::StaleLocator { .. } | AutomationError::UnresolvableNode { .. }
        )
    }
}
