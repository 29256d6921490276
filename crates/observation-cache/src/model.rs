//! Cache entry shapes

use action_locator::ResolvedLocator;
use chrono::{DateTime, Utc};
use interpreter_bridge::ActionProposal;
use serde::{Deserialize, Serialize};

/// Deterministic cache key: hex-encoded digest over the normalized
/// instruction and the depth-bounded page structure.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One cached resolution. Created on first successful resolution, read on
/// repeat calls, never mutated. Serializable so callers can persist the
/// cache externally, keyed by fingerprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub proposal: ActionProposal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<ResolvedLocator>,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(
        fingerprint: Fingerprint,
        proposal: ActionProposal,
        locator: Option<ResolvedLocator>,
    ) -> Self {
        Self {
            fingerprint,
            proposal,
            locator,
            created_at: Utc::now(),
        }
    }
}
