//! Error types for the interpreter boundary

use pagepilot_core_types::AutomationError;
use serde_json::Value;
use thiserror::Error;

/// Failures talking to or understanding the interpreter collaborator.
/// Transport and decode problems are treated the same way as malformed
/// proposals: a contract violation by the collaborator, surfaced without
/// automatic retry.
#[derive(Debug, Error, Clone)]
pub enum BridgeError {
    #[error("interpreter transport failed: {0}")]
    Transport(String),

    #[error("interpreter returned status {0}")]
    Status(u16),

    #[error("interpreter returned non-JSON payload: {0}")]
    Decode(String),

    #[error("interpreter request timed out after {0}ms")]
    Timeout(u64),
}

impl From<BridgeError> for AutomationError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Timeout(waited_ms) => AutomationError::Timeout {
                operation: "interpreter request".into(),
                waited_ms,
            },
            other => AutomationError::InvalidProposal {
                reason: other.to_string(),
                payload: Value::Null,
            },
        }
    }
}
