//! Error types local to the executor

use pagepilot_core_types::AutomationError;
use serde_json::Value;
use thiserror::Error;

/// Executor-local failures, converted into the shared taxonomy at the
/// boundary.
#[derive(Debug, Error, Clone)]
pub enum ExecError {
    #[error("unknown key name '{0}'")]
    UnknownKey(String),

    #[error("scroll argument '{0}' is neither a percentage nor a known label")]
    BadScrollTarget(String),

    #[error("semantic scroll target '{0}' is not supported without a target resolver")]
    NoTargetResolver(String),

    #[error("action cancelled")]
    Cancelled,
}

impl From<ExecError> for AutomationError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::UnknownKey(key) => AutomationError::InvalidProposal {
                reason: format!("unknown key name '{key}'"),
                payload: Value::String(key),
            },
            ExecError::BadScrollTarget(arg) => AutomationError::InvalidProposal {
                reason: format!("unusable scroll argument '{arg}'"),
                payload: Value::String(arg),
            },
            ExecError::NoTargetResolver(label) => {
                AutomationError::DriverError(format!("no resolver for scroll target '{label}'"))
            }
            ExecError::Cancelled => AutomationError::Timeout {
                operation: "action cancelled".into(),
                waited_ms: 0,
            },
        }
    }
}
