//! Interpreter collaborator boundary

use async_trait::async_trait;
use pagepilot_core_types::AutomationError;
use serde_json::Value;

use crate::model::{ExtractRequest, ProposeRequest};

/// Abstraction over the language-understanding collaborator so multiple
/// backends (HTTP sidecar, mock) can plug into the pipeline.
///
/// Both methods return raw `serde_json::Value`: the response is untrusted
/// until it passes local validation (`validate_proposal`, or schema
/// validation for extraction). Implementations must not validate.
#[async_trait]
pub trait InterpreterPort: Send + Sync {
    /// Ask for a structured action matching the instruction. The response
    /// may be a single proposal object or an ordered array of them.
    async fn propose_action(&self, request: &ProposeRequest) -> Result<Value, AutomationError>;

    /// Ask for structured data conforming to the schema hint.
    async fn extract_value(&self, request: &ExtractRequest) -> Result<Value, AutomationError>;
}
