//! HTTP-backed interpreter client

use std::time::Duration;

use async_trait::async_trait;
use pagepilot_core_types::AutomationError;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::BridgeError;
use crate::model::{ExtractRequest, ProposeRequest};
use crate::ports::InterpreterPort;

/// Client for a sidecar service that wraps the actual language model.
/// Request/response bodies follow the collaborator contract: JSON in, JSON
/// out, with `/propose` answering action planning and `/extract` answering
/// structured extraction. The body is returned as-is; validation happens in
/// the caller.
pub struct HttpInterpreter {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpInterpreter {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AutomationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| BridgeError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    async fn post(&self, path: &str, body: &impl serde::Serialize) -> Result<Value, AutomationError> {
        let url = format!("{}/{path}", self.endpoint);
        debug!(%url, "sending interpreter request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    BridgeError::Timeout(self.timeout.as_millis() as u64)
                } else {
                    BridgeError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Status(status.as_u16()).into());
        }

        let value = response
            .json::<Value>()
            .await
            .map_err(|err| BridgeError::Decode(err.to_string()))?;
        Ok(value)
    }
}

#[async_trait]
impl InterpreterPort for HttpInterpreter {
    #[instrument(skip_all, fields(instruction = %request.instruction))]
    async fn propose_action(&self, request: &ProposeRequest) -> Result<Value, AutomationError> {
        self.post("propose", request).await
    }

    #[instrument(skip_all, fields(instruction = %request.instruction))]
    async fn extract_value(&self, request: &ExtractRequest) -> Result<Value, AutomationError> {
        self.post("extract", request).await
    }
}
