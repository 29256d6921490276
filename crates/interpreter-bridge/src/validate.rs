//! Local validation of interpreter responses

use pagepilot_core_types::{AutomationError, NodeId};
use serde_json::Value;
use tracing::debug;

use crate::model::{ActionMethod, ActionProposal};

fn invalid(reason: impl Into<String>, payload: &Value) -> AutomationError {
    AutomationError::InvalidProposal {
        reason: reason.into(),
        payload: payload.clone(),
    }
}

/// Validate a single raw proposal object against the closed method
/// enumeration and the arity table. The payload is carried in the error for
/// diagnostics; nothing is coerced or guessed.
pub fn validate_proposal(raw: &Value) -> Result<ActionProposal, AutomationError> {
    let object = raw
        .as_object()
        .ok_or_else(|| invalid("proposal is not a JSON object", raw))?;

    let method_value = object
        .get("method")
        .ok_or_else(|| invalid("proposal is missing 'method'", raw))?;
    let method_name = method_value
        .as_str()
        .ok_or_else(|| invalid("'method' is not a string", raw))?;
    let method: ActionMethod = serde_json::from_value(Value::String(method_name.to_string()))
        .map_err(|_| invalid(format!("unknown method '{method_name}'"), raw))?;

    let target = object
        .get("targetNodeId")
        .ok_or_else(|| invalid("proposal is missing 'targetNodeId'", raw))?;
    let target = target
        .as_str()
        .ok_or_else(|| invalid("'targetNodeId' is not a string", raw))?;
    let target_node_id: NodeId = target
        .parse()
        .map_err(|err: String| invalid(err, raw))?;

    let description = match object.get("description") {
        None => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(_) => return Err(invalid("'description' is not a string", raw)),
    };

    let arguments = match object.get("arguments") {
        None => Vec::new(),
        Some(Value::Array(items)) => {
            let mut arguments = Vec::with_capacity(items.len());
            for (pos, item) in items.iter().enumerate() {
                match item {
                    Value::String(text) => arguments.push(text.clone()),
                    _ => return Err(invalid(format!("argument {pos} is not a string"), raw)),
                }
            }
            arguments
        }
        Some(_) => return Err(invalid("'arguments' is not an array", raw)),
    };

    if arguments.len() != method.arity() {
        return Err(invalid(
            format!(
                "method '{}' takes {} argument(s), got {}",
                method.name(),
                method.arity(),
                arguments.len()
            ),
            raw,
        ));
    }

    debug!(method = method.name(), target = %target_node_id, "validated proposal");
    Ok(ActionProposal {
        target_node_id,
        description,
        method,
        arguments,
    })
}

/// Validate an observe-style response: either one proposal object or an
/// ordered array of them. An empty array is a contract violation.
pub fn validate_proposals(raw: &Value) -> Result<Vec<ActionProposal>, AutomationError> {
    match raw {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(invalid("interpreter returned no proposals", raw));
            }
            items.iter().map(validate_proposal).collect()
        }
        _ => Ok(vec![validate_proposal(raw)?]),
    }
}
