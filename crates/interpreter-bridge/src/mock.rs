//! Deterministic interpreter used for tests and offline development.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pagepilot_core_types::AutomationError;
use serde_json::{json, Value};

use crate::errors::BridgeError;
use crate::model::{ActionMethod, ExtractRequest, ProposeRequest};
use crate::ports::InterpreterPort;

/// Keyword-driven stand-in for the real language model. Deterministic for a
/// given (instruction, outline) pair, and it counts propose calls so tests
/// can assert the cache short-circuits repeated interpretation.
#[derive(Debug, Default)]
pub struct MockInterpreter {
    propose_calls: AtomicUsize,
}

struct OutlineEntry {
    id: String,
    role: String,
    name: String,
}

impl MockInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of propose requests served so far.
    pub fn propose_calls(&self) -> usize {
        self.propose_calls.load(Ordering::SeqCst)
    }

    fn parse_outline(outline: &str) -> Vec<OutlineEntry> {
        outline
            .lines()
            .filter_map(|line| {
                let line = line.trim_start();
                let rest = line.strip_prefix('[')?;
                let (id, rest) = rest.split_once(']')?;
                let rest = rest.trim();
                let (role, name) = match rest.split_once(' ') {
                    Some((role, name)) => (role, name.trim().trim_matches('"')),
                    None => (rest, ""),
                };
                Some(OutlineEntry {
                    id: id.to_string(),
                    role: role.to_string(),
                    name: name.to_string(),
                })
            })
            .collect()
    }

    fn method_for(instruction: &str) -> ActionMethod {
        let lowered = instruction.to_lowercase();
        if lowered.starts_with("type") {
            ActionMethod::Type
        } else if lowered.starts_with("fill") || lowered.starts_with("enter") {
            ActionMethod::Fill
        } else if lowered.starts_with("select") || lowered.starts_with("choose") {
            ActionMethod::SelectOption
        } else if lowered.starts_with("scroll") {
            ActionMethod::Scroll
        } else if lowered.starts_with("press") {
            ActionMethod::Press
        } else if lowered.starts_with("hover") {
            ActionMethod::Hover
        } else {
            ActionMethod::Click
        }
    }

    fn preferred_roles(method: ActionMethod) -> &'static [&'static str] {
        match method {
            ActionMethod::Type | ActionMethod::Fill | ActionMethod::Press => {
                &["textbox", "searchbox", "combobox"]
            }
            ActionMethod::SelectOption => &["combobox", "listbox"],
            ActionMethod::Click | ActionMethod::Hover => &["button", "link", "checkbox"],
            ActionMethod::Scroll => &["document"],
        }
    }

    fn pick_target<'a>(
        entries: &'a [OutlineEntry],
        instruction: &str,
        method: ActionMethod,
    ) -> Option<&'a OutlineEntry> {
        let lowered = instruction.to_lowercase();
        let roles = Self::preferred_roles(method);

        // A node whose accessible name is mentioned in the instruction wins;
        // otherwise fall back to the first node with a preferred role.
        entries
            .iter()
            .filter(|entry| roles.contains(&entry.role.as_str()))
            .find(|entry| {
                !entry.name.is_empty() && lowered.contains(&entry.name.to_lowercase())
            })
            .or_else(|| {
                entries
                    .iter()
                    .find(|entry| roles.contains(&entry.role.as_str()))
            })
    }

    fn argument_for(instruction: &str, method: ActionMethod) -> Vec<String> {
        match method.arity() {
            0 => Vec::new(),
            _ => {
                // Quoted text takes precedence; otherwise the final word.
                let quoted = instruction
                    .split_once('\'')
                    .and_then(|(_, rest)| rest.split_once('\'').map(|(inner, _)| inner))
                    .or_else(|| {
                        instruction
                            .split_once('"')
                            .and_then(|(_, rest)| rest.split_once('"').map(|(inner, _)| inner))
                    });
                let argument = quoted
                    .map(str::to_string)
                    .or_else(|| {
                        instruction
                            .split_whitespace()
                            .last()
                            .map(|word| word.trim_end_matches(['.', '!']).to_string())
                    })
                    .unwrap_or_default();
                vec![argument]
            }
        }
    }
}

#[async_trait]
impl InterpreterPort for MockInterpreter {
    async fn propose_action(&self, request: &ProposeRequest) -> Result<Value, AutomationError> {
        self.propose_calls.fetch_add(1, Ordering::SeqCst);

        let entries = Self::parse_outline(&request.indexed_tree_summary);
        let method = Self::method_for(&request.instruction);
        let target = Self::pick_target(&entries, &request.instruction, method).ok_or_else(|| {
            AutomationError::from(BridgeError::Decode(format!(
                "no candidate node for instruction '{}'",
                request.instruction
            )))
        })?;

        Ok(json!({
            "targetNodeId": target.id,
            "description": format!("{} \"{}\"", target.role, target.name),
            "method": method.name(),
            "arguments": Self::argument_for(&request.instruction, method),
        }))
    }

    async fn extract_value(&self, request: &ExtractRequest) -> Result<Value, AutomationError> {
        // Offline stand-in: echo the request so callers can see the shape.
        Ok(json!({ "instruction": request.instruction }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLINE: &str = "[0-0] document\n  [0-1] generic\n    [0-2] heading \"Welcome\"\n    [0-3] textbox \"Message\"\n    [0-4] button \"Send\"\n";

    fn request(instruction: &str) -> ProposeRequest {
        ProposeRequest {
            instruction: instruction.to_string(),
            indexed_tree_summary: OUTLINE.to_string(),
            frame: 0,
        }
    }

    #[tokio::test]
    async fn proposes_type_into_named_textbox() {
        let mock = MockInterpreter::new();
        let raw = mock
            .propose_action(&request("Type 'Hello' in the message box"))
            .await
            .unwrap();
        assert_eq!(raw["method"], "type");
        assert_eq!(raw["targetNodeId"], "0-3");
        assert_eq!(raw["arguments"][0], "Hello");
        assert_eq!(mock.propose_calls(), 1);
    }

    #[tokio::test]
    async fn proposes_click_on_button() {
        let mock = MockInterpreter::new();
        let raw = mock
            .propose_action(&request("Click the Send button"))
            .await
            .unwrap();
        assert_eq!(raw["method"], "click");
        assert_eq!(raw["targetNodeId"], "0-4");
        assert_eq!(raw["arguments"].as_array().unwrap().len(), 0);
    }
}
