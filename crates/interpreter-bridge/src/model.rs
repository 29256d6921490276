//! Proposal and request shapes

use pagepilot_core_types::{FrameIndex, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed action method enumeration. Unknown wire variants are rejected
/// outright rather than interpreted best-effort.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionMethod {
    Click,
    Fill,
    Type,
    SelectOption,
    Scroll,
    Press,
    Hover,
}

impl ActionMethod {
    /// Required argument count, per the method arity table.
    pub fn arity(&self) -> usize {
        match self {
            ActionMethod::Click | ActionMethod::Hover => 0,
            ActionMethod::Fill
            | ActionMethod::Type
            | ActionMethod::SelectOption
            | ActionMethod::Scroll
            | ActionMethod::Press => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionMethod::Click => "click",
            ActionMethod::Fill => "fill",
            ActionMethod::Type => "type",
            ActionMethod::SelectOption => "selectOption",
            ActionMethod::Scroll => "scroll",
            ActionMethod::Press => "press",
            ActionMethod::Hover => "hover",
        }
    }
}

/// A validated structured action: target node, human-readable justification,
/// method, and its method-specific string arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionProposal {
    pub target_node_id: NodeId,
    #[serde(default)]
    pub description: String,
    pub method: ActionMethod,
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// Outbound request for action planning: the instruction plus the indexed
/// tree summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeRequest {
    pub instruction: String,
    pub indexed_tree_summary: String,
    pub frame: FrameIndex,
}

/// Outbound request for structured extraction: the instruction, page
/// content, and a hint describing the expected result shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    pub instruction: String,
    pub indexed_tree_summary: String,
    pub schema_hint: Value,
}
