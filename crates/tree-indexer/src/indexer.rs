//! Depth-first pre-order id assignment

use pagepilot_core_types::{AutomationError, FrameIndex, NodeId};
use tracing::debug;

use crate::errors::IndexError;
use crate::model::{AccessibilityNode, IndexedNode, IndexedSnapshot};

/// Index a captured accessibility tree for `frame`. Ids are assigned
/// depth-first pre-order, stable with respect to DOM order, so re-running on
/// an unchanged tree reproduces identical ids.
///
/// Fails with `InvalidSnapshot` when the tree is empty or a node is missing
/// its role or tag.
pub fn index(root: &AccessibilityNode, frame: FrameIndex) -> Result<IndexedSnapshot, AutomationError> {
    if root.role.is_empty() && root.name.is_empty() && root.children.is_empty() {
        return Err(IndexError::EmptyTree.into());
    }

    let mut nodes: Vec<IndexedNode> = Vec::new();
    // Work stack of (raw node, parent offset, depth, tree path for errors).
    let mut stack: Vec<(&AccessibilityNode, Option<usize>, usize, String)> =
        vec![(root, None, 0, "/0".to_string())];

    while let Some((raw, parent, depth, path)) = stack.pop() {
        if raw.role.is_empty() {
            return Err(IndexError::MissingRole { path }.into());
        }
        if raw.tag.is_empty() {
            return Err(IndexError::MissingTag { path }.into());
        }

        let offset = nodes.len();
        nodes.push(IndexedNode {
            id: NodeId::new(frame, offset as u32),
            role: raw.role.clone(),
            name: raw.name.clone(),
            description: raw.description.clone(),
            tag: raw.tag.clone(),
            depth,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            nodes[parent].children.push(offset);
        }

        // Reversed push keeps pre-order: the first child is popped next.
        for (child_pos, child) in raw.children.iter().enumerate().rev() {
            stack.push((child, Some(offset), depth + 1, format!("{path}/{child_pos}")));
        }
    }

    let snapshot = IndexedSnapshot::new(frame, nodes);
    debug!(frame, nodes = snapshot.len(), snapshot = %snapshot.id.0, "indexed accessibility tree");
    Ok(snapshot)
}
