//! Snapshot data model

use std::collections::HashMap;
use std::fmt::Write as _;

use pagepilot_core_types::{FrameIndex, NodeId, SnapshotId};
use serde::{Deserialize, Serialize};

/// One node of a captured accessibility tree, as delivered by the capture
/// boundary. Immutable once a snapshot is taken; a fresh capture is a fresh
/// tree.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccessibilityNode {
    /// Semantic category: button, textbox, link, ...
    pub role: String,

    /// Accessible name, empty when the element carries none.
    #[serde(default)]
    pub name: String,

    /// Accessible description, when present.
    #[serde(default)]
    pub description: Option<String>,

    /// Backing element tag name, recorded at capture time. Required to
    /// derive the structural locator path.
    pub tag: String,

    /// Ordered children in DOM order.
    #[serde(default)]
    pub children: Vec<AccessibilityNode>,
}

/// A node after indexing: flattened into the snapshot arena with parent and
/// child links expressed as arena offsets.
#[derive(Clone, Debug)]
pub struct IndexedNode {
    pub id: NodeId,
    pub role: String,
    pub name: String,
    pub description: Option<String>,
    pub tag: String,
    pub depth: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// An indexed accessibility snapshot: the arena of nodes, the reverse
/// `NodeId -> offset` index, and a version tag. Node ids are only meaningful
/// against the snapshot that assigned them; the tag lets downstream layers
/// enforce that.
#[derive(Clone, Debug)]
pub struct IndexedSnapshot {
    pub id: SnapshotId,
    pub frame: FrameIndex,
    nodes: Vec<IndexedNode>,
    offsets: HashMap<NodeId, usize>,
}

impl IndexedSnapshot {
    pub(crate) fn new(frame: FrameIndex, nodes: Vec<IndexedNode>) -> Self {
        let offsets = nodes
            .iter()
            .enumerate()
            .map(|(offset, node)| (node.id, offset))
            .collect();
        Self {
            id: SnapshotId::new(),
            frame,
            nodes,
            offsets,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &IndexedNode {
        &self.nodes[0]
    }

    pub fn get(&self, id: NodeId) -> Option<&IndexedNode> {
        self.offsets.get(&id).map(|offset| &self.nodes[*offset])
    }

    pub fn node_at(&self, offset: usize) -> &IndexedNode {
        &self.nodes[offset]
    }

    /// Arena offsets from the root down to `id`, inclusive on both ends.
    /// None when the id does not belong to this snapshot.
    pub fn ancestor_chain(&self, id: NodeId) -> Option<Vec<usize>> {
        let mut offset = *self.offsets.get(&id)?;
        let mut chain = vec![offset];
        while let Some(parent) = self.nodes[offset].parent {
            chain.push(parent);
            offset = parent;
        }
        chain.reverse();
        Some(chain)
    }

    /// Pre-order `(role, name)` pairs restricted to nodes shallower than
    /// `depth_limit`. This is the structural input to cache fingerprinting;
    /// bounding the depth keeps fingerprints stable under unrelated deep
    /// mutations.
    pub fn role_name_pairs(&self, depth_limit: usize) -> Vec<(String, String)> {
        self.nodes
            .iter()
            .filter(|node| node.depth < depth_limit)
            .map(|node| (node.role.clone(), node.name.clone()))
            .collect()
    }

    /// Compact `[id] role "name"` outline for interpreter prompts, one line
    /// per node, indented by depth.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            let _ = write!(out, "{:indent$}[{}] {}", "", node.id, node.role, indent = node.depth * 2);
            if !node.name.is_empty() {
                let _ = write!(out, " \"{}\"", node.name);
            }
            out.push('\n');
        }
        out
    }

    /// All node ids in assignment (pre-order) order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|node| node.id)
    }
}
