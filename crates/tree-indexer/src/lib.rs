//! Tree Indexer - stable identifiers over accessibility snapshots
//!
//! Takes a captured accessibility tree (root node plus recursive children)
//! and produces the same tree annotated with `NodeId`s plus a flat reverse
//! index. Assignment is depth-first pre-order and deterministic: indexing an
//! unchanged tree twice yields identical ids, which the observation cache
//! relies on for fingerprinting.

pub mod errors;
pub mod indexer;
pub mod model;

pub use errors::IndexError;
pub use indexer::index;
pub use model::{AccessibilityNode, IndexedNode, IndexedSnapshot};
