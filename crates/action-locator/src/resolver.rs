//! Structural path derivation and live re-resolution

use pagepilot_core_types::{AutomationError, NodeId};
use tracing::{debug, warn};
use tree_indexer::IndexedSnapshot;

use crate::errors::LocatorError;
use crate::ports::DomPort;
use crate::types::{ElementHandle, PathStep, ResolvedLocator};

/// Derive the durable structural path for `node` from `snapshot`.
///
/// Walks the ancestor chain recorded at indexing time; each step's position
/// is the node's ordinal among same-tag siblings. Deterministic: the same
/// `(node, snapshot)` pair always yields the same path.
pub fn resolve(node: NodeId, snapshot: &IndexedSnapshot) -> Result<ResolvedLocator, AutomationError> {
    let chain = snapshot
        .ancestor_chain(node)
        .ok_or(LocatorError::UnknownNode {
            node,
            snapshot: snapshot.id.clone(),
        })?;

    let mut steps = Vec::with_capacity(chain.len());
    for offset in chain {
        let current = snapshot.node_at(offset);
        let index = match current.parent {
            None => 0,
            Some(parent) => {
                let siblings = &snapshot.node_at(parent).children;
                if !siblings.contains(&offset) {
                    return Err(LocatorError::BrokenChain {
                        node,
                        reason: format!("node {} is not listed under its parent", current.id),
                    }
                    .into());
                }
                siblings
                    .iter()
                    .take_while(|sibling| **sibling != offset)
                    .filter(|sibling| snapshot.node_at(**sibling).tag == current.tag)
                    .count()
            }
        };
        steps.push(PathStep::new(current.tag.clone(), index));
    }

    let locator = ResolvedLocator {
        snapshot: snapshot.id.clone(),
        node,
        steps,
    };
    debug!(node = %node, path = %locator.to_xpath(), "resolved structural path");
    Ok(locator)
}

/// Re-walk `locator` against the current document. Fails with `StaleLocator`
/// as soon as a step has no matching live element - the caller-visible signal
/// that a cached action needs re-observation.
pub async fn re_resolve(
    locator: &ResolvedLocator,
    dom: &dyn DomPort,
) -> Result<ElementHandle, AutomationError> {
    let mut current: Option<ElementHandle> = None;
    for (step_pos, step) in locator.steps.iter().enumerate() {
        let next = dom
            .query_step(current.as_ref(), &step.tag, step.index)
            .await?;
        match next {
            Some(handle) => current = Some(handle),
            None => {
                warn!(path = %locator.to_xpath(), step = step_pos, "locator went stale");
                return Err(LocatorError::Stale {
                    path: locator.to_xpath(),
                    step: step_pos,
                }
                .into());
            }
        }
    }
    current.ok_or_else(|| {
        LocatorError::Stale {
            path: locator.to_xpath(),
            step: 0,
        }
        .into()
    })
}
