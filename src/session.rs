//! Caller-facing session surface: `act`, `observe`, `extract`.
//!
//! One session drives one logical page, sequentially. Concurrency happens by
//! running independent sessions; nothing here is shared across them except
//! what the caller chooses to share behind the ports.

use std::sync::Arc;

use action_executor::{execute, ActionReport, DriverPort, ExecCtx, RuntimeDeps, TargetPort};
use action_locator::{re_resolve, resolve, DomPort, ElementHandle, ResolvedLocator};
use async_trait::async_trait;
use extraction_schema::{validate, ExtractionSchema};
use interpreter_bridge::{
    validate_proposal, validate_proposals, ActionProposal, ExtractRequest, InterpreterPort,
    ProposeRequest,
};
use observation_cache::{fingerprint, CacheEntry, ObservationCache};
use pagepilot_core_types::{AutomationError, FrameIndex, SessionId};
use serde_json::Value;
use tracing::{debug, info, instrument};
use tree_indexer::{index, AccessibilityNode, IndexedSnapshot};

use crate::config::Settings;

/// Capture boundary: deliver the current accessibility tree of a frame. The
/// CLI reads it from a file; a real deployment captures from the browser.
#[async_trait]
pub trait SnapshotPort: Send + Sync {
    async fn capture(&self, frame: FrameIndex) -> Result<AccessibilityNode, AutomationError>;
}

/// Input to `act`: either a fresh instruction, or a proposal returned by an
/// earlier `observe`/`act`, which skips the interpreter entirely.
#[derive(Clone, Debug)]
pub enum ActRequest {
    Instruction(String),
    Cached(ActionProposal),
}

/// What one `act` call did.
#[derive(Clone, Debug)]
pub struct ActionOutcome {
    pub proposal: ActionProposal,
    pub report: ActionReport,
    pub from_cache: bool,
}

/// One automation session over a page.
pub struct Session {
    id: SessionId,
    frame: FrameIndex,
    interpreter: Arc<dyn InterpreterPort>,
    driver: Arc<dyn DriverPort>,
    dom: Arc<dyn DomPort>,
    snapshots: Arc<dyn SnapshotPort>,
    cache: ObservationCache,
    settings: Settings,
}

impl Session {
    pub fn new(
        interpreter: Arc<dyn InterpreterPort>,
        driver: Arc<dyn DriverPort>,
        dom: Arc<dyn DomPort>,
        snapshots: Arc<dyn SnapshotPort>,
        settings: Settings,
    ) -> Self {
        Self {
            id: SessionId::new(),
            frame: 0,
            interpreter,
            driver,
            dom,
            snapshots,
            cache: ObservationCache::new(settings.cache_ttl()),
            settings,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn cache(&self) -> &ObservationCache {
        &self.cache
    }

    async fn capture_indexed(&self) -> Result<IndexedSnapshot, AutomationError> {
        let root = self.snapshots.capture(self.frame).await?;
        index(&root, self.frame)
    }

    /// Plan without acting: every proposal the interpreter offers for the
    /// instruction, validated and with descriptions resolved from the tree.
    #[instrument(skip_all, fields(session = %self.id.0))]
    pub async fn observe(
        &self,
        instruction: &str,
    ) -> Result<Vec<ActionProposal>, AutomationError> {
        let snapshot = self.capture_indexed().await?;
        let raw = self
            .interpreter
            .propose_action(&ProposeRequest {
                instruction: instruction.to_string(),
                indexed_tree_summary: snapshot.outline(),
                frame: self.frame,
            })
            .await?;
        let mut proposals = validate_proposals(&raw)?;
        for proposal in &mut proposals {
            if proposal.description.is_empty() {
                if let Some(node) = snapshot.get(proposal.target_node_id) {
                    proposal.description = format!("{} \"{}\"", node.role, node.name);
                }
            }
        }
        Ok(proposals)
    }

    /// Perform one action. Instructions go through fingerprint and cache
    /// before the interpreter; cached proposals skip straight to resolution
    /// and execution.
    #[instrument(skip_all, fields(session = %self.id.0))]
    pub async fn act(&self, request: ActRequest) -> Result<ActionOutcome, AutomationError> {
        let snapshot = self.capture_indexed().await?;

        let (proposal, locator, from_cache) = match request {
            ActRequest::Cached(proposal) => {
                let locator = resolve(proposal.target_node_id, &snapshot)?;
                (proposal, locator, true)
            }
            ActRequest::Instruction(instruction) => {
                self.plan(&instruction, &snapshot).await?
            }
        };

        info!(
            method = proposal.method.name(),
            target = %proposal.target_node_id,
            from_cache,
            "executing action"
        );

        let policy = self.settings.executor_policy();
        let ctx = ExecCtx::with_timeout(policy.default_timeout);
        let target = LabeledTarget {
            snapshots: self.snapshots.clone(),
            dom: self.dom.clone(),
            frame: self.frame,
        };
        let report = execute(
            &ctx,
            &proposal,
            &locator,
            RuntimeDeps {
                driver: self.driver.as_ref(),
                dom: self.dom.as_ref(),
                target: Some(&target),
                policy: &policy,
            },
        )
        .await;

        Ok(ActionOutcome {
            proposal,
            report,
            from_cache,
        })
    }

    /// Instruction path: cache lookup, interpreter on miss, store on first
    /// successful resolution.
    async fn plan(
        &self,
        instruction: &str,
        snapshot: &IndexedSnapshot,
    ) -> Result<(ActionProposal, ResolvedLocator, bool), AutomationError> {
        let key = fingerprint(instruction, snapshot, self.settings.cache.fingerprint_depth);

        if let Some(entry) = self.cache.lookup(&key, None) {
            debug!(fingerprint = %key, "observation cache hit");
            let locator = match entry.locator {
                Some(locator) => locator,
                None => resolve(entry.proposal.target_node_id, snapshot)?,
            };
            return Ok((entry.proposal, locator, true));
        }

        let raw = self
            .interpreter
            .propose_action(&ProposeRequest {
                instruction: instruction.to_string(),
                indexed_tree_summary: snapshot.outline(),
                frame: self.frame,
            })
            .await?;
        // One proposal per act call; an array response contributes its first
        // element only.
        let raw = match raw {
            Value::Array(items) => items.into_iter().next().ok_or_else(|| {
                AutomationError::InvalidProposal {
                    reason: "interpreter returned an empty proposal array".into(),
                    payload: Value::Array(Vec::new()),
                }
            })?,
            other => other,
        };
        let proposal = validate_proposal(&raw)?;
        let locator = resolve(proposal.target_node_id, snapshot)?;

        self.cache.store(CacheEntry::new(
            key,
            proposal.clone(),
            Some(locator.clone()),
        ));
        Ok((proposal, locator, false))
    }

    /// Structured extraction, strictly validated against `schema`.
    #[instrument(skip_all, fields(session = %self.id.0))]
    pub async fn extract(
        &self,
        instruction: &str,
        schema: &ExtractionSchema,
    ) -> Result<Value, AutomationError> {
        let snapshot = self.capture_indexed().await?;
        let schema_hint =
            serde_json::to_value(schema).map_err(|err| AutomationError::SchemaMismatch {
                field: "$".into(),
                reason: format!("schema is not serializable: {err}"),
            })?;
        let raw = self
            .interpreter
            .extract_value(&ExtractRequest {
                instruction: instruction.to_string(),
                indexed_tree_summary: snapshot.outline(),
                schema_hint,
            })
            .await?;
        Ok(validate(schema, &raw)?)
    }
}

/// Semantic scroll targets ("footer", "comments") routed back through the
/// indexer and resolver against a fresh capture.
struct LabeledTarget {
    snapshots: Arc<dyn SnapshotPort>,
    dom: Arc<dyn DomPort>,
    frame: FrameIndex,
}

#[async_trait]
impl TargetPort for LabeledTarget {
    async fn resolve_labeled(&self, label: &str) -> Result<ElementHandle, AutomationError> {
        let root = self.snapshots.capture(self.frame).await?;
        let snapshot = index(&root, self.frame)?;
        let lowered = label.to_lowercase();

        let target = snapshot
            .node_ids()
            .filter_map(|id| snapshot.get(id))
            .find(|node| {
                node.role == lowered
                    || (!node.name.is_empty() && node.name.to_lowercase().contains(&lowered))
            })
            .map(|node| node.id)
            .ok_or_else(|| {
                AutomationError::DriverError(format!("no element labeled '{label}'"))
            })?;

        let locator = resolve(target, &snapshot)?;
        re_resolve(&locator, self.dom.as_ref()).await
    }
}
