//! Execution context, state machine, and report shapes

use std::time::{Duration, Instant};

use pagepilot_core_types::{ActionId, AutomationError};
use tokio_util::sync::CancellationToken;

/// Execution context supplied by the caller: identity, absolute deadline,
/// and a cancellation handle honored at every suspension point.
#[derive(Clone, Debug)]
pub struct ExecCtx {
    pub action_id: ActionId,
    pub deadline: Instant,
    pub cancel: CancellationToken,
}

impl ExecCtx {
    pub fn new(action_id: ActionId, deadline: Instant, cancel: CancellationToken) -> Self {
        Self {
            action_id,
            deadline,
            cancel,
        }
    }

    /// Context with a relative timeout and a fresh cancellation token.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(
            ActionId::new(),
            Instant::now() + timeout,
            CancellationToken::new(),
        )
    }

    pub fn remaining(&self) -> Duration {
        self.deadline
            .checked_duration_since(Instant::now())
            .unwrap_or(Duration::ZERO)
    }

    pub fn expired(&self) -> bool {
        self.cancel.is_cancelled() || Instant::now() >= self.deadline
    }
}

/// Why an action ended in `Failed`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailCause {
    /// Cached locator no longer matches the live document; re-observe.
    Stale,
    /// Node could not be resolved against its snapshot.
    Unresolvable,
    /// Deadline or bounded wait elapsed, or the run was cancelled.
    Timeout,
    /// The primitive driver reported an error.
    Driver,
    /// The proposal itself is unusable (e.g. unknown key name).
    InvalidProposal,
    /// selectOption argument matched neither text nor value.
    OptionNotFound,
    /// Snapshot-level contract violation.
    InvalidSnapshot,
    /// Extraction schema violation (not produced by the executor itself).
    SchemaMismatch,
}

impl From<&AutomationError> for FailCause {
    fn from(err: &AutomationError) -> Self {
        match err {
            AutomationError::StaleLocator { .. } => FailCause::Stale,
            AutomationError::UnresolvableNode { .. } => FailCause::Unresolvable,
            AutomationError::Timeout { .. } => FailCause::Timeout,
            AutomationError::DriverError(_) => FailCause::Driver,
            AutomationError::InvalidProposal { .. } => FailCause::InvalidProposal,
            AutomationError::OptionNotFound { .. } => FailCause::OptionNotFound,
            AutomationError::InvalidSnapshot(_) => FailCause::InvalidSnapshot,
            AutomationError::SchemaMismatch { .. } => FailCause::SchemaMismatch,
        }
    }
}

/// Per-action state machine. Only `Succeeded` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionState {
    Pending,
    Resolving,
    Ready,
    Executing,
    Succeeded,
    Failed(FailCause),
}

impl ActionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionState::Succeeded | ActionState::Failed(_))
    }
}

/// Outcome of one executed action.
#[derive(Clone, Debug)]
pub struct ActionReport {
    pub ok: bool,
    pub state: ActionState,
    pub error: Option<AutomationError>,
    pub resolved_path: Option<String>,
    /// Whether the single bounded resolve retry was taken.
    pub resolve_retried: bool,
    /// Keystrokes dispatched (type method only).
    pub keystrokes: u32,
    pub started_at: Instant,
    pub finished_at: Instant,
    pub latency_ms: u128,
}

impl ActionReport {
    pub fn new(started_at: Instant) -> Self {
        Self {
            ok: false,
            state: ActionState::Pending,
            error: None,
            resolved_path: None,
            resolve_retried: false,
            keystrokes: 0,
            started_at,
            finished_at: started_at,
            latency_ms: 0,
        }
    }

    pub fn finish(mut self, finished_at: Instant) -> Self {
        self.finished_at = finished_at;
        self.latency_ms = finished_at
            .saturating_duration_since(self.started_at)
            .as_millis();
        self
    }

    pub(crate) fn fail(mut self, err: AutomationError) -> Self {
        self.state = ActionState::Failed(FailCause::from(&err));
        self.error = Some(err);
        self.finish(Instant::now())
    }
}
