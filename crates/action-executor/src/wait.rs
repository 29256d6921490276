//! Bounded actionability wait

use std::time::Instant;

use action_locator::ElementHandle;
use pagepilot_core_types::AutomationError;
use tracing::debug;

use crate::errors::ExecError;
use crate::model::ExecCtx;
use crate::policy::ExecutorPolicy;
use crate::ports::DriverPort;

/// Wait until the element is attached, visible, enabled, and positionally
/// stable across two consecutive probes. Bounded by the context deadline;
/// honors cancellation at every poll. This is a suspension point, not a
/// blocking spin.
pub async fn until_actionable(
    driver: &dyn DriverPort,
    element: &ElementHandle,
    ctx: &ExecCtx,
    policy: &ExecutorPolicy,
) -> Result<(), AutomationError> {
    let started = Instant::now();
    let mut last_position: Option<(f64, f64)> = None;

    loop {
        if ctx.cancel.is_cancelled() {
            return Err(ExecError::Cancelled.into());
        }
        if ctx.remaining().is_zero() {
            return Err(AutomationError::Timeout {
                operation: "waiting for element to become actionable".into(),
                waited_ms: started.elapsed().as_millis() as u64,
            });
        }

        let probe = driver.probe(element).await?;
        if probe.interactable() {
            if last_position == Some(probe.position) {
                return Ok(());
            }
            // One matching pair of probes rules out mid-animation targets.
            last_position = Some(probe.position);
        } else {
            debug!(?probe, "element not yet actionable");
            last_position = None;
        }

        tokio::time::sleep(policy.actionable_poll.min(ctx.remaining())).await;
    }
}
