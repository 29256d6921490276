//! Executor tuning knobs

use std::ops::RangeInclusive;
use std::time::Duration;

/// Runtime policy view consulted by the runner. Defaults match the
/// documented behavior; callers override through configuration.
#[derive(Clone, Debug)]
pub struct ExecutorPolicy {
    /// Inter-keystroke delay bounds for the `type` method, in milliseconds.
    /// Randomized per keystroke to simulate human input cadence.
    pub keystroke_delay_ms: RangeInclusive<u64>,

    /// Poll interval while waiting for an element to become actionable.
    pub actionable_poll: Duration,

    /// Bounded wait before the single resolve retry.
    pub resolve_retry_wait: Duration,

    /// Default per-action timeout when the caller supplies none.
    pub default_timeout: Duration,
}

impl Default for ExecutorPolicy {
    fn default() -> Self {
        Self {
            keystroke_delay_ms: 25..=75,
            actionable_poll: Duration::from_millis(50),
            resolve_retry_wait: Duration::from_millis(150),
            default_timeout: Duration::from_secs(10),
        }
    }
}
