//! Keystroke cadence for the type method
//!
//! Per-character delays drawn uniformly from a bounded range, so typed input
//! looks like human cadence to sites that gate on input-event timing
//! (anti-bot heuristics, autosuggest triggers, onInput side effects).

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

/// One planned key stroke.
#[derive(Clone, Debug)]
pub struct TypingStep {
    pub ch: char,
    pub delay: Duration,
}

/// Full typing plan for one text argument.
#[derive(Clone, Debug, Default)]
pub struct TypingPlan {
    pub steps: Vec<TypingStep>,
}

impl TypingPlan {
    pub fn total_delay(&self) -> Duration {
        self.steps.iter().map(|step| step.delay).sum()
    }
}

/// Build a plan with one step per character and a randomized delay within
/// `bounds` (milliseconds) before each stroke.
pub fn build_plan<R: Rng>(text: &str, bounds: &RangeInclusive<u64>, rng: &mut R) -> TypingPlan {
    let steps = text
        .chars()
        .map(|ch| TypingStep {
            ch,
            delay: Duration::from_millis(rng.gen_range(bounds.clone())),
        })
        .collect();
    TypingPlan { steps }
}
