//! Settings loading: defaults in code, JSON file, environment overrides.

use std::path::Path;
use std::time::Duration;

use action_executor::ExecutorPolicy;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Interpreter backend selection and limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterpreterSettings {
    /// Base URL of the HTTP interpreter sidecar; the deterministic mock is
    /// used when absent.
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: 10_000,
        }
    }
}

/// Observation cache knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheSettings {
    pub ttl_ms: u64,
    pub fingerprint_depth: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_ms: 300_000,
            fingerprint_depth: observation_cache::DEFAULT_DEPTH_LIMIT,
        }
    }
}

/// Executor knobs, mirroring `ExecutorPolicy`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutorSettings {
    pub keystroke_delay_min_ms: u64,
    pub keystroke_delay_max_ms: u64,
    pub actionable_poll_ms: u64,
    pub resolve_retry_wait_ms: u64,
    pub action_timeout_ms: u64,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            keystroke_delay_min_ms: 25,
            keystroke_delay_max_ms: 75,
            actionable_poll_ms: 50,
            resolve_retry_wait_ms: 150,
            action_timeout_ms: 10_000,
        }
    }
}

/// Full application settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub interpreter: InterpreterSettings,
    pub cache: CacheSettings,
    pub executor: ExecutorSettings,
}

impl Settings {
    /// Load settings: code defaults, then the JSON file when present, then
    /// `PAGEPILOT_*` environment overrides.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match config_file {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            _ => Settings::default(),
        };
        settings.apply_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Apply environment-style overrides through a lookup function, so the
    /// merge logic stays testable without touching process environment.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("PAGEPILOT_ENDPOINT") {
            self.interpreter.endpoint = Some(endpoint);
        }
        override_number(&lookup, "PAGEPILOT_INTERPRETER_TIMEOUT_MS", &mut self.interpreter.timeout_ms);
        override_number(&lookup, "PAGEPILOT_CACHE_TTL_MS", &mut self.cache.ttl_ms);
        override_number(&lookup, "PAGEPILOT_FINGERPRINT_DEPTH", &mut self.cache.fingerprint_depth);
        override_number(&lookup, "PAGEPILOT_KEYSTROKE_MIN_MS", &mut self.executor.keystroke_delay_min_ms);
        override_number(&lookup, "PAGEPILOT_KEYSTROKE_MAX_MS", &mut self.executor.keystroke_delay_max_ms);
        override_number(&lookup, "PAGEPILOT_ACTION_TIMEOUT_MS", &mut self.executor.action_timeout_ms);
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache.ttl_ms)
    }

    /// Executor policy view of these settings. An inverted delay range is
    /// collapsed to its lower bound rather than rejected.
    pub fn executor_policy(&self) -> ExecutorPolicy {
        let min = self.executor.keystroke_delay_min_ms;
        let max = self.executor.keystroke_delay_max_ms.max(min);
        ExecutorPolicy {
            keystroke_delay_ms: min..=max,
            actionable_poll: Duration::from_millis(self.executor.actionable_poll_ms),
            resolve_retry_wait: Duration::from_millis(self.executor.resolve_retry_wait_ms),
            default_timeout: Duration::from_millis(self.executor.action_timeout_ms),
        }
    }
}

fn override_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    slot: &mut T,
) {
    if let Some(raw) = lookup(name) {
        if let Ok(value) = raw.parse() {
            *slot = value;
        }
    }
}
