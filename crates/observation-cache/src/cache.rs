//! Keyed store over cache entries

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use crate::model::{CacheEntry, Fingerprint};

/// Concurrent fingerprint-keyed store. TTL is enforced at read time with an
/// optional caller override; expired entries are dropped on access. Stored
/// entries are immutable - a second store under the same fingerprint is a
/// no-op, preserving the first resolution.
pub struct ObservationCache {
    entries: DashMap<Fingerprint, CacheEntry>,
    ttl_ms: AtomicU64,
}

impl ObservationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_ms: AtomicU64::new(ttl.as_millis() as u64),
        }
    }

    pub fn set_ttl(&self, ttl: Duration) {
        self.ttl_ms.store(ttl.as_millis() as u64, Ordering::Relaxed);
    }

    /// Look up a live entry, honoring `ttl_override` when supplied.
    pub fn lookup(&self, fingerprint: &Fingerprint, ttl_override: Option<Duration>) -> Option<CacheEntry> {
        let ttl_ms = ttl_override
            .map(|ttl| ttl.as_millis() as u64)
            .unwrap_or_else(|| self.ttl_ms.load(Ordering::Relaxed));

        if let Some(entry) = self.entries.get(fingerprint) {
            let age_ms = Utc::now()
                .signed_duration_since(entry.created_at)
                .num_milliseconds();
            if age_ms >= 0 && (age_ms as u64) <= ttl_ms {
                return Some(entry.clone());
            }
        }
        self.entries.remove(fingerprint);
        None
    }

    /// Insert the first resolution for a fingerprint. Returns false when an
    /// entry already exists (the original is kept).
    pub fn store(&self, entry: CacheEntry) -> bool {
        let fingerprint = entry.fingerprint.clone();
        let mut inserted = false;
        self.entries.entry(fingerprint.clone()).or_insert_with(|| {
            inserted = true;
            entry
        });
        if inserted {
            debug!(%fingerprint, "stored observation");
        }
        inserted
    }

    /// Explicit caller-controlled invalidation.
    pub fn invalidate(&self, fingerprint: &Fingerprint) {
        self.entries.remove(fingerprint);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all live entries, for external persistence.
    pub fn export(&self) -> Vec<CacheEntry> {
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Re-load previously persisted entries. Existing fingerprints keep
    /// their current entry.
    pub fn hydrate(&self, entries: impl IntoIterator<Item = CacheEntry>) {
        for entry in entries {
            self.store(entry);
        }
    }
}
