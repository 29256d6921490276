//! Observation Cache - skip re-interpretation of repeated instructions
//!
//! Maps a normalized (instruction, page-structure) fingerprint to the action
//! previously resolved for it, so a repeat `act` call goes straight to the
//! executor without touching the interpreter. Fingerprints hash `(role,
//! name)` pairs down to a bounded depth: unrelated deep mutations do not
//! shift the key, structurally different pages almost always do, and the
//! residual false-positive risk is an accepted, tunable tradeoff.
//!
//! Eviction policy is owned by the caller: TTL at read time plus explicit
//! invalidation. Entries are immutable once stored.

pub mod cache;
pub mod fingerprint;
pub mod model;

pub use cache::ObservationCache;
pub use fingerprint::{fingerprint, normalize_instruction, DEFAULT_DEPTH_LIMIT};
pub use model::{CacheEntry, Fingerprint};
