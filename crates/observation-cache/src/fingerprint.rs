//! Pure, deterministic fingerprint computation

use serde_json::json;
use sha2::{Digest, Sha256};
use tree_indexer::IndexedSnapshot;

use crate::model::Fingerprint;

/// Default structural depth bound. Eight levels cover the chrome of typical
/// pages (document, landmarks, sections, widgets) while leaving deep content
/// churn out of the key. Tunable via configuration.
pub const DEFAULT_DEPTH_LIMIT: usize = 8;

/// Normalized instruction form: trimmed, case-folded, inner whitespace
/// collapsed to single spaces.
pub fn normalize_instruction(instruction: &str) -> String {
    instruction
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compute the cache key for `(instruction, snapshot)`. Pure and
/// deterministic: identical instructions against structurally equivalent
/// pages always produce the same fingerprint, so unchanged pages never miss.
pub fn fingerprint(
    instruction: &str,
    snapshot: &IndexedSnapshot,
    depth_limit: usize,
) -> Fingerprint {
    let structure: Vec<[String; 2]> = snapshot
        .role_name_pairs(depth_limit)
        .into_iter()
        .map(|(role, name)| [role, name])
        .collect();

    let canonical = json!({
        "instruction": normalize_instruction(instruction),
        "frame": snapshot.frame,
        "structure": structure,
    });

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string().as_bytes());
    Fingerprint(hex::encode(hasher.finalize()))
}
