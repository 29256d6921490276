//! Key-name normalization for the press method

/// Recognized named keys, in driver spelling.
const NAMED_KEYS: &[&str] = &[
    "Enter",
    "Tab",
    "Escape",
    "Backspace",
    "Delete",
    "Space",
    "Home",
    "End",
    "PageUp",
    "PageDown",
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "Shift",
    "Control",
    "Alt",
    "Meta",
];

/// Map a proposal key-name argument to the driver's spelling.
/// Case-insensitive for named keys; single printable characters pass
/// through as-is. Unknown names return `None` and must be surfaced as
/// `InvalidProposal` by the caller.
pub fn normalize_key(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().count() == 1 {
        return Some(trimmed.to_string());
    }

    NAMED_KEYS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(trimmed))
        .map(|known| known.to_string())
}
