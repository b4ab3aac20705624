//! Liked-most checkbox set <-> comma-joined string field.

use shared::domain::{Choice, LikedOption};

const SEPARATOR: char = ',';

/// Trimmed, non-empty tokens of the stored string, in stored order.
pub fn decode(encoded: &str) -> Vec<&str> {
    encoded
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

pub fn is_selected(encoded: &str, option: LikedOption) -> bool {
    decode(encoded).contains(&option.label())
}

/// Known options present in the stored string, in vocabulary order.
pub fn selected(encoded: &str) -> Vec<LikedOption> {
    let tokens = decode(encoded);
    LikedOption::ALL
        .iter()
        .copied()
        .filter(|option| tokens.contains(&option.label()))
        .collect()
}

/// Joins the options in vocabulary order regardless of the order given.
pub fn encode(options: &[LikedOption]) -> String {
    LikedOption::ALL
        .iter()
        .filter(|option| options.contains(*option))
        .map(|option| option.label())
        .collect::<Vec<_>>()
        .join(",")
}

/// Applies one checkbox change and returns the re-encoded field. Unknown
/// tokens in the input do not survive.
pub fn toggle(encoded: &str, option: LikedOption, checked: bool) -> String {
    let mut current = selected(encoded);
    if checked {
        current.push(option);
    } else {
        current.retain(|existing| *existing != option);
    }
    encode(&current)
}

/// Trims every token and drops empty or repeated ones, keeping the stored
/// order of first occurrence.
pub fn normalize(encoded: &str) -> String {
    let mut seen = Vec::new();
    for token in decode(encoded) {
        if !seen.contains(&token) {
            seen.push(token);
        }
    }
    seen.join(",")
}

/// Known options in vocabulary order, each at most once.
pub fn canonicalize(encoded: &str) -> String {
    encode(&selected(encoded))
}
