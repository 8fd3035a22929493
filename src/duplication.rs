//! Pieces shared by the duplicate checks.

use serde::Serialize;

/// How the caller should react to a duplicate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Creation must be blocked.
    Hard,
    /// Creation may proceed after the user confirms.
    Soft,
    /// Nothing matched.
    Clear,
}

impl Severity {
    pub fn blocks_creation(self) -> bool {
        self == Severity::Hard
    }

    pub fn requires_confirmation(self) -> bool {
        self == Severity::Soft
    }
}

/// Trims, lowercases and collapses whitespace runs to a single space.
pub fn normalize_label(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Equal after normalization, or, when both normalized labels have at least
/// `min_len` characters, one contains the other.
pub fn labels_similar(a: &str, b: &str, min_len: usize) -> bool {
    let a = normalize_label(a);
    let b = normalize_label(b);

    if a == b {
        return true;
    }

    if a.chars().count() >= min_len && b.chars().count() >= min_len {
        return a.contains(&b) || b.contains(&a);
    }

    false
}
