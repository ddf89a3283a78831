//! Fuzzy word matching.
//!
//! This is a positional comparison, not an edit distance: characters are
//! compared index by index over the shorter word and the length gap is added
//! on top. An inserted letter early in a word therefore counts as many
//! mismatches. Existing confidence thresholds are tuned to this behavior.

/// Words whose lengths differ by more than this never fuzzy-match
pub const MAX_LENGTH_GAP: usize = 2;

/// Highest difference count that still counts as a match
pub const MAX_DIFFERENCES: usize = 2;

/// Count positional mismatches over the shared prefix plus the length gap.
///
/// # Arguments
/// * `a` - First word
/// * `b` - Second word
///
/// # Returns
/// Mismatched positions in `min(len a, len b)` plus `|len a - len b|`
pub fn positional_difference(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    let mismatches = a.chars().zip(b.chars()).filter(|(x, y)| x != y).count();

    mismatches + a_len.abs_diff(b_len)
}

/// Check whether a candidate word is close enough to a query token.
pub fn is_fuzzy_match(token: &str, word: &str) -> bool {
    if token.chars().count().abs_diff(word.chars().count()) > MAX_LENGTH_GAP {
        return false;
    }

    positional_difference(token, word) <= MAX_DIFFERENCES
}
