//! Confidence scoring for candidate food names.

use crate::fuzzy::is_fuzzy_match;

/// Points awarded by each scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchBonus {
    /// Candidate mentions a food category
    Category = 5,
    /// A candidate word fuzzy-matches a search word
    Fuzzy = 10,
    /// Candidate contains a search word
    Word = 20,
    /// Candidate contains the whole query
    Phrase = 50,
}

impl MatchBonus {
    /// Points for this rule
    pub const fn points(self) -> u32 {
        self as u32
    }
}

/// Words that mark a candidate as a food category entry
pub const CATEGORY_WORDS: &[&str] = &[
    "food", "fruit", "vegetable", "meat", "dairy", "grain", "nut", "seed", "spice", "herb",
];

/// Search words shorter than this are ignored
const MIN_SEARCH_WORD_LEN: usize = 3;

/// Split a normalized query into search words.
///
/// Splits on single spaces and keeps words longer than two characters.
pub fn search_words(query: &str) -> impl Iterator<Item = &str> {
    query
        .split(' ')
        .filter(|word| word.chars().count() >= MIN_SEARCH_WORD_LEN)
}

/// Scores candidate names against a normalized query.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceScorer<'a> {
    categories: &'a [&'a str],
}

impl Default for ConfidenceScorer<'static> {
    fn default() -> Self {
        Self::new(CATEGORY_WORDS)
    }
}

impl<'a> ConfidenceScorer<'a> {
    /// Create a scorer with a custom category table
    pub fn new(categories: &'a [&'a str]) -> Self {
        Self { categories }
    }

    /// Score a lower-cased candidate name against a normalized query.
    ///
    /// The score is additive and uncapped:
    /// - the whole query appears in the candidate: +50
    /// - per search word found in the candidate: +20
    /// - otherwise, per search word close to some candidate word: +10
    /// - the candidate mentions any category word: +5 (once)
    pub fn score(&self, query: &str, candidate: &str) -> u32 {
        let mut confidence = 0;

        if candidate.contains(query) {
            confidence += MatchBonus::Phrase.points();
        }

        for word in search_words(query) {
            if candidate.contains(word) {
                confidence += MatchBonus::Word.points();
            } else if candidate.split(' ').any(|c| is_fuzzy_match(word, c)) {
                confidence += MatchBonus::Fuzzy.points();
            }
        }

        if self.categories.iter().any(|c| candidate.contains(c)) {
            confidence += MatchBonus::Category.points();
        }

        confidence
    }
}

/// Score a lower-cased candidate name with the default category table.
///
/// # Arguments
/// * `query` - Normalized query (trimmed, lower-cased)
/// * `candidate` - Lower-cased candidate name
///
/// # Returns
/// Confidence score (higher is better, no upper bound)
pub fn calculate_confidence(query: &str, candidate: &str) -> u32 {
    ConfidenceScorer::default().score(query, candidate)
}
