//! Match-confidence scoring for food queries.
//!
//! This crate provides:
//! - Additive confidence scoring of a candidate name against a query
//! - A positional-difference fuzzy word match for typos
//! - Ranking: score, threshold, stable sort, truncate

mod fuzzy;
mod rank;
mod relevance;

pub use fuzzy::{is_fuzzy_match, positional_difference, MAX_DIFFERENCES, MAX_LENGTH_GAP};
pub use rank::{rank_candidates, Candidate, RankPolicy, ScoredMatch, MAX_RESULTS, MIN_CONFIDENCE};
pub use relevance::{calculate_confidence, search_words, ConfidenceScorer, MatchBonus, CATEGORY_WORDS};
