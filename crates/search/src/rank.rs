//! Ranking of scored candidates.

use crate::relevance::ConfidenceScorer;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Candidates scoring below this are dropped
pub const MIN_CONFIDENCE: u32 = 15;

/// At most this many matches are returned
pub const MAX_RESULTS: usize = 3;

/// A candidate name from an external source, with the id used to fetch it later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Name as the source spells it
    pub name: String,
    /// Source identifier
    pub id: u64,
}

impl Candidate {
    /// Create a candidate
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// Candidate with its confidence score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredMatch {
    /// Name as the source spells it
    pub name: String,
    /// Confidence score (uncapped)
    pub confidence: u32,
    /// Source identifier
    pub id: u64,
}

/// Threshold and size of a ranked result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankPolicy {
    /// Minimum confidence to keep a candidate
    pub min_confidence: u32,
    /// Maximum matches returned
    pub max_results: usize,
}

impl Default for RankPolicy {
    fn default() -> Self {
        Self {
            min_confidence: MIN_CONFIDENCE,
            max_results: MAX_RESULTS,
        }
    }
}

/// Score, filter and order candidates for a normalized query.
///
/// Names are lower-cased before scoring. Equal scores keep the order the
/// candidates arrived in.
pub fn rank_candidates(
    query: &str,
    candidates: &[Candidate],
    scorer: &ConfidenceScorer<'_>,
    policy: RankPolicy,
) -> Vec<ScoredMatch> {
    let score = |candidate: &Candidate| ScoredMatch {
        name: candidate.name.clone(),
        confidence: scorer.score(query, &candidate.name.to_lowercase()),
        id: candidate.id,
    };

    #[cfg(feature = "parallel")]
    let scored: Vec<ScoredMatch> = candidates.par_iter().map(score).collect();

    #[cfg(not(feature = "parallel"))]
    let scored: Vec<ScoredMatch> = candidates.iter().map(score).collect();

    let mut kept: Vec<ScoredMatch> = scored
        .into_iter()
        .filter(|m| m.confidence >= policy.min_confidence)
        .collect();

    // `sort_by` is stable
    kept.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    kept.truncate(policy.max_results);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(query: &str, names: &[&str]) -> Vec<ScoredMatch> {
        let candidates: Vec<Candidate> = names
            .iter()
            .enumerate()
            .map(|(i, n)| Candidate::new(*n, i as u64 + 1))
            .collect();
        rank_candidates(query, &candidates, &ConfidenceScorer::default(), RankPolicy::default())
    }

    #[test]
    fn test_sorted_descending() {
        let ranked = rank("dark chocolate", &["Chocolate, dark", "Candies, dark chocolate"]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "Candies, dark chocolate");
        assert_eq!(ranked[0].confidence, 90);
        assert_eq!(ranked[1].confidence, 40);
    }

    #[test]
    fn test_threshold_filters() {
        let ranked = rank("banana", &["Apples, raw", "Bananas, raw"]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, 2);
    }

    #[test]
    fn test_keeps_top_three() {
        let ranked = rank(
            "oats",
            &["Oats", "Oats, raw", "Cereals, oats", "Oats bran", "Oat milk"],
        );
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|m| m.confidence == 70));
        // Ties keep source order
        let ids: Vec<u64> = ranked.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_tie_break_preserves_input_order() {
        let ranked = rank("salmon", &["Fish, salmon, raw", "Salmon, smoked", "Fish, salmon, baked"]);
        let ids: Vec<u64> = ranked.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_when_nothing_clears_threshold() {
        assert!(rank("bananna", &["Bananas, raw"]).is_empty());
    }

    #[test]
    fn test_name_keeps_original_case() {
        let ranked = rank("honey", &["Honey, RAW"]);
        assert_eq!(ranked[0].name, "Honey, RAW");
    }

    #[test]
    fn test_custom_policy() {
        let candidates = vec![Candidate::new("Bananas, raw", 7)];
        let ranked = rank_candidates(
            "bananna",
            &candidates,
            &ConfidenceScorer::default(),
            RankPolicy { min_confidence: 0, max_results: 1 },
        );
        assert_eq!(ranked, vec![ScoredMatch { name: "Bananas, raw".into(), confidence: 0, id: 7 }]);
    }
}
