//! Query matching: validate, look up, score, fall back.

use crate::source::FoodSource;
use crate::store::FoodMoodDatabase;
use moodfood_api_client::Lookup;
use moodfood_core::validation::{InputValidator, ValidationResult};
use moodfood_search::{rank_candidates, Candidate, ConfidenceScorer, RankPolicy, ScoredMatch};
use moodfood_telemetry::{metrics, names, Timer};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Candidates requested from the external source per query
pub const SEARCH_LIMIT: usize = 5;

/// Result of matching one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Query refused; `message` is meant for the user
    Rejected {
        /// User-facing explanation
        message: String,
    },
    /// One to three external matches, best first
    Ranked {
        /// Scored matches
        matches: Vec<ScoredMatch>,
    },
    /// External candidates existed but none scored high enough
    NoGoodMatch,
    /// External lookup gave nothing usable; the local table has the food
    LocalOnly {
        /// Local table key
        key: String,
    },
    /// Found nowhere
    NotFound,
}

impl MatchOutcome {
    /// Ranked matches, empty for every other outcome
    pub fn matches(&self) -> &[ScoredMatch] {
        match self {
            Self::Ranked { matches } => matches,
            _ => &[],
        }
    }

    fn metric(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => names::MATCH_REJECTED,
            Self::Ranked { .. } => names::MATCH_RANKED,
            Self::NoGoodMatch => names::MATCH_NO_GOOD_MATCH,
            Self::LocalOnly { .. } => names::MATCH_LOCAL_ONLY,
            Self::NotFound => names::MATCH_NOT_FOUND,
        }
    }
}

/// Counter for a lookup that gave nothing to rank
fn lookup_metric(lookup: &Lookup) -> Option<&'static str> {
    match lookup {
        Lookup::Found(foods) if foods.is_empty() => Some(names::LOOKUP_EMPTY),
        Lookup::Found(_) => None,
        Lookup::Unavailable => Some(names::LOOKUP_UNAVAILABLE),
    }
}

/// Composes validation, external lookup, scoring and the local fallback
///
/// Cheap to share behind an `Arc`; every method takes `&self` and the only
/// mutable state is the source's rate limiter.
#[derive(Debug)]
pub struct MatchOrchestrator<S> {
    validator: InputValidator,
    pub(crate) source: S,
    pub(crate) store: Arc<FoodMoodDatabase>,
    scorer: ConfidenceScorer<'static>,
    policy: RankPolicy,
}

impl<S: FoodSource> MatchOrchestrator<S> {
    /// Create an orchestrator with the built-in validator, scorer and policy
    pub fn new(source: S, store: Arc<FoodMoodDatabase>) -> Self {
        Self {
            validator: InputValidator::new(),
            source,
            store,
            scorer: ConfidenceScorer::default(),
            policy: RankPolicy::default(),
        }
    }

    /// Replace the input validator
    #[must_use]
    pub fn with_validator(mut self, validator: InputValidator) -> Self {
        self.validator = validator;
        self
    }

    /// The local table used for fallback
    pub fn store(&self) -> &FoodMoodDatabase {
        &self.store
    }

    /// Match a raw query.
    ///
    /// 1. Validate; a rejection is returned as is.
    /// 2. Ask the source for up to five candidates.
    /// 3. With candidates: score, drop those under 15, keep the best three.
    /// 4. Without: exact lookup of the normalized query in the local table.
    pub async fn find_matches(&self, raw: &str) -> MatchOutcome {
        let outcome = self.resolve(raw).await;
        metrics().increment(outcome.metric());
        outcome
    }

    async fn resolve(&self, raw: &str) -> MatchOutcome {
        let query = match self.validator.validate(raw) {
            ValidationResult::Accepted(query) => query,
            ValidationResult::Rejected(rejection) => {
                debug!(reason = %rejection.reason(), "Query rejected");
                return MatchOutcome::Rejected {
                    message: rejection.message().to_string(),
                };
            }
        };
        let normalized = query.normalized();

        let timer = Timer::start(names::LOOKUP_LATENCY_MS);
        let lookup = self.source.lookup(normalized, SEARCH_LIMIT).await;
        timer.stop();

        if let Some(name) = lookup_metric(&lookup) {
            metrics().increment(name);
        }

        if let Some(foods) = lookup.usable() {
            let candidates: Vec<Candidate> = foods
                .iter()
                .map(|food| Candidate::new(food.name(), food.fdc_id))
                .collect();
            let matches = rank_candidates(normalized, &candidates, &self.scorer, self.policy);

            debug!(
                query = %normalized,
                candidates = candidates.len(),
                kept = matches.len(),
                "Scored external candidates"
            );

            return if matches.is_empty() {
                MatchOutcome::NoGoodMatch
            } else {
                MatchOutcome::Ranked { matches }
            };
        }

        if self.store.contains(normalized) {
            debug!(query = %normalized, "Answered from local table");
            MatchOutcome::LocalOnly {
                key: normalized.to_string(),
            }
        } else {
            MatchOutcome::NotFound
        }
    }
}
