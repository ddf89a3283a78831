//! Food query matching for moodfood
//!
//! Turns a free-text food name into ranked USDA matches, or into an entry of
//! the local food-mood table when the USDA lookup has nothing usable.
//!
//! - **Matching**: validate, search, score, threshold, top three
//! - **Fallback**: exact lookup in a curated local table
//! - **Profiles**: nutrients of the first USDA hit, or the local record
//! - **Health**: a probe lookup plus the local table size
//!
//! # Example
//!
//! ```rust,no_run
//! use moodfood_api_client::UsdaClient;
//! use moodfood_matcher::{FoodMoodDatabase, MatchOrchestrator, MatchOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = MatchOrchestrator::new(UsdaClient::new()?, FoodMoodDatabase::builtin());
//!
//!     if let MatchOutcome::Ranked { matches } = orchestrator.find_matches("bananna").await {
//!         for m in matches {
//!             println!("{} ({}%)", m.name, m.confidence);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod health;
pub mod orchestrator;
pub mod profile;
pub mod source;
pub mod store;

pub use error::{Result, StoreError};
pub use health::{HealthReport, HealthStatus};
pub use orchestrator::{MatchOrchestrator, MatchOutcome, SEARCH_LIMIT};
pub use profile::{NutrientAmount, ProfileOutcome};
pub use source::{FoodSource, OfflineSource};
pub use store::{FoodMoodDatabase, FoodMoodRecord, NutrientValue};

#[cfg(test)]
pub(crate) mod testing {
    use crate::source::FoodSource;
    use moodfood_api_client::{Food, Lookup};
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Source that answers every lookup with the same canned result
    pub(crate) struct ScriptedSource {
        response: Lookup,
        calls: AtomicUsize,
        last: Mutex<Option<(String, usize)>>,
    }

    impl ScriptedSource {
        pub(crate) fn new(response: Lookup) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn last_request(&self) -> Option<(String, usize)> {
            self.last.lock().unwrap().clone()
        }
    }

    impl std::fmt::Debug for ScriptedSource {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ScriptedSource").field("calls", &self.calls()).finish()
        }
    }

    impl FoodSource for ScriptedSource {
        fn lookup(&self, query: &str, limit: usize) -> impl Future<Output = Lookup> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((query.to_string(), limit));
            std::future::ready(self.response.clone())
        }
    }

    pub(crate) fn food(fdc_id: u64, description: &str) -> Food {
        Food {
            fdc_id,
            description: Some(description.to_string()),
            data_type: Some("SR Legacy".to_string()),
            food_nutrients: Vec::new(),
        }
    }
}
