//! Food search endpoint
//!
//! Maps to `GET /foods/search?query=...&pageSize=...` on FoodData Central.

use crate::client::UsdaClient;
use crate::error::ApiResult;
use crate::types::{Food, FoodSearchResponse};
use tracing::{debug, warn};

/// Result of a lookup on the fallback path
///
/// Rate limiting, timeouts, network errors, non-2xx statuses and malformed
/// payloads all become [`Lookup::Unavailable`]; the cause is logged.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// The search answered, possibly with no foods
    Found(Vec<Food>),
    /// The search could not be answered
    Unavailable,
}

impl Lookup {
    /// Foods if the search answered with at least one
    #[must_use]
    pub fn usable(self) -> Option<Vec<Food>> {
        match self {
            Self::Found(foods) if !foods.is_empty() => Some(foods),
            _ => None,
        }
    }
}

/// Food search API interface
#[derive(Clone, Debug)]
pub struct FoodsApi {
    client: UsdaClient,
}

impl FoodsApi {
    /// Create a new foods API interface
    pub(crate) fn new(client: UsdaClient) -> Self {
        Self { client }
    }

    /// Search foods by free text
    ///
    /// GET /foods/search
    pub async fn search(&self, query: &str, page_size: usize) -> ApiResult<FoodSearchResponse> {
        self.client
            .get(
                "foods/search",
                &[("query", query.to_string()), ("pageSize", page_size.to_string())],
            )
            .await
    }

    /// Search foods, collapsing every failure into [`Lookup::Unavailable`]
    pub async fn lookup(&self, query: &str, limit: usize) -> Lookup {
        match self.search(query, limit).await {
            Ok(response) => {
                debug!(query = %query, found = response.foods.len(), "USDA lookup answered");
                Lookup::Found(response.foods)
            }
            Err(e) => {
                warn!(query = %query, cause = e.kind(), error = %e, "USDA lookup unavailable");
                Lookup::Unavailable
            }
        }
    }
}
