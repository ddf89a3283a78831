//! Where external candidates come from.
//!
//! The orchestrator talks to a [`FoodSource`] so tests and offline runs can
//! swap the USDA client for something that never touches the network.

use moodfood_api_client::{Lookup, UsdaClient};
use std::future::Future;

/// A searchable source of external food candidates
pub trait FoodSource: Send + Sync {
    /// Search for up to `limit` foods; never fails, only degrades to
    /// [`Lookup::Unavailable`]
    fn lookup(&self, query: &str, limit: usize) -> impl Future<Output = Lookup> + Send;

    /// Free outbound slots, when the source is rate limited
    fn remaining_slots(&self) -> Option<usize> {
        None
    }
}

impl FoodSource for UsdaClient {
    fn lookup(&self, query: &str, limit: usize) -> impl Future<Output = Lookup> + Send {
        async move { self.foods().lookup(query, limit).await }
    }

    fn remaining_slots(&self) -> Option<usize> {
        Some(self.rate_limiter().remaining())
    }
}

/// Source that is always unavailable, for local-only operation
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl FoodSource for OfflineSource {
    fn lookup(&self, _query: &str, _limit: usize) -> impl Future<Output = Lookup> + Send {
        std::future::ready(Lookup::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodfood_api_client::ClientConfig;
    use moodfood_core::rate_limit::RateLimitConfig;

    #[test]
    fn test_offline_source_is_unavailable() {
        assert_eq!(tokio_test::block_on(OfflineSource.lookup("banana", 5)), Lookup::Unavailable);
        assert_eq!(OfflineSource.remaining_slots(), None);
    }

    #[tokio::test]
    async fn test_client_source_reports_slots() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9/fdc/v1")
            .with_rate_limit(RateLimitConfig::per_minute(2));
        let client = UsdaClient::with_config(config).unwrap();
        assert_eq!(client.remaining_slots(), Some(2));

        // Nothing listens on the discard port; the slot is still spent
        assert_eq!(FoodSource::lookup(&client, "banana", 5).await, Lookup::Unavailable);
        assert_eq!(client.remaining_slots(), Some(1));
    }
}
