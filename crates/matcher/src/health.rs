//! Health check of the external lookup and the local table.

use crate::orchestrator::MatchOrchestrator;
use crate::source::FoodSource;
use chrono::{DateTime, Utc};
use moodfood_api_client::Lookup;
use moodfood_telemetry::{metrics, names};
use serde::Serialize;
use std::fmt;

/// Query used to probe the external source
pub const PROBE_QUERY: &str = "test";

/// Overall health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// External lookups answer
    Healthy,
    /// Only local data is available
    Degraded,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => f.write_str("healthy"),
            Self::Degraded => f.write_str("degraded"),
        }
    }
}

/// Result of [`MatchOrchestrator::health_check`]
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Overall status
    pub status: HealthStatus,
    /// Whether the probe lookup answered
    pub usda_reachable: bool,
    /// Foods in the local table
    pub local_foods: usize,
    /// Free rate-limit slots after the probe, if the source is limited
    pub rate_limit_remaining: Option<usize>,
    /// Crate version
    pub version: &'static str,
    /// When the check ran
    pub checked_at: DateTime<Utc>,
}

impl<S: FoodSource> MatchOrchestrator<S> {
    /// Probe the external source and report.
    ///
    /// The probe is an ordinary lookup and consumes a rate-limit slot.
    pub async fn health_check(&self) -> HealthReport {
        let usda_reachable = matches!(
            self.source.lookup(PROBE_QUERY, 1).await,
            Lookup::Found(_)
        );

        let rate_limit_remaining = self.source.remaining_slots();
        if let Some(remaining) = rate_limit_remaining {
            metrics().gauge(names::RATE_LIMIT_REMAINING, remaining as u64);
        }

        HealthReport {
            status: if usda_reachable {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            usda_reachable,
            local_foods: self.store.len(),
            rate_limit_remaining,
            version: env!("CARGO_PKG_VERSION"),
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::OfflineSource;
    use crate::store::FoodMoodDatabase;
    use crate::testing::ScriptedSource;

    #[tokio::test]
    async fn test_healthy_when_probe_answers() {
        // An empty answer still means the service is up
        let orchestrator = MatchOrchestrator::new(
            ScriptedSource::new(Lookup::Found(Vec::new())),
            FoodMoodDatabase::builtin(),
        );

        let report = orchestrator.health_check().await;
        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(report.usda_reachable);
        assert_eq!(report.local_foods, 22);
        assert_eq!(orchestrator.source.last_request(), Some((PROBE_QUERY.to_string(), 1)));
    }

    #[tokio::test]
    async fn test_degraded_when_offline() {
        let orchestrator = MatchOrchestrator::new(OfflineSource, FoodMoodDatabase::builtin());

        let report = orchestrator.health_check().await;
        assert_eq!(report.status, HealthStatus::Degraded);
        assert!(!report.usda_reachable);
        assert_eq!(report.local_foods, 22);
        assert_eq!(report.rate_limit_remaining, None);
    }

    #[test]
    fn test_report_serialization() {
        let report = HealthReport {
            status: HealthStatus::Degraded,
            usda_reachable: false,
            local_foods: 22,
            rate_limit_remaining: Some(9),
            version: "0.0.0",
            checked_at: Utc::now(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["rate_limit_remaining"], 9);
        assert!(json["checked_at"].is_string());
    }
}
