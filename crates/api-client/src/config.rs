//! Configuration for the USDA client
//!
//! Only the API key comes from the environment. Endpoint, timeout and rate
//! limit are fixed constants; the `with_*` builders exist for tests and
//! embedding.

use crate::error::{ApiError, ApiResult};
use moodfood_core::rate_limit::RateLimitConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::warn;

/// USDA FoodData Central base URL
pub const USDA_API_BASE: &str = "https://api.nal.usda.gov/fdc/v1";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "USDA_API_KEY";

/// Public demo key accepted by api.data.gov (heavily throttled)
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// Hard bound on one outbound request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_USER_AGENT: &str = "moodfood/1.0";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the FoodData Central API
    pub base_url: String,
    /// API key appended to every request
    pub api_key: String,
    /// Request timeout
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Rate limit configuration
    pub rate_limit: RateLimitConfig,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        u64::try_from(duration.as_millis())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: USDA_API_BASE.to_string(),
            api_key: DEMO_API_KEY.to_string(),
            timeout: REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from the environment
    ///
    /// Reads `USDA_API_KEY`. When it is unset or blank the demo key is used
    /// and a warning is logged.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_api_key(env::var(API_KEY_ENV).ok())
    }

    /// Create configuration from an optional API key
    #[must_use]
    pub fn from_api_key(api_key: Option<String>) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != DEMO_API_KEY);

        match api_key {
            Some(api_key) => Self {
                api_key,
                ..Self::default()
            },
            None => {
                warn!(
                    env = API_KEY_ENV,
                    "Using demo USDA API key; set {API_KEY_ENV} for production"
                );
                Self::default()
            }
        }
    }

    /// Whether the built-in demo key is in use
    #[must_use]
    pub fn is_demo_key(&self) -> bool {
        self.api_key == DEMO_API_KEY
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set rate limit config
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(self.base_url.clone()));
        }

        if self.api_key.trim().is_empty() {
            return Err(ApiError::config("api_key cannot be empty"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.rate_limit.max_requests == 0 {
            return Err(ApiError::config("rate_limit.max_requests cannot be zero"));
        }

        Ok(())
    }
}
