//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::FoodsApi;
use crate::error::{ApiError, ApiResult};
use moodfood_core::rate_limit::SlidingWindowLimiter;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Query parameter carrying the API key
const API_KEY_PARAM: &str = "api_key";

/// USDA FoodData Central client
///
/// Every request:
/// - claims a slot in the shared rate limiter, or fails fast
/// - is bounded by the configured timeout, covering send and body decode
/// - is attempted once; there is no retry
///
/// Clones share the HTTP connection pool and the rate limiter.
#[derive(Clone)]
pub struct UsdaClient {
    inner: Client,
    config: Arc<ClientConfig>,
    rate_limiter: Arc<SlidingWindowLimiter>,
}

impl std::fmt::Debug for UsdaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsdaClient")
            .field("base_url", &self.config.base_url)
            .field("demo_key", &self.config.is_demo_key())
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}

impl UsdaClient {
    /// Create a new client configured from the environment
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    /// Create a new client with its own rate limiter
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        let rate_limiter = Arc::new(SlidingWindowLimiter::new(config.rate_limit.clone()));
        Self::with_limiter(config, rate_limiter)
    }

    /// Create a new client that draws from an existing rate limiter
    pub fn with_limiter(
        config: ClientConfig,
        rate_limiter: Arc<SlidingWindowLimiter>,
    ) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config("user_agent is not a valid header value"))?;
        default_headers.insert(USER_AGENT, user_agent);

        let inner = Client::builder()
            .connect_timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            rate_limiter,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The rate limiter this client draws from
    #[must_use]
    pub fn rate_limiter(&self) -> &Arc<SlidingWindowLimiter> {
        &self.rate_limiter
    }

    /// Access food search endpoints
    #[must_use]
    pub fn foods(&self) -> FoodsApi {
        FoodsApi::new(self.clone())
    }

    /// Perform a rate-limited, time-bounded GET request
    ///
    /// The API key is appended to `params`. A denied rate-limit check returns
    /// [`ApiError::RateLimited`] without touching the network; a granted slot
    /// is consumed whatever the outcome.
    #[instrument(skip(self, params), fields(request_id))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        if !self.rate_limiter.try_acquire() {
            warn!(
                request_id = %request_id,
                path = %path,
                "Rate limited"
            );
            return Err(ApiError::RateLimited);
        }

        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let request = self
            .inner
            .get(&url)
            .query(params)
            .query(&[(API_KEY_PARAM, self.config.api_key.as_str())])
            .header(X_REQUEST_ID, &request_id);

        let start = Instant::now();
        let result = match tokio::time::timeout(self.config.timeout, self.execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(self.config.timeout)),
        };

        if result.is_ok() {
            debug!(
                request_id = %request_id,
                elapsed_ms = start.elapsed().as_millis(),
                "Request succeeded"
            );
        }

        result
    }

    /// Send a request and decode its body
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(|e| self.classify(e))?;
        self.handle_response(response).await
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::api_response(status.as_u16(), message));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn classify(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.config.timeout)
        } else {
            ApiError::Request(error)
        }
    }
}
