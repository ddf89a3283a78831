//! Rate-limited client for the USDA FoodData Central API
//!
//! This crate issues the one outbound call the matcher makes: a food search.
//!
//! # Features
//!
//! - **Environment-based configuration**: the API key comes from `USDA_API_KEY`,
//!   with a warning and a demo key when it is unset
//! - **Rate limiting**: every request first claims a slot in a shared
//!   [`SlidingWindowLimiter`](moodfood_core::rate_limit::SlidingWindowLimiter)
//! - **Bounded wait**: a hard timeout around send and decode
//! - **Single attempt**: no retries; callers fall back instead
//! - **Request correlation**: each request carries a unique ID for tracing
//!
//! # Example
//!
//! ```rust,no_run
//! use moodfood_api_client::{Lookup, UsdaClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UsdaClient::new()?;
//!
//!     match client.foods().lookup("banana", 5).await {
//!         Lookup::Found(foods) => println!("{} candidates", foods.len()),
//!         Lookup::Unavailable => println!("falling back to local data"),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod types;

pub use client::UsdaClient;
pub use config::ClientConfig;
pub use endpoints::foods::Lookup;
pub use error::{ApiError, ApiResult};
pub use types::{Food, FoodNutrient, FoodSearchResponse};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::UsdaClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{FoodsApi, Lookup};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::types::{Food, FoodNutrient, FoodSearchResponse};
}
