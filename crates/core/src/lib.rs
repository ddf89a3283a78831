//! Core building blocks for the moodfood matcher
//!
//! This crate holds the two pieces every query passes through before any
//! scoring happens:
//!
//! - **Validation**: normalization of raw queries and rejection of clearly
//!   non-food input, driven by a data table of suspicious patterns
//! - **Rate limiting**: a sliding-window limiter with an injectable clock that
//!   bounds outbound lookups across concurrent callers
//!
//! # Example
//!
//! ```rust
//! use moodfood_core::validation::{InputValidator, ValidationResult};
//!
//! let validator = InputValidator::new();
//! match validator.validate("  Banana ") {
//!     ValidationResult::Accepted(query) => assert_eq!(query.normalized(), "banana"),
//!     ValidationResult::Rejected(rejection) => panic!("{}", rejection.message()),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod rate_limit;
pub mod validation;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::rate_limit::{Clock, ManualClock, RateLimitConfig, SlidingWindowLimiter, SystemClock};
    pub use crate::validation::{InputValidator, Query, Rejection, ValidationResult};
}
