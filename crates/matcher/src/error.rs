//! Error types for the matcher crate.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised while loading a food-mood table.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The table is not valid JSON of the expected shape
    #[error("Invalid food table: {0}")]
    Parse(#[from] serde_json::Error),

    /// A key normalizes to the empty string
    #[error("Food table contains an empty key")]
    EmptyKey,

    /// Two keys normalize to the same string
    #[error("Food table contains duplicate key: {0}")]
    DuplicateKey(String),
}
