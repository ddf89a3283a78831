//! Endpoint-specific API implementations
//!
//! | Module | USDA endpoint | Description |
//! |--------|---------------|-------------|
//! | `foods` | `GET /foods/search` | Free-text food search |

pub mod foods;

pub use foods::{FoodsApi, Lookup};
