//! Wire types for the FoodData Central search endpoint
//!
//! Only the fields the matcher reads are modeled; unknown fields are ignored.
//! A response without a `foods` array fails to decode.

use serde::{Deserialize, Serialize};

/// One nutrient entry of a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    /// USDA nutrient identifier
    #[serde(default)]
    pub nutrient_id: Option<u64>,
    /// Nutrient name, e.g. "Protein"
    #[serde(default)]
    pub nutrient_name: Option<String>,
    /// Unit of measurement, e.g. "G"
    #[serde(default)]
    pub unit_name: Option<String>,
    /// Amount per 100 g
    #[serde(default)]
    pub value: Option<f64>,
}

/// A food item from a search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    /// FoodData Central identifier
    pub fdc_id: u64,
    /// Food name
    #[serde(default)]
    pub description: Option<String>,
    /// Data set, e.g. "Foundation" or "SR Legacy"
    #[serde(default)]
    pub data_type: Option<String>,
    /// Nutrient profile
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

impl Food {
    /// Food name, or an empty string when the source left it out
    #[must_use]
    pub fn name(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Response of `GET /foods/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearchResponse {
    /// Matching foods, best first
    pub foods: Vec<Food>,
    /// Total number of matches
    #[serde(default)]
    pub total_hits: u64,
    /// Current page
    #[serde(default)]
    pub current_page: u32,
    /// Number of pages
    #[serde(default)]
    pub total_pages: u32,
}
