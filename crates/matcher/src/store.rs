//! Local food-mood table
//!
//! A small curated table of foods with their nutrients, mood effects and
//! neurotransmitter impact. It answers when the USDA lookup cannot. The
//! table is read-only: it is parsed once from embedded JSON and shared.

use crate::error::{Result, StoreError};
use moodfood_core::validation::normalize;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

const BUILTIN_TABLE: &str = include_str!("../data/foods.json");

static BUILTIN: Lazy<Arc<FoodMoodDatabase>> = Lazy::new(|| {
    Arc::new(FoodMoodDatabase::from_json(BUILTIN_TABLE).expect("embedded food table is valid"))
});

/// A nutrient amount or a descriptive level such as "high"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NutrientValue {
    /// Numeric amount
    Amount(f64),
    /// Descriptive value
    Descriptor(String),
}

impl fmt::Display for NutrientValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(v) => write!(f, "{v}"),
            Self::Descriptor(s) => f.write_str(s),
        }
    }
}

/// Everything the table knows about one food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodMoodRecord {
    /// Nutrient label to value
    pub nutrients: BTreeMap<String, NutrientValue>,
    /// Mood aspect to effect
    pub mood_effects: BTreeMap<String, String>,
    /// Neurotransmitter to effect
    pub neurotransmitters: BTreeMap<String, String>,
}

/// Immutable key to record mapping; keys are normalized food names
#[derive(Debug, Clone, Default)]
pub struct FoodMoodDatabase {
    records: HashMap<String, FoodMoodRecord>,
}

impl FoodMoodDatabase {
    /// The table shipped with the crate
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&*BUILTIN)
    }

    /// Parse a table from a JSON object of name to record
    ///
    /// Keys are normalized; empty or colliding keys are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, FoodMoodRecord> = serde_json::from_str(json)?;

        let mut records = HashMap::with_capacity(raw.len());
        for (name, record) in raw {
            let key = normalize(&name);
            if key.is_empty() {
                return Err(StoreError::EmptyKey);
            }
            if records.insert(key.clone(), record).is_some() {
                return Err(StoreError::DuplicateKey(key));
            }
        }

        Ok(Self { records })
    }

    /// Exact lookup of a normalized name
    pub fn get(&self, key: &str) -> Option<&FoodMoodRecord> {
        self.records.get(key)
    }

    /// Whether a normalized name is present
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Number of foods
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.records.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Up to `n` keys to suggest when nothing was found
    pub fn suggestions(&self, n: usize) -> Vec<&str> {
        let mut keys = self.keys();
        keys.truncate(n);
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_parses() {
        let db = FoodMoodDatabase::builtin();
        assert_eq!(db.len(), 22);
        assert!(db.contains("dark chocolate"));
        assert!(db.contains("matcha latte with oat milk"));
        assert!(!db.contains("moon rock"));
    }

    #[test]
    fn test_record_shape() {
        let db = FoodMoodDatabase::builtin();
        let banana = db.get("banana").unwrap();

        assert_eq!(banana.nutrients["potassium"], NutrientValue::Amount(400.0));
        assert_eq!(banana.mood_effects["sleep"], "improved");
        assert_eq!(banana.neurotransmitters["serotonin"], "increased");

        let chocolate = db.get("dark chocolate").unwrap();
        assert_eq!(
            chocolate.nutrients["flavonoids"],
            NutrientValue::Descriptor("high".to_string())
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        let db = FoodMoodDatabase::builtin();
        assert!(db.get("Banana").is_none());
        assert!(db.get("bananas").is_none());
    }

    #[test]
    fn test_keys_normalized_on_load() {
        let db = FoodMoodDatabase::from_json(
            r#"{" Green Tea ": {"nutrients": {}, "moodEffects": {}, "neurotransmitters": {}}}"#,
        )
        .unwrap();
        assert_eq!(db.keys(), vec!["green tea"]);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let json = r#"{
            "Honey": {"nutrients": {}, "moodEffects": {}, "neurotransmitters": {}},
            "honey": {"nutrients": {}, "moodEffects": {}, "neurotransmitters": {}}
        }"#;
        assert!(matches!(
            FoodMoodDatabase::from_json(json),
            Err(StoreError::DuplicateKey(k)) if k == "honey"
        ));
    }

    #[test]
    fn test_malformed_table_rejected() {
        assert!(matches!(
            FoodMoodDatabase::from_json(r#"{"honey": {"nutrients": []}}"#),
            Err(StoreError::Parse(_))
        ));
        assert!(matches!(
            FoodMoodDatabase::from_json(r#"{"  ": {"nutrients": {}, "moodEffects": {}, "neurotransmitters": {}}}"#),
            Err(StoreError::EmptyKey)
        ));
    }

    #[test]
    fn test_suggestions() {
        let db = FoodMoodDatabase::builtin();
        assert_eq!(db.suggestions(3), vec!["almonds", "avocado", "banana"]);
    }

    #[test]
    fn test_nutrient_display() {
        assert_eq!(NutrientValue::Amount(3.3).to_string(), "3.3");
        assert_eq!(NutrientValue::Amount(400.0).to_string(), "400");
        assert_eq!(NutrientValue::Descriptor("very high".into()).to_string(), "very high");
    }
}
