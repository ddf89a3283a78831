//! Nutrient and mood profile of a single food.

use crate::orchestrator::MatchOrchestrator;
use crate::source::FoodSource;
use crate::store::FoodMoodRecord;
use moodfood_api_client::{Food, Lookup};
use moodfood_core::validation::normalize;
use serde::Serialize;
use tracing::debug;

/// Nutrients kept from an external profile
pub const PROFILE_NUTRIENT_LIMIT: usize = 10;

/// One nutrient of an external profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientAmount {
    /// Nutrient name, e.g. "Potassium, K"
    pub name: String,
    /// Amount per 100 g
    pub amount: f64,
    /// Unit, e.g. "MG"
    pub unit: String,
}

/// Where a profile came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ProfileOutcome {
    /// First external search hit
    Usda {
        /// Food name as the source spells it
        name: String,
        /// Source identifier
        fdc_id: u64,
        /// Named, non-zero nutrients in source order
        nutrients: Vec<NutrientAmount>,
    },
    /// Local table entry
    Local {
        /// Local table key
        key: String,
        /// Nutrients, mood effects and neurotransmitters
        record: FoodMoodRecord,
    },
    /// Found nowhere
    NotFound,
}

fn nutrients_of(food: &Food) -> Vec<NutrientAmount> {
    food.food_nutrients
        .iter()
        .filter_map(|n| {
            let name = n.nutrient_name.as_deref().filter(|s| !s.is_empty())?;
            let amount = n.value.filter(|v| *v != 0.0)?;
            Some(NutrientAmount {
                name: name.to_string(),
                amount,
                unit: n.unit_name.clone().unwrap_or_default(),
            })
        })
        .take(PROFILE_NUTRIENT_LIMIT)
        .collect()
}

impl<S: FoodSource> MatchOrchestrator<S> {
    /// Profile one food: the first external hit, else the local table.
    ///
    /// Skips validation; a blank name is `NotFound` without a lookup. The
    /// external call draws from the same rate limiter as `find_matches`.
    pub async fn food_profile(&self, food: &str) -> ProfileOutcome {
        let key = normalize(food);
        if key.is_empty() {
            return ProfileOutcome::NotFound;
        }

        if let Lookup::Found(foods) = self.source.lookup(food.trim(), 1).await {
            if let Some(first) = foods.into_iter().next() {
                debug!(food = %key, fdc_id = first.fdc_id, "Profile from USDA");
                return ProfileOutcome::Usda {
                    name: first.name().to_string(),
                    fdc_id: first.fdc_id,
                    nutrients: nutrients_of(&first),
                };
            }
        }

        match self.store.get(&key) {
            Some(record) => ProfileOutcome::Local {
                key,
                record: record.clone(),
            },
            None => ProfileOutcome::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FoodMoodDatabase;
    use crate::testing::{food, ScriptedSource};
    use moodfood_api_client::FoodNutrient;

    fn nutrient(name: Option<&str>, value: Option<f64>) -> FoodNutrient {
        FoodNutrient {
            nutrient_id: None,
            nutrient_name: name.map(str::to_string),
            unit_name: Some("MG".to_string()),
            value,
        }
    }

    fn orchestrator(lookup: Lookup) -> MatchOrchestrator<ScriptedSource> {
        MatchOrchestrator::new(ScriptedSource::new(lookup), FoodMoodDatabase::builtin())
    }

    #[tokio::test]
    async fn test_profile_from_first_hit() {
        let mut banana = food(173_944, "Bananas, raw");
        banana.food_nutrients = vec![
            nutrient(Some("Potassium, K"), Some(358.0)),
            nutrient(None, Some(1.0)),
            nutrient(Some("Vitamin D"), Some(0.0)),
            nutrient(Some("Magnesium, Mg"), None),
            nutrient(Some("Vitamin B-6"), Some(0.367)),
        ];
        let orchestrator = orchestrator(Lookup::Found(vec![banana, food(2, "Banana chips")]));

        match orchestrator.food_profile("  Banana ").await {
            ProfileOutcome::Usda { name, fdc_id, nutrients } => {
                assert_eq!(name, "Bananas, raw");
                assert_eq!(fdc_id, 173_944);
                let names: Vec<&str> = nutrients.iter().map(|n| n.name.as_str()).collect();
                assert_eq!(names, vec!["Potassium, K", "Vitamin B-6"]);
                assert_eq!(nutrients[0].unit, "MG");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(orchestrator.source.last_request(), Some(("Banana".to_string(), 1)));
    }

    #[tokio::test]
    async fn test_profile_caps_nutrients() {
        let mut oats = food(1, "Oats");
        oats.food_nutrients = (1..=15)
            .map(|i| nutrient(Some(&format!("N{i}")), Some(f64::from(i))))
            .collect();
        let orchestrator = orchestrator(Lookup::Found(vec![oats]));

        match orchestrator.food_profile("oats").await {
            ProfileOutcome::Usda { nutrients, .. } => {
                assert_eq!(nutrients.len(), PROFILE_NUTRIENT_LIMIT);
                assert_eq!(nutrients[9].name, "N10");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_profile_falls_back_to_local() {
        let orchestrator = orchestrator(Lookup::Unavailable);

        match orchestrator.food_profile("Dark Chocolate").await {
            ProfileOutcome::Local { key, record } => {
                assert_eq!(key, "dark chocolate");
                assert!(record.nutrients.contains_key("flavonoids"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(orchestrator.food_profile("moon rock").await, ProfileOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_profile_empty_hit_list_falls_back() {
        let orchestrator = orchestrator(Lookup::Found(Vec::new()));
        assert!(matches!(
            orchestrator.food_profile("honey").await,
            ProfileOutcome::Local { .. }
        ));
    }

    #[tokio::test]
    async fn test_blank_profile_skips_lookup() {
        let orchestrator = orchestrator(Lookup::Unavailable);

        assert_eq!(orchestrator.food_profile("   ").await, ProfileOutcome::NotFound);
        assert_eq!(orchestrator.source.calls(), 0);
    }

    #[test]
    fn test_profile_serialization() {
        let json = serde_json::to_value(ProfileOutcome::NotFound).unwrap();
        assert_eq!(json["source"], "not_found");
    }
}
