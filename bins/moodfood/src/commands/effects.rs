//! Effects command

use crate::output;
use crate::Format;
use anyhow::Result;
use moodfood_matcher::{FoodSource, MatchOrchestrator};

/// Profile a food and print its nutrients and mood effects
pub async fn run<S: FoodSource>(
    orchestrator: &MatchOrchestrator<S>,
    food: &str,
    format: Format,
) -> Result<()> {
    let profile = orchestrator.food_profile(food).await;

    match format {
        Format::Json => output::print_json(&profile)?,
        Format::Text => println!("{}", output::profile_text(food, &profile)),
    }

    Ok(())
}
