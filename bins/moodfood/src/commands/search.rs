//! Search command

use crate::output;
use crate::Format;
use anyhow::Result;
use moodfood_matcher::{FoodSource, MatchOrchestrator};

/// Match a food name and print the outcome
pub async fn run<S: FoodSource>(
    orchestrator: &MatchOrchestrator<S>,
    food: &str,
    format: Format,
) -> Result<()> {
    let outcome = orchestrator.find_matches(food).await;

    match format {
        Format::Json => output::print_json(&outcome)?,
        Format::Text => println!("{}", output::outcome_text(food, &outcome, orchestrator.store())),
    }

    Ok(())
}
