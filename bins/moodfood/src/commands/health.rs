//! Health check command

use crate::output;
use crate::Format;
use anyhow::Result;
use moodfood_matcher::{FoodSource, MatchOrchestrator};
use moodfood_telemetry::metrics;

/// Probe USDA and report
pub async fn run<S: FoodSource>(
    orchestrator: &MatchOrchestrator<S>,
    detailed: bool,
    format: Format,
) -> Result<()> {
    let report = orchestrator.health_check().await;

    match format {
        Format::Json => {
            let mut value = serde_json::to_value(&report)?;
            if detailed {
                value["metrics"] = metrics().export_json();
            }
            output::print_json(&value)?;
        }
        Format::Text => {
            println!("{}", output::health_text(&report));
            if detailed {
                println!();
                println!("{}", serde_json::to_string_pretty(&metrics().export_json())?);
            }
        }
    }

    Ok(())
}
