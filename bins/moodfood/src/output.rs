//! Terminal output formatting
//!
//! Text renderers return strings so commands decide where they go. Styling is
//! dropped when stdout is not a terminal.

use anyhow::Result;
use moodfood_matcher::{FoodMoodDatabase, HealthReport, HealthStatus, MatchOutcome, ProfileOutcome};
use moodfood_search::ScoredMatch;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Local keys offered when nothing was found
const SUGGESTION_COUNT: usize = 3;

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn bold(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.bold()).to_string()
}

/// One ranked line, e.g. `1. Bananas, raw (confidence: 70%)`
pub fn match_line(rank: usize, m: &ScoredMatch) -> String {
    format!("{rank}. {} (confidence: {}%)", m.name, m.confidence)
}

fn not_found(food: &str) -> String {
    format!("Sorry, I couldn't find \"{food}\" in the USDA database or the local database.")
}

/// Render a match outcome
pub fn outcome_text(food: &str, outcome: &MatchOutcome, store: &FoodMoodDatabase) -> String {
    match outcome {
        MatchOutcome::Rejected { message } => message.clone(),
        MatchOutcome::Ranked { matches } => {
            let mut out = bold(&format!(
                "Found {} potential matches for \"{food}\":",
                matches.len()
            ));
            out.push('\n');
            for (i, m) in matches.iter().enumerate() {
                let _ = write!(out, "\n{}", match_line(i + 1, m));
            }
            out.push_str("\n\nRun \"moodfood effects <name>\" with the exact food name for the full analysis.");
            out
        }
        MatchOutcome::NoGoodMatch => format!(
            "No good matches found for \"{food}\". Please try a different food name or check the spelling."
        ),
        MatchOutcome::LocalOnly { key } => format!(
            "Found \"{food}\" in the local database. Run \"moodfood effects {key}\" for the full analysis."
        ),
        MatchOutcome::NotFound => {
            let suggestions: Vec<String> = store
                .suggestions(SUGGESTION_COUNT)
                .iter()
                .map(|k| format!("\"{k}\""))
                .collect();
            format!("{} Try: {}", not_found(food), suggestions.join(", "))
        }
    }
}

fn section<V: std::fmt::Display>(out: &mut String, title: &str, entries: &BTreeMap<String, V>) {
    let _ = write!(out, "\n\n{}", bold(title));
    if entries.is_empty() {
        out.push_str("\n  none recorded");
    }
    for (name, value) in entries {
        let _ = write!(out, "\n  - {name}: {value}");
    }
}

/// Render a food profile
pub fn profile_text(food: &str, profile: &ProfileOutcome) -> String {
    match profile {
        ProfileOutcome::Usda { name, fdc_id, nutrients } => {
            let mut out = bold(&format!("{name} (FDC {fdc_id})"));
            let _ = write!(out, "\n\n{}", bold("Nutrients (per 100 g):"));
            if nutrients.is_empty() {
                out.push_str("\n  none reported");
            }
            for n in nutrients {
                let _ = write!(out, "\n  - {}: {} {}", n.name, n.amount, n.unit);
            }
            out
        }
        ProfileOutcome::Local { key, record } => {
            let mut out = bold(&format!("{key} (local database)"));
            section(&mut out, "Nutrients:", &record.nutrients);
            section(&mut out, "Mood effects:", &record.mood_effects);
            section(&mut out, "Neurotransmitters:", &record.neurotransmitters);
            out
        }
        ProfileOutcome::NotFound => format!(
            "{} Try \"moodfood search {food}\" first to find the right food name.",
            not_found(food)
        ),
    }
}

/// Render a health report
pub fn health_text(report: &HealthReport) -> String {
    let status = match report.status {
        HealthStatus::Healthy => report
            .status
            .if_supports_color(Stream::Stdout, |t| t.green())
            .to_string(),
        HealthStatus::Degraded => report
            .status
            .if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "Status:          {status}");
    let _ = writeln!(
        out,
        "USDA reachable:  {}",
        if report.usda_reachable { "yes" } else { "no" }
    );
    let _ = writeln!(out, "Local foods:     {}", report.local_foods);
    if let Some(remaining) = report.rate_limit_remaining {
        let _ = writeln!(out, "Rate limit:      {remaining} requests free");
    }
    let _ = writeln!(out, "Version:         {}", report.version);
    let _ = write!(out, "Checked at:      {}", report.checked_at.to_rfc3339());
    out
}
