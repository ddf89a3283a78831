//! moodfood - food lookups with mood effects
//!
//! Searches USDA FoodData Central for a food name, ranks the hits by match
//! confidence and falls back to a curated local table of mood effects.

use clap::{Parser, Subcommand, ValueEnum};
use moodfood_api_client::UsdaClient;
use moodfood_matcher::{FoodMoodDatabase, FoodSource, MatchOrchestrator, OfflineSource};
use moodfood_telemetry::TelemetryConfig;
use owo_colors::OwoColorize;
use std::process::ExitCode;

mod commands;
mod output;

use commands::{effects, health, search};

/// Food lookups with mood effects
#[derive(Parser)]
#[command(name = "moodfood")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Use only the local table; never call USDA
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable text
    Text,
    /// JSON on stdout
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Find USDA foods matching a name, ranked by confidence
    Search {
        /// Food name, e.g. "dark chocolate"
        food: String,
    },

    /// Show nutrients and mood effects of a food
    Effects {
        /// Food name, e.g. "banana"
        food: String,
    },

    /// Check USDA reachability and the local table
    Health {
        /// Include in-process metrics
        #[arg(short, long)]
        detailed: bool,
    },
}

async fn dispatch<S: FoodSource>(
    command: Commands,
    orchestrator: &MatchOrchestrator<S>,
    format: Format,
) -> anyhow::Result<()> {
    match command {
        Commands::Search { food } => search::run(orchestrator, &food, format).await,
        Commands::Effects { food } => effects::run(orchestrator, &food, format).await,
        Commands::Health { detailed } => health::run(orchestrator, detailed, format).await,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    moodfood_telemetry::init_with_config(telemetry)?;

    let store = FoodMoodDatabase::builtin();
    tracing::debug!(offline = cli.offline, local_foods = store.len(), "Starting");

    if cli.offline {
        let orchestrator = MatchOrchestrator::new(OfflineSource, store);
        dispatch(cli.command, &orchestrator, cli.format).await
    } else {
        let orchestrator = MatchOrchestrator::new(UsdaClient::new()?, store);
        dispatch(cli.command, &orchestrator, cli.format).await
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
