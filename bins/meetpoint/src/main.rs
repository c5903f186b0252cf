//! Meetpoint CLI
//!
//! Reads a participant list, finds its centroid, and lists places to meet
//! around it.

use clap::{Parser, Subcommand};
use meetpoint_core::config::{Config, LoggingConfig};
use meetpoint_telemetry::TelemetryConfig;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod input;

use commands::{centroid, discover, query};

/// Find places to meet halfway
#[derive(Parser)]
#[command(name = "meetpoint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: String,

    /// Path to meetpoint.toml (searched for when omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the centroid of the participants
    Centroid {
        /// JSON file with `[{latitude, longitude, address?}]` ("-" for stdin)
        participants: PathBuf,
    },

    /// Print the Overpass QL that discovery would send
    Query {
        /// JSON file with participants ("-" for stdin)
        participants: PathBuf,

        /// Override the configured radius in meters
        #[arg(short, long)]
        radius: Option<f64>,
    },

    /// Discover places around the centroid
    Discover {
        /// JSON file with participants ("-" for stdin)
        participants: PathBuf,

        /// Only show places whose name or category matches
        #[arg(short, long)]
        query: Option<String>,

        /// Override the configured radius in meters
        #[arg(short, long)]
        radius: Option<f64>,
    },
}

/// Logs follow `--format`: JSON lines for `json`, compact text otherwise
fn telemetry_config(cli: &Cli, logging: &LoggingConfig) -> TelemetryConfig {
    let level = if cli.verbose {
        "meetpoint=debug,meetpoint_engine=debug,meetpoint_overpass=debug".to_string()
    } else {
        logging.level.clone()
    };
    TelemetryConfig::default()
        .with_log_level(level)
        .with_json(cli.format == "json")
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = meetpoint_telemetry::init_with_config(telemetry_config(&cli, &config.schema.logging)) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let result = match cli.command {
        Commands::Centroid { participants } => centroid::run(&participants, &cli.format),

        Commands::Query { participants, radius } => {
            query::run(&config, &participants, radius, &cli.format)
        }

        Commands::Discover { participants, query, radius } => {
            discover::run(&config, &participants, query.as_deref(), radius, &cli.format).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
