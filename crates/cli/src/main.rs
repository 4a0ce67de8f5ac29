//! Mavis Data CLI - Main Entry Point
//!
//! Resolves fixture scenarios, mutates record files and builds payloads
//! outside a browser run, for preparing and debugging test data.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

mod commands;
mod output;

use commands::{payload, records, scenario};
use mavis_e2e::data::{Fixtures, RecordFileGenerator};
use mavis_e2e::DataConfig;

/// Mavis Data CLI - fixtures and payloads for the E2E suite
#[derive(Parser)]
#[command(name = "mavis-data")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults apply when it does not exist)
    #[arg(long, env = "MAVIS_DATA_CONFIG", default_value = "mavis-data.toml", global = true)]
    config: PathBuf,

    /// Override the fixture root from the configuration
    #[arg(long, global = true)]
    fixture_root: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fixture scenario catalogue
    #[command(subcommand)]
    Scenario(scenario::ScenarioCommands),

    /// Read and mutate record files
    #[command(subcommand)]
    Records(records::RecordCommands),

    /// Build API payloads
    #[command(subcommand)]
    Payload(payload::PayloadCommands),

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = DataConfig::load(&cli.config)?;
    if let Some(root) = cli.fixture_root {
        config.fixture_root = root;
    }
    debug!("Using fixture root {}", config.fixture_root.display());

    match cli.command {
        Commands::Scenario(cmd) => {
            scenario::execute(cmd, &Fixtures::from_config(&config), cli.format)?
        }
        Commands::Records(cmd) => {
            let records = RecordFileGenerator::new(config.run_token.clone());
            records::execute(cmd, &records, cli.format)?
        }
        Commands::Payload(cmd) => payload::execute(cmd, &config)?,
        Commands::Version => {
            println!("Mavis Data CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Fixture root: {}", config.fixture_root.display());
        }
    }

    Ok(())
}
