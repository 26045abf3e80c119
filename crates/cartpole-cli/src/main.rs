//! Cartpole CLI - train a tabular Q-learner to balance a pole on a cart
//!
//! Configuration comes from `cartpole.toml` (see `cartpole config init`)
//! overlaid with `CARTPOLE__*` environment variables.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_precision_loss)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use crate::config::{Config, LoggingConfig};
use commands::{simulate, train};

#[derive(Parser)]
#[command(name = "cartpole")]
#[command(author, version, about = "Cart-pole balancing with tabular Q-learning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the learner and roll out the greedy policy
    Train(train::TrainArgs),

    /// Drive the plant without a learner
    Simulate(simulate::SimulateArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(commands::config::ConfigCommands),
}

fn init_logging(verbose: bool, logging: &LoggingConfig) {
    let log_level = if verbose { "debug" } else { logging.level.as_str() };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("cartpole={log_level},cartpole_rl={log_level},cartpole_core={log_level}").into()
    });

    // Logs go to stderr so JSON reports on stdout stay parseable
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = Config::find_config_file(cli.config.as_deref())?;
    let config = Config::load(config_path.as_deref())?;

    init_logging(cli.verbose, &config.logging);

    match &config_path {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    match cli.command {
        Commands::Train(args) => train::run(&args, &config),
        Commands::Simulate(args) => simulate::run(&args, &config),
        Commands::Config(cmd) => commands::config::run(cmd, &config, config_path.as_deref()),
    }
}
