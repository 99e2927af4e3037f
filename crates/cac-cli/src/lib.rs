//! cac - command-line interface for the Climate AI Collective evaluation core
//!
//! - `validate`: score a proposal on the physical, economic, temporal and
//!   reference axes
//! - `simulate`: project emission reductions under the three scenarios
//! - `run`: drive proposals through validation, the approval gate and
//!   simulation, publishing the results
//! - `config`: print the effective configuration

use std::ffi::OsString;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod commands;
pub mod config;
pub mod error;

use crate::commands::{run::RunArgs, simulate::SimulateArgs, validate::ValidateArgs};
pub use crate::config::{CollectiveConfig, LoggingConfig};
pub use crate::error::{CliError, CliResult};

/// cac CLI application
#[derive(Parser, Debug)]
#[command(name = "cac")]
#[command(about = "Climate AI Collective - proposal validation and impact simulation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CAC_CONFIG")]
    pub config: Option<String>,

    /// Log level, overrides the configuration file
    #[arg(long, env = "CAC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "CAC_LOG_JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a proposal and print the verdict
    Validate(ValidateArgs),

    /// Simulate a proposal and print the projection
    Simulate(SimulateArgs),

    /// Evaluate proposals end to end
    Run(RunArgs),

    /// Show the effective configuration
    Config,
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    let mut config = CollectiveConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.logging.json |= cli.json;

    init_tracing(&config.logging);
    config.validate()?;

    match cli.command {
        Commands::Validate(args) => commands::validate::execute(args, &config).await,
        Commands::Simulate(args) => commands::simulate::execute(args, &config),
        Commands::Run(args) => commands::run::execute(args, &config).await,
        Commands::Config => commands::print_json(&config),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.clone().into());

    // Logs go to stderr so stdout stays machine-readable.
    if logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_output_dir() {
        let cli = Cli::try_parse_from(["cac", "run", "a.json", "b.json", "--output-dir", "out"])
            .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.proposals.len(), 2);
                assert_eq!(args.output_dir.unwrap().to_str(), Some("out"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_simulate_scenario() {
        let cli = Cli::try_parse_from(["cac", "simulate", "p.json", "--scenario", "pessimistic"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Simulate(SimulateArgs { scenario: Some(ref s), .. }) if s == "pessimistic"
        ));
    }

    #[test]
    fn run_requires_a_proposal() {
        assert!(Cli::try_parse_from(["cac", "run"]).is_err());
    }
}
