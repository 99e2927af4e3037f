//! `cac simulate`

use std::path::PathBuf;

use clap::Args;

use super::{load_proposal, print_json, simulation_engine};
use crate::config::CollectiveConfig;
use crate::error::CliResult;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Proposal JSON file
    pub proposal: PathBuf,

    /// Project only this scenario (optimistic, realistic, pessimistic)
    #[arg(short, long)]
    pub scenario: Option<String>,
}

/// Simulate without the approval gate. Operators use this to explore
/// proposals that have not been validated yet.
pub fn execute(args: SimulateArgs, config: &CollectiveConfig) -> CliResult<()> {
    let proposal = load_proposal(&args.proposal)?;
    let engine = simulation_engine(config)?;

    match args.scenario {
        Some(scenario) => print_json(&engine.project_scenario(&proposal, &scenario)?),
        None => print_json(&engine.simulate(&proposal)?),
    }
}
