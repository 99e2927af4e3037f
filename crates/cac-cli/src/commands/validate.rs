//! `cac validate`

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::{load_proposal, print_json, validation_engine};
use crate::config::CollectiveConfig;
use crate::error::{CliError, CliResult};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Proposal JSON file
    pub proposal: PathBuf,
}

/// Print the verdict; a rejected proposal is returned as [`CliError::Rejected`]
/// so the process exits non-zero.
pub async fn execute(args: ValidateArgs, config: &CollectiveConfig) -> CliResult<()> {
    let proposal = load_proposal(&args.proposal)?;
    let engine = validation_engine(config)?;

    let verdict = engine.validate(&proposal).await;
    info!(
        proposal_id = %verdict.proposal_id,
        approved = verdict.is_approved(),
        overall_score = verdict.overall_score,
        "Validation finished"
    );
    print_json(&verdict)?;

    if !verdict.is_approved() {
        return Err(CliError::Rejected {
            proposal_id: verdict.proposal_id.clone(),
            reasons: verdict.rejection_reasons(),
        });
    }
    Ok(())
}
