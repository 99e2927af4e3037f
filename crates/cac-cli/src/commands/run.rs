//! `cac run`

use std::path::PathBuf;
use std::sync::Arc;

use cac_pipeline::{
    ArtifactSink, CancellationToken, InMemorySink, JsonDirectorySink, PipelineCoordinator,
};
use cac_types::TaskKind;
use clap::Args;
use tracing::{error, info, warn};

use super::{load_proposal, simulation_engine, validation_engine};
use crate::config::CollectiveConfig;
use crate::error::{CliError, CliResult};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Proposal JSON files, evaluated concurrently up to the validate route's capacity
    #[arg(required = true)]
    pub proposals: Vec<PathBuf>,

    /// Write verdict and simulation files here
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

pub async fn execute(args: RunArgs, config: &CollectiveConfig) -> CliResult<()> {
    let proposals = args
        .proposals
        .iter()
        .map(|path| load_proposal(path))
        .collect::<CliResult<Vec<_>>>()?;

    let sink: Arc<dyn ArtifactSink> = match args.output_dir {
        Some(dir) => Arc::new(JsonDirectorySink::new(dir)),
        None => Arc::new(InMemorySink::new()),
    };
    let coordinator = PipelineCoordinator::new(
        Arc::new(validation_engine(config)?),
        simulation_engine(config)?,
        sink,
    )
    .with_max_concurrent_runs(config.router.route_capacity(TaskKind::Validate));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling runs");
            on_interrupt.cancel();
        }
    });

    let results = coordinator.run_batch(&proposals, &cancel).await;
    let total = results.len();
    let mut failed = 0;

    for (proposal, result) in proposals.iter().zip(results) {
        match result {
            Ok(report) => {
                let verdict = report.verdict();
                info!(
                    proposal_id = %proposal.id,
                    run_id = %report.record.run_id,
                    state = %report.state(),
                    overall_score = verdict.overall_score,
                    "Run finished"
                );
                println!(
                    "{}\t{}\t{:.2}",
                    proposal.id,
                    report.state(),
                    verdict.overall_score
                );
                for issue in &verdict.blocking_issues {
                    println!("  blocking: {}", issue);
                }
                if let Some(simulation) = report.simulation() {
                    let range = &simulation.confidence_interval;
                    println!(
                        "  reduction over {} months: {:.1} t ({:.1} - {:.1}), {:.2} per tonne",
                        simulation.horizon_months,
                        range.point,
                        range.low,
                        range.high,
                        simulation.headline.cost_per_tonne
                    );
                }
            }
            Err(e) => {
                failed += 1;
                error!(proposal_id = %proposal.id, error = %e, "Run failed");
                println!("{}\tfailed\t{}", proposal.id, e);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::RunsFailed { failed, total });
    }
    Ok(())
}
