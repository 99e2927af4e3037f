use std::sync::Arc;

use cac_simulation::SimulationEngine;
use cac_types::{Proposal, SimulationResult, ValidationVerdict};
use cac_validation::Validator;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

use crate::cancel::CancellationToken;
use crate::error::{PipelineError, PipelineResult};
use crate::sink::{ArtifactSink, EvaluationArtifact};
use crate::state::{RunRecord, RunState};

/// Outcome of a run that reached a terminal state.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub record: RunRecord,
    pub artifact: EvaluationArtifact,
}

impl RunReport {
    pub fn state(&self) -> RunState {
        self.record.state
    }

    pub fn verdict(&self) -> &ValidationVerdict {
        &self.artifact.verdict
    }

    pub fn simulation(&self) -> Option<&SimulationResult> {
        self.artifact.simulation.as_ref()
    }
}

/// Drives one proposal through validation, the approval gate, simulation
/// and publication.
///
/// Runs are independent; the coordinator holds no per-run state.
pub struct PipelineCoordinator {
    validator: Arc<dyn Validator>,
    simulator: SimulationEngine,
    sink: Arc<dyn ArtifactSink>,
    /// Batch runs in flight at once. The router refuses calls beyond an
    /// endpoint's limit, so this should not exceed the validate route's
    /// capacity.
    max_concurrent_runs: usize,
}

impl PipelineCoordinator {
    pub fn new(
        validator: Arc<dyn Validator>,
        simulator: SimulationEngine,
        sink: Arc<dyn ArtifactSink>,
    ) -> Self {
        Self {
            validator,
            simulator,
            sink,
            max_concurrent_runs: 1,
        }
    }

    /// Allow up to `limit` batch runs in flight. Zero is treated as one.
    pub fn with_max_concurrent_runs(mut self, limit: usize) -> Self {
        self.max_concurrent_runs = limit.max(1);
        self
    }

    pub fn max_concurrent_runs(&self) -> usize {
        self.max_concurrent_runs
    }

    fn checkpoint(record: &RunRecord, cancel: &CancellationToken) -> PipelineResult<()> {
        if cancel.is_cancelled() {
            warn!(run_id = %record.run_id, state = %record.state, "Run cancelled");
            return Err(PipelineError::Cancelled {
                run_id: record.run_id,
                state: record.state,
            });
        }
        Ok(())
    }

    async fn publish(
        &self,
        record: &RunRecord,
        status: RunState,
        verdict: ValidationVerdict,
        simulation: Option<SimulationResult>,
    ) -> PipelineResult<EvaluationArtifact> {
        let artifact = EvaluationArtifact {
            run_id: record.run_id,
            proposal_id: record.proposal_id.clone(),
            status,
            verdict,
            simulation,
            assembled_at: Utc::now(),
        };
        self.sink
            .publish(&artifact)
            .await
            .map_err(|source| PipelineError::Publish {
                state: record.state,
                source,
            })?;
        Ok(artifact)
    }

    /// Evaluate one proposal end to end.
    ///
    /// Returns a report for both rejected and completed runs. Errors mean the
    /// run stopped early; nothing partial is ever published.
    #[instrument(skip_all, fields(proposal_id = %proposal.id))]
    pub async fn run(
        &self,
        proposal: &Proposal,
        cancel: &CancellationToken,
    ) -> PipelineResult<RunReport> {
        let mut record = RunRecord::new(proposal.id.clone());
        info!(run_id = %record.run_id, proposal_id = %proposal.id, "Run started");

        Self::checkpoint(&record, cancel)?;
        record.advance(RunState::Validating)?;

        let verdict = self.validator.validate(proposal).await;
        // Discard the verdict if the run was cancelled while it was in flight.
        Self::checkpoint(&record, cancel)?;

        if !verdict.is_approved() {
            info!(
                run_id = %record.run_id,
                overall_score = verdict.overall_score,
                blocking = verdict.blocking_issues.len(),
                "Proposal rejected"
            );
            let artifact = self.publish(&record, RunState::Rejected, verdict, None).await?;
            record.advance(RunState::Rejected)?;
            return Ok(RunReport { record, artifact });
        }

        record.advance(RunState::Validated)?;
        Self::checkpoint(&record, cancel)?;
        record.begin_simulation(&verdict)?;

        let simulation = self
            .simulator
            .simulate(proposal)
            .map_err(|source| PipelineError::Simulation {
                state: record.state,
                source,
            })?;
        Self::checkpoint(&record, cancel)?;

        let artifact = self
            .publish(&record, RunState::Completed, verdict, Some(simulation))
            .await?;
        record.advance(RunState::Completed)?;

        info!(run_id = %record.run_id, proposal_id = %proposal.id, "Run completed");
        Ok(RunReport { record, artifact })
    }

    /// Evaluate independent proposals, at most `max_concurrent_runs` at a
    /// time. Results keep input order.
    pub async fn run_batch(
        &self,
        proposals: &[Proposal],
        cancel: &CancellationToken,
    ) -> Vec<PipelineResult<RunReport>> {
        info!(
            proposals = proposals.len(),
            max_concurrent_runs = self.max_concurrent_runs,
            "Batch started"
        );
        stream::iter(proposals.iter().map(|p| self.run(p, cancel)))
            .buffered(self.max_concurrent_runs)
            .collect()
            .await
    }
}
