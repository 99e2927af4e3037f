use cac_simulation::SimulationError;
use cac_types::RunId;
use thiserror::Error;

use crate::state::RunState;

/// Errors from an artifact sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a run ended without reaching a terminal state.
///
/// Every variant names the state the run stopped in. A rejection is not an
/// error; it is a completed run with a `Rejected` final state.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("run {run_id} cancelled in state {state}")]
    Cancelled { run_id: RunId, state: RunState },

    #[error("invalid transition {from} -> {to}")]
    InvalidTransition { from: RunState, to: RunState },

    #[error("simulation gate closed for proposal {proposal_id}: verdict is not approved")]
    GateClosed { proposal_id: String },

    #[error("simulation failed in state {state}: {source}")]
    Simulation {
        state: RunState,
        #[source]
        source: SimulationError,
    },

    #[error("publishing failed in state {state}: {source}")]
    Publish {
        state: RunState,
        #[source]
        source: SinkError,
    },
}

impl PipelineError {
    /// State the run was in when it stopped, where one applies.
    pub fn state(&self) -> Option<RunState> {
        match self {
            PipelineError::Cancelled { state, .. }
            | PipelineError::Simulation { state, .. }
            | PipelineError::Publish { state, .. } => Some(*state),
            PipelineError::InvalidTransition { from, .. } => Some(*from),
            PipelineError::GateClosed { .. } => Some(RunState::Validated),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
