//! Pipeline coordinator for proposal evaluation.
//!
//! Each run moves through a fixed lifecycle:
//!
//! `Routed -> Validating -> (Rejected | Validated) -> Simulating -> Completed`
//!
//! Simulation only starts from an approved verdict: no blocking issue and a
//! score at or above the approval threshold. Runs can be cancelled between
//! stages; a cancelled or failed run publishes nothing.

pub mod cancel;
pub mod coordinator;
pub mod error;
pub mod sink;
pub mod state;

pub use cancel::CancellationToken;
pub use coordinator::{PipelineCoordinator, RunReport};
pub use error::{PipelineError, PipelineResult, SinkError};
pub use sink::{ArtifactSink, EvaluationArtifact, InMemorySink, JsonDirectorySink};
pub use state::{RunRecord, RunState, Transition};
