//! Shared records for the proposal evaluation core.
//!
//! A [`Proposal`] enters the pipeline read-only. Every stage emits its own
//! immutable record keyed by the proposal identifier:
//!
//! - [`ValidationVerdict`] from the validation engine
//! - [`SimulationResult`] from the simulation engine
//!
//! The enums here ([`Domain`], [`TaskKind`], [`ScenarioKind`]) are the tags
//! every other crate dispatches on.

pub mod domain;
pub mod ids;
pub mod proposal;
pub mod scenario;
pub mod simulation;
pub mod task;
pub mod verdict;

pub use domain::Domain;
pub use ids::{RunId, SimulationId, VerdictId};
pub use proposal::{
    ClaimKind, ImplementationPhase, Interdependency, ProbabilityClass, Proposal, ProposalBuilder,
    Risk, ScientificReference, SourceQuality,
};
pub use scenario::{ParseScenarioError, ScenarioKind};
pub use simulation::{
    ConfidenceInterval, Equivalents, FeasibilityScore, ScenarioEconomics, ScenarioProjection,
    SimulationResult, SocialAdoption,
};
pub use task::TaskKind;
pub use verdict::{Axis, AxisResult, AxisResults, EconomicBand, EconomicSummary, ValidationVerdict};
