//! Deterministic impact simulation for validated proposals.
//!
//! For each scenario the annual reduction is spread over a logistic uptake
//! curve, extended to the horizon and summed. Economics, feasibility, a
//! confidence interval, everyday equivalents and a Bass social adoption
//! projection are derived from the series.

pub mod adoption;
pub mod config;
pub mod engine;
pub mod error;
pub mod feasibility;
pub mod projection;

pub use config::{
    AdoptionConfig, CurveSteepness, EquivalentsConfig, FeasibilityConfig, ScenarioParameters,
    ScenarioTable, SimulationConfig,
};
pub use engine::SimulationEngine;
pub use error::SimulationError;
pub use projection::UptakeCurve;
