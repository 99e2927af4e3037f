use thiserror::Error;

/// Errors from the simulation engine. All of them end the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid simulation input: {0}")]
    InvalidInput(String),

    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("invalid simulation configuration: {0}")]
    InvalidConfig(String),
}
