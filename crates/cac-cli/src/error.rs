//! CLI error types

use thiserror::Error;

/// CLI errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot read proposal {path}: {source}")]
    ProposalRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed proposal {path}: {source}")]
    ProposalParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Router error: {0}")]
    Router(#[from] cac_router::RouterError),

    #[error("Validation error: {0}")]
    Validation(#[from] cac_validation::ValidationError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] cac_simulation::SimulationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Proposal {proposal_id} rejected: {}", reasons.join("; "))]
    Rejected {
        proposal_id: String,
        reasons: Vec<String>,
    },

    #[error("{failed} of {total} runs did not finish")]
    RunsFailed { failed: usize, total: usize },
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
