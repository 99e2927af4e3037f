//! Command implementations

pub mod run;
pub mod simulate;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use cac_router::{HttpCapabilityProvider, ProviderRegistry, TaskRouter};
use cac_simulation::SimulationEngine;
use cac_types::Proposal;
use cac_validation::ValidationEngine;
use serde::Serialize;
use tracing::debug;

use crate::config::CollectiveConfig;
use crate::error::{CliError, CliResult};

/// Read one proposal from a JSON file.
pub fn load_proposal(path: &Path) -> CliResult<Proposal> {
    let display = path.display().to_string();
    let raw = std::fs::read(path).map_err(|source| CliError::ProposalRead {
        path: display.clone(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| CliError::ProposalParse {
        path: display,
        source,
    })
}

/// Register one HTTP provider per configured backend.
pub fn provider_registry(config: &CollectiveConfig) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for provider in &config.router.providers {
        debug!(capability = %provider.capability, url = %provider.url, "Registering provider");
        registry.register(Arc::new(HttpCapabilityProvider::from_config(provider)));
    }
    registry
}

pub fn validation_engine(config: &CollectiveConfig) -> CliResult<ValidationEngine> {
    let router = TaskRouter::new(config.router.clone(), &provider_registry(config))?;
    Ok(ValidationEngine::new(
        config.validation.clone(),
        Arc::new(router),
    )?)
}

pub fn simulation_engine(config: &CollectiveConfig) -> CliResult<SimulationEngine> {
    Ok(SimulationEngine::new(config.simulation.clone())?)
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
