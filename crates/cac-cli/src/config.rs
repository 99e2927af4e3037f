//! Configuration for the cac CLI

use cac_router::RouterConfig;
use cac_simulation::SimulationConfig;
use cac_validation::ValidationConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Everything the evaluation core reads at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectiveConfig {
    /// Endpoints, routes and provider backends
    #[serde(default)]
    pub router: RouterConfig,

    /// Cost table, thresholds and axis weights
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Scenario parameters and economic constants
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or EnvFilter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CollectiveConfig {
    /// Layer defaults, an optional file and `CAC_` environment variables.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `CAC_VALIDATION__APPROVAL_THRESHOLD=7.5`.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&CollectiveConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CAC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Semantic checks for every section.
    pub fn validate(&self) -> CliResult<()> {
        self.router
            .validate()
            .map_err(|e| CliError::InvalidConfig(e.to_string()))?;
        self.validation
            .validate()
            .map_err(|e| CliError::InvalidConfig(e.to_string()))?;
        self.simulation
            .validate()
            .map_err(|e| CliError::InvalidConfig(e.to_string()))?;
        Ok(())
    }
}
