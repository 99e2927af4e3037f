//! Router configuration.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use cac_types::TaskKind;
use serde::{Deserialize, Serialize};

use crate::error::{RouterError, RouterResult};

/// Complete router configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Every endpoint the router may call.
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,

    /// Ordered candidate endpoint names per task kind, primary first.
    #[serde(default)]
    pub routes: BTreeMap<TaskKind, Vec<String>>,

    /// Backend connection details, keyed by capability id.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,

    /// Token budget used when the caller does not set one.
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
}

/// One callable endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Name used in routes and log events.
    pub name: String,

    /// Capability id resolved against the provider registry.
    pub capability: String,

    /// Maximum in-flight calls on this endpoint.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-call timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl EndpointConfig {
    pub fn new(name: impl Into<String>, capability: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capability: capability.into(),
            max_concurrency: default_max_concurrency(),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Connection details for an OpenAI-compatible chat completions backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub capability: String,
    /// Base URL, e.g. `http://deepseek-service:8000/v1`.
    pub url: String,
    pub model: String,
    /// Environment variable holding a bearer token, if the backend needs one.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        let endpoint = |name: &str, timeout_ms: u64| EndpointConfig {
            name: name.to_string(),
            capability: name.to_string(),
            max_concurrency: default_max_concurrency(),
            timeout_ms,
        };
        let provider = |name: &str, host: &str, model: &str| ProviderConfig {
            capability: name.to_string(),
            url: format!("http://{}:8000/v1", host),
            model: model.to_string(),
            api_key_env: None,
        };

        let mut routes = BTreeMap::new();
        routes.insert(
            TaskKind::Generate,
            vec!["mistral-large".to_string(), "llama-3-3".to_string()],
        );
        routes.insert(
            TaskKind::Validate,
            vec!["deepseek-r1".to_string(), "mistral-large".to_string()],
        );
        routes.insert(
            TaskKind::Synthesize,
            vec!["llama-3-3".to_string(), "mistral-large".to_string()],
        );

        Self {
            endpoints: vec![
                endpoint("mistral-large", 60_000),
                endpoint("deepseek-r1", 45_000),
                endpoint("llama-3-3", 30_000),
            ],
            routes,
            providers: vec![
                provider("mistral-large", "mistral-large-service", "mistral-large"),
                provider("deepseek-r1", "deepseek-service", "deepseek-r1"),
                provider("llama-3-3", "llama-service", "llama-3.3"),
            ],
            default_max_tokens: default_max_tokens(),
        }
    }
}

impl RouterConfig {
    /// Empty configuration, filled in by tests and embedders.
    pub fn empty() -> Self {
        Self {
            endpoints: Vec::new(),
            routes: BTreeMap::new(),
            providers: Vec::new(),
            default_max_tokens: default_max_tokens(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    pub fn with_route<I, S>(mut self, task_kind: TaskKind, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routes
            .insert(task_kind, candidates.into_iter().map(Into::into).collect());
        self
    }

    pub fn endpoint(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Calls the route for `task_kind` can hold in flight across all of its
    /// endpoints. Zero when the route is missing.
    pub fn route_capacity(&self, task_kind: TaskKind) -> usize {
        self.routes
            .get(&task_kind)
            .map(|candidates| {
                candidates
                    .iter()
                    .filter_map(|name| self.endpoint(name))
                    .map(|endpoint| endpoint.max_concurrency)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Check names, limits and route references.
    pub fn validate(&self) -> RouterResult<()> {
        let mut seen = HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.name.trim().is_empty() {
                return Err(RouterError::InvalidConfig("endpoint with empty name".into()));
            }
            if !seen.insert(endpoint.name.as_str()) {
                return Err(RouterError::InvalidConfig(format!(
                    "duplicate endpoint name: {}",
                    endpoint.name
                )));
            }
            if endpoint.max_concurrency == 0 {
                return Err(RouterError::InvalidConfig(format!(
                    "endpoint {} has max_concurrency 0",
                    endpoint.name
                )));
            }
            if endpoint.timeout_ms == 0 {
                return Err(RouterError::InvalidConfig(format!(
                    "endpoint {} has timeout_ms 0",
                    endpoint.name
                )));
            }
        }

        for (task_kind, candidates) in &self.routes {
            if candidates.is_empty() {
                return Err(RouterError::InvalidConfig(format!(
                    "route for {} has no candidates",
                    task_kind
                )));
            }
            if let Some(missing) = candidates.iter().find(|name| !seen.contains(name.as_str())) {
                return Err(RouterError::InvalidConfig(format!(
                    "route for {} references unknown endpoint {}",
                    task_kind, missing
                )));
            }
        }

        Ok(())
    }
}

// Default value helpers
fn default_max_concurrency() -> usize {
    4
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_tokens() -> u32 {
    2_000
}
