use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use cac_types::{Domain, TaskKind};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, instrument, warn};

use crate::config::{EndpointConfig, RouterConfig};
use crate::error::{AttemptError, AttemptFailure, RouterError, RouterResult};
use crate::provider::{CapabilityProvider, CapabilityRequest, ProviderRegistry};
use crate::response::{check_shape, ResponseShape};

/// Attempts per endpoint: the first call plus one retry.
const ATTEMPTS_PER_ENDPOINT: u8 = 2;

/// Per-call knobs. Unset values fall back to task-kind defaults.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Expected reply shape. `None` means JSON object for validate and
    /// synthesize tasks, free text for generate.
    pub shape: Option<ResponseShape>,
}

impl DispatchOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_shape(mut self, shape: ResponseShape) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// Which endpoint served a task. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDecision {
    pub task_kind: TaskKind,
    pub endpoint: String,
    pub capability: String,
    /// Position of the serving endpoint in the route, 0 = primary.
    pub candidate_index: usize,
    /// Total provider invocations made for this dispatch.
    pub attempts: u32,
    pub latency_ms: u64,
}

/// Successful dispatch: raw text plus the parsed JSON when one was expected.
#[derive(Debug, Clone)]
pub struct DispatchResponse {
    pub text: String,
    pub json: Option<Value>,
    pub decision: RouteDecision,
}

/// Dispatch seam used by the engines, so they can be driven by a router or
/// by a test double.
#[async_trait]
pub trait TaskDispatcher: Send + Sync {
    async fn dispatch(
        &self,
        task_kind: TaskKind,
        domain: &Domain,
        prompt: &str,
        options: DispatchOptions,
    ) -> RouterResult<DispatchResponse>;
}

struct EndpointSlot {
    config: EndpointConfig,
    provider: Arc<dyn CapabilityProvider>,
    permits: Arc<Semaphore>,
}

impl EndpointSlot {
    fn try_acquire(&self) -> Option<OwnedSemaphorePermit> {
        self.permits.clone().try_acquire_owned().ok()
    }
}

/// Routes tasks to capability endpoints.
///
/// Owns and meters each endpoint's concurrency slots; nothing else in the
/// system holds shared mutable state.
pub struct TaskRouter {
    config: RouterConfig,
    slots: HashMap<String, Arc<EndpointSlot>>,
}

impl std::fmt::Debug for TaskRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRouter")
            .field("routes", &self.config.routes)
            .field("endpoints", &self.slots.len())
            .finish()
    }
}

impl TaskRouter {
    /// Build a router. Every endpoint's capability must resolve in the registry.
    pub fn new(config: RouterConfig, registry: &ProviderRegistry) -> RouterResult<Self> {
        config.validate()?;

        let mut slots = HashMap::new();
        for endpoint in &config.endpoints {
            let provider = registry.get(&endpoint.capability).ok_or_else(|| {
                RouterError::InvalidConfig(format!(
                    "endpoint {} uses unregistered capability {}",
                    endpoint.name, endpoint.capability
                ))
            })?;
            slots.insert(
                endpoint.name.clone(),
                Arc::new(EndpointSlot {
                    config: endpoint.clone(),
                    provider,
                    permits: Arc::new(Semaphore::new(endpoint.max_concurrency)),
                }),
            );
        }

        info!(
            endpoints = slots.len(),
            routes = config.routes.len(),
            "Task router initialized"
        );

        Ok(Self { config, slots })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Free concurrency slots on an endpoint, if it exists.
    pub fn available_slots(&self, endpoint: &str) -> Option<usize> {
        self.slots.get(endpoint).map(|s| s.permits.available_permits())
    }

    fn candidates(&self, task_kind: TaskKind) -> RouterResult<Vec<Arc<EndpointSlot>>> {
        let names = self
            .config
            .routes
            .get(&task_kind)
            .ok_or(RouterError::NoRoute(task_kind))?;
        // Names are checked in `RouterConfig::validate`.
        Ok(names
            .iter()
            .filter_map(|name| self.slots.get(name).cloned())
            .collect())
    }

    /// Select an endpoint for the task and invoke it.
    ///
    /// The first candidate with a free slot is used. Timeouts and transport
    /// failures are retried once on the same endpoint, then the next
    /// candidate is tried. Content errors propagate immediately.
    #[instrument(skip_all, fields(task_kind = %task_kind, domain = %domain))]
    pub async fn dispatch(
        &self,
        task_kind: TaskKind,
        domain: &Domain,
        prompt: &str,
        options: DispatchOptions,
    ) -> RouterResult<DispatchResponse> {
        let candidates = self.candidates(task_kind)?;
        let shape = options.shape.clone().unwrap_or_else(|| {
            if task_kind.expects_json() {
                ResponseShape::json_object(Vec::<String>::new())
            } else {
                ResponseShape::Text
            }
        });
        let request = CapabilityRequest {
            task_kind,
            domain: domain.clone(),
            prompt: prompt.to_string(),
            temperature: options
                .temperature
                .unwrap_or_else(|| task_kind.default_temperature()),
            max_tokens: options.max_tokens.unwrap_or(self.config.default_max_tokens),
        };

        let started = Instant::now();
        let mut failures: Vec<AttemptFailure> = Vec::new();
        let mut selected = false;
        let mut invocations: u32 = 0;

        for (index, slot) in candidates.iter().enumerate() {
            let Some(permit) = slot.try_acquire() else {
                // Before selection, saturated candidates are skipped silently.
                if selected {
                    warn!(endpoint = %slot.config.name, "Failover candidate at capacity");
                    failures.push(AttemptFailure {
                        endpoint: slot.config.name.clone(),
                        attempt: 0,
                        error: AttemptError::CapacityExhausted,
                    });
                } else {
                    debug!(endpoint = %slot.config.name, "Candidate at capacity, skipping");
                }
                continue;
            };
            selected = true;

            for attempt in 1..=ATTEMPTS_PER_ENDPOINT {
                invocations += 1;
                match self.invoke(slot, &request, attempt).await {
                    Ok(raw) => {
                        drop(permit);
                        let decision = RouteDecision {
                            task_kind,
                            endpoint: slot.config.name.clone(),
                            capability: slot.config.capability.clone(),
                            candidate_index: index,
                            attempts: invocations,
                            latency_ms: started.elapsed().as_millis() as u64,
                        };
                        let json = check_shape(&slot.config.name, &raw, &shape)?;
                        return Ok(DispatchResponse {
                            text: raw,
                            json,
                            decision,
                        });
                    }
                    Err(error) => failures.push(AttemptFailure {
                        endpoint: slot.config.name.clone(),
                        attempt,
                        error,
                    }),
                }
            }
        }

        if !selected {
            warn!(task_kind = %task_kind, "No candidate endpoint has a free slot");
            return Err(RouterError::CapacityExhausted(task_kind));
        }

        warn!(
            task_kind = %task_kind,
            failures = failures.len(),
            "All candidate endpoints failed"
        );
        Err(RouterError::AllEndpointsFailed {
            task_kind,
            failures,
        })
    }

    /// One bounded provider call. Emits exactly one log event.
    async fn invoke(
        &self,
        slot: &EndpointSlot,
        request: &CapabilityRequest,
        attempt: u8,
    ) -> Result<String, AttemptError> {
        let started = Instant::now();
        let outcome = tokio::time::timeout(slot.config.timeout(), slot.provider.call(request)).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(raw)) => {
                info!(
                    endpoint = %slot.config.name,
                    task_kind = %request.task_kind,
                    domain = %request.domain,
                    attempt,
                    latency_ms,
                    outcome = "ok",
                    "Dispatch attempt"
                );
                Ok(raw)
            }
            Ok(Err(error)) => {
                warn!(
                    endpoint = %slot.config.name,
                    task_kind = %request.task_kind,
                    domain = %request.domain,
                    attempt,
                    latency_ms,
                    outcome = "error",
                    error = %error,
                    "Dispatch attempt"
                );
                Err(AttemptError::Provider(error))
            }
            Err(_) => {
                warn!(
                    endpoint = %slot.config.name,
                    task_kind = %request.task_kind,
                    domain = %request.domain,
                    attempt,
                    latency_ms,
                    outcome = "timeout",
                    "Dispatch attempt"
                );
                Err(AttemptError::Timeout {
                    timeout_ms: slot.config.timeout_ms,
                })
            }
        }
    }
}

#[async_trait]
impl TaskDispatcher for TaskRouter {
    async fn dispatch(
        &self,
        task_kind: TaskKind,
        domain: &Domain,
        prompt: &str,
        options: DispatchOptions,
    ) -> RouterResult<DispatchResponse> {
        TaskRouter::dispatch(self, task_kind, domain, prompt, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockOutcome, MockProvider};

    fn router_with(providers: Vec<Arc<MockProvider>>, timeout_ms: u64) -> TaskRouter {
        let mut config = RouterConfig::empty();
        let mut registry = ProviderRegistry::new();
        let mut names = Vec::new();
        for provider in providers {
            let name = provider.capability().to_string();
            config = config.with_endpoint(
                EndpointConfig::new(name.clone(), name.clone()).with_timeout_ms(timeout_ms),
            );
            names.push(name);
            registry.register(provider);
        }
        let config = config
            .with_route(TaskKind::Validate, names.clone())
            .with_route(TaskKind::Generate, names);
        TaskRouter::new(config, &registry).unwrap()
    }

    #[tokio::test]
    async fn primary_serves_when_healthy() {
        let primary = Arc::new(MockProvider::replying("primary", r#"{"valid":true}"#));
        let fallback = Arc::new(MockProvider::replying("fallback", r#"{"valid":false}"#));
        let router = router_with(vec![primary.clone(), fallback.clone()], 1_000);

        let response = router
            .dispatch(TaskKind::Validate, &Domain::Energy, "check", DispatchOptions::default())
            .await
            .unwrap();

        assert_eq!(response.decision.endpoint, "primary");
        assert_eq!(response.decision.candidate_index, 0);
        assert_eq!(response.json.unwrap()["valid"], true);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_retried_once_on_same_endpoint() {
        let primary = Arc::new(MockProvider::scripted(
            "primary",
            vec![
                MockOutcome::Fail("connection reset".into()),
                MockOutcome::Reply("draft text".into()),
            ],
        ));
        let router = router_with(vec![primary.clone()], 1_000);

        let response = router
            .dispatch(TaskKind::Generate, &Domain::Transport, "write", DispatchOptions::default())
            .await
            .unwrap();

        assert_eq!(response.text, "draft text");
        assert_eq!(response.decision.attempts, 2);
        assert_eq!(primary.call_count(), 2);
    }

    #[tokio::test]
    async fn all_failures_are_reported_in_order() {
        let a = Arc::new(MockProvider::failing("a", "down"));
        let b = Arc::new(MockProvider::failing("b", "down"));
        let router = router_with(vec![a, b], 1_000);

        let err = router
            .dispatch(TaskKind::Generate, &Domain::Industry, "x", DispatchOptions::default())
            .await
            .unwrap_err();

        match err {
            RouterError::AllEndpointsFailed { failures, .. } => {
                let trail: Vec<(String, u8)> = failures
                    .iter()
                    .map(|f| (f.endpoint.clone(), f.attempt))
                    .collect();
                assert_eq!(
                    trail,
                    vec![
                        ("a".to_string(), 1),
                        ("a".to_string(), 2),
                        ("b".to_string(), 1),
                        ("b".to_string(), 2)
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_not_retried() {
        let primary = Arc::new(MockProvider::replying("primary", "I think it is fine"));
        let fallback = Arc::new(MockProvider::replying("fallback", r#"{"valid":true}"#));
        let router = router_with(vec![primary.clone(), fallback.clone()], 1_000);

        let err = router
            .dispatch(TaskKind::Validate, &Domain::Energy, "check", DispatchOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RouterError::ResponseFormat { .. }));
        assert_eq!(primary.call_count(), 1);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn unrouted_task_kind_fails() {
        let router = router_with(vec![Arc::new(MockProvider::replying("a", "{}"))], 1_000);
        let err = router
            .dispatch(TaskKind::Synthesize, &Domain::Energy, "x", DispatchOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, RouterError::NoRoute(TaskKind::Synthesize));
    }

    #[test]
    fn unregistered_capability_is_rejected_at_construction() {
        let config = RouterConfig::empty()
            .with_endpoint(EndpointConfig::new("a", "missing"))
            .with_route(TaskKind::Validate, ["a"]);
        let err = TaskRouter::new(config, &ProviderRegistry::new()).unwrap_err();
        assert!(matches!(err, RouterError::InvalidConfig(_)));
    }
}
