//! Capability provider contract.
//!
//! A provider is any text-generation backend. The router only ever sees the
//! raw text it returns; parsing and shape checks happen router-side.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cac_types::{Domain, TaskKind};
use serde::Serialize;

use crate::error::ProviderError;

/// Uniform call payload handed to every provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityRequest {
    pub task_kind: TaskKind,
    pub domain: Domain,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Trait implemented by every text-generation backend.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Capability id this provider serves.
    fn capability(&self) -> &str;

    /// Run one completion. Timeouts are enforced by the caller.
    async fn call(&self, request: &CapabilityRequest) -> Result<String, ProviderError>;
}

/// Capability id → provider lookup used when building a router.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn CapabilityProvider>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.providers.keys().collect();
        names.sort();
        f.debug_struct("ProviderRegistry")
            .field("capabilities", &names)
            .finish()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own capability id. Replaces any previous one.
    pub fn register(&mut self, provider: Arc<dyn CapabilityProvider>) {
        self.providers
            .insert(provider.capability().to_string(), provider);
    }

    pub fn with(mut self, provider: Arc<dyn CapabilityProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn get(&self, capability: &str) -> Option<Arc<dyn CapabilityProvider>> {
        self.providers.get(capability).cloned()
    }

    pub fn contains(&self, capability: &str) -> bool {
        self.providers.contains_key(capability)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
