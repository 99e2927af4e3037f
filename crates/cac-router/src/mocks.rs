use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::provider::{CapabilityProvider, CapabilityRequest};

/// One scripted reaction of a [`MockProvider`].
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return this text.
    Reply(String),
    /// Fail with a transport error carrying this message.
    Fail(String),
    /// Fail with an HTTP status.
    Status(u16),
    /// Wait this long, then reply.
    Delayed(Duration, String),
    /// Never complete within any sane timeout.
    Hang,
}

/// Mock capability provider for testing.
///
/// Plays back a script of outcomes, then falls back to a fixed outcome.
/// Every request it receives is recorded.
pub struct MockProvider {
    capability: String,
    script: Mutex<VecDeque<MockOutcome>>,
    fallback: MockOutcome,
    calls: AtomicUsize,
    requests: Mutex<Vec<CapabilityRequest>>,
}

impl MockProvider {
    pub fn new(capability: impl Into<String>, fallback: MockOutcome) -> Self {
        Self {
            capability: capability.into(),
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always reply with `text`.
    pub fn replying(capability: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(capability, MockOutcome::Reply(text.into()))
    }

    /// Always fail with a transport error.
    pub fn failing(capability: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(capability, MockOutcome::Fail(message.into()))
    }

    /// Never answer.
    pub fn hanging(capability: impl Into<String>) -> Self {
        Self::new(capability, MockOutcome::Hang)
    }

    /// Play `outcomes` in order, then fail every later call.
    pub fn scripted(capability: impl Into<String>, outcomes: Vec<MockOutcome>) -> Self {
        let provider = Self::new(capability, MockOutcome::Fail("script exhausted".into()));
        provider.push_all(outcomes);
        provider
    }

    pub fn push(&self, outcome: MockOutcome) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
    }

    pub fn push_all(&self, outcomes: impl IntoIterator<Item = MockOutcome>) {
        for outcome in outcomes {
            self.push(outcome);
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CapabilityRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn next_outcome(&self) -> MockOutcome {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl CapabilityProvider for MockProvider {
    fn capability(&self) -> &str {
        &self.capability
    }

    async fn call(&self, request: &CapabilityRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match self.next_outcome() {
            MockOutcome::Reply(text) => Ok(text),
            MockOutcome::Fail(message) => Err(ProviderError::Transport(message)),
            MockOutcome::Status(status) => Err(ProviderError::Status {
                status,
                body: String::new(),
            }),
            MockOutcome::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            MockOutcome::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(ProviderError::Transport("mock hang elapsed".into()))
            }
        }
    }
}
