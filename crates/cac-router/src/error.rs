use cac_types::TaskKind;
use thiserror::Error;

/// Failure reported by a capability provider for a single call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Why one attempt against one endpoint did not produce a reply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttemptError {
    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("no free concurrency slot")]
    CapacityExhausted,
}

/// One entry in the ordered failure trail of a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    pub endpoint: String,
    /// 1-based attempt number on this endpoint, 0 when never invoked.
    pub attempt: u8,
    pub error: AttemptError,
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}: {}", self.endpoint, self.attempt, self.error)
    }
}

fn render_failures(failures: &[AttemptFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors from the task router.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    #[error("no endpoint configured for task kind {0}")]
    NoRoute(TaskKind),

    #[error("every endpoint for {0} is at its concurrency limit")]
    CapacityExhausted(TaskKind),

    #[error("all endpoints failed for {task_kind}: {}", render_failures(.failures))]
    AllEndpointsFailed {
        task_kind: TaskKind,
        failures: Vec<AttemptFailure>,
    },

    #[error("malformed response from {endpoint}: {reason}")]
    ResponseFormat { endpoint: String, reason: String },

    #[error("response from {endpoint} does not match expected shape: {reason}")]
    SchemaMismatch { endpoint: String, reason: String },

    #[error("invalid router configuration: {0}")]
    InvalidConfig(String),
}

impl RouterError {
    /// Content errors are never retried and never fail over.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            RouterError::ResponseFormat { .. } | RouterError::SchemaMismatch { .. }
        )
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
