//! Task router for the evaluation core.
//!
//! Maps each task kind to an ordered list of capability endpoints and
//! dispatches work to the first endpoint with a free concurrency slot.
//!
//! ## Dispatch rules
//!
//! - Each endpoint call is bounded by that endpoint's timeout.
//! - Timeouts and transport failures are retried once on the same endpoint,
//!   then the next candidate in the route is tried.
//! - Malformed or off-shape replies are returned to the caller as-is; they
//!   are neither retried nor failed over.
//! - Every attempt emits exactly one structured log event.

pub mod config;
pub mod error;
pub mod http;
pub mod mocks;
pub mod provider;
pub mod response;
pub mod router;

pub use config::{EndpointConfig, ProviderConfig, RouterConfig};
pub use error::{AttemptError, AttemptFailure, ProviderError, RouterError, RouterResult};
pub use http::HttpCapabilityProvider;
pub use mocks::{MockOutcome, MockProvider};
pub use provider::{CapabilityProvider, CapabilityRequest, ProviderRegistry};
pub use response::{check_shape, extract_json, ResponseShape};
pub use router::{DispatchOptions, DispatchResponse, RouteDecision, TaskDispatcher, TaskRouter};
