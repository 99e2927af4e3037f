//! Run lifecycle.
//!
//! ```text
//! Routed -> Validating -> Rejected
//!                      -> Validated -> Simulating -> Completed
//! ```

use cac_types::{RunId, ValidationVerdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Routed,
    Validating,
    Rejected,
    Validated,
    Simulating,
    Completed,
}

impl RunState {
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Routed => "routed",
            RunState::Validating => "validating",
            RunState::Rejected => "rejected",
            RunState::Validated => "validated",
            RunState::Simulating => "simulating",
            RunState::Completed => "completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Rejected | RunState::Completed)
    }

    pub fn can_transition_to(self, to: RunState) -> bool {
        matches!(
            (self, to),
            (RunState::Routed, RunState::Validating)
                | (RunState::Validating, RunState::Rejected)
                | (RunState::Validating, RunState::Validated)
                | (RunState::Validated, RunState::Simulating)
                | (RunState::Simulating, RunState::Completed)
        )
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: RunState,
    pub to: RunState,
    pub at: DateTime<Utc>,
}

/// Lifecycle history of one run. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: RunId,
    pub proposal_id: String,
    pub state: RunState,
    pub transitions: Vec<Transition>,
    pub started_at: DateTime<Utc>,
}

impl RunRecord {
    pub fn new(proposal_id: impl Into<String>) -> Self {
        Self {
            run_id: RunId::generate(),
            proposal_id: proposal_id.into(),
            state: RunState::Routed,
            transitions: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn advance(&mut self, to: RunState) -> PipelineResult<()> {
        if !self.state.can_transition_to(to) {
            return Err(PipelineError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        // Simulating is only reachable through `begin_simulation`.
        if to == RunState::Simulating {
            return Err(PipelineError::GateClosed {
                proposal_id: self.proposal_id.clone(),
            });
        }
        self.record(to);
        Ok(())
    }

    /// Validated -> Simulating, guarded by the verdict.
    pub fn begin_simulation(&mut self, verdict: &ValidationVerdict) -> PipelineResult<()> {
        if !self.state.can_transition_to(RunState::Simulating) {
            return Err(PipelineError::InvalidTransition {
                from: self.state,
                to: RunState::Simulating,
            });
        }
        if !verdict.is_approved() || verdict.proposal_id != self.proposal_id {
            return Err(PipelineError::GateClosed {
                proposal_id: self.proposal_id.clone(),
            });
        }
        self.record(RunState::Simulating);
        Ok(())
    }

    fn record(&mut self, to: RunState) {
        self.transitions.push(Transition {
            from: self.state,
            to,
            at: Utc::now(),
        });
        self.state = to;
    }

    /// True if the run ever entered `state`.
    pub fn visited(&self, state: RunState) -> bool {
        self.state == state || self.transitions.iter().any(|t| t.from == state || t.to == state)
    }
}
