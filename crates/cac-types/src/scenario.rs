use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Adoption/efficiency assumption set used by the simulation engine.
///
/// Ordering follows optimism, so `Pessimistic < Realistic < Optimistic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Pessimistic,
    Realistic,
    Optimistic,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::Pessimistic,
        ScenarioKind::Realistic,
        ScenarioKind::Optimistic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioKind::Pessimistic => "pessimistic",
            ScenarioKind::Realistic => "realistic",
            ScenarioKind::Optimistic => "optimistic",
        }
    }
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scenario: {0}")]
pub struct ParseScenarioError(pub String);

impl FromStr for ScenarioKind {
    type Err = ParseScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pessimistic" => Ok(ScenarioKind::Pessimistic),
            "realistic" => Ok(ScenarioKind::Realistic),
            "optimistic" => Ok(ScenarioKind::Optimistic),
            _ => Err(ParseScenarioError(s.to_string())),
        }
    }
}
