use serde::{Deserialize, Serialize};

/// Logical unit of model work the router can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Generate,
    Validate,
    Synthesize,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Generate, TaskKind::Validate, TaskKind::Synthesize];

    /// Validation and synthesis replies are consumed by code, not people.
    pub fn expects_json(self) -> bool {
        matches!(self, TaskKind::Validate | TaskKind::Synthesize)
    }

    /// Sampling temperature used when the caller does not set one.
    pub fn default_temperature(self) -> f32 {
        match self {
            TaskKind::Generate => 0.7,
            TaskKind::Validate | TaskKind::Synthesize => 0.2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Generate => "generate",
            TaskKind::Validate => "validate",
            TaskKind::Synthesize => "synthesize",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
