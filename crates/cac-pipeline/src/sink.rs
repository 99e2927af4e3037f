//! Publishing collaborators.
//!
//! The coordinator hands each finished run to an [`ArtifactSink`] as one
//! opaque artifact. Sinks never see partial results.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cac_types::{RunId, SimulationResult, ValidationVerdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::SinkError;
use crate::state::RunState;

/// Everything a run produced, assembled once at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationArtifact {
    pub run_id: RunId,
    pub proposal_id: String,
    /// Terminal state the run is entering: rejected or completed.
    pub status: RunState,
    pub verdict: ValidationVerdict,
    /// Present only for completed runs.
    pub simulation: Option<SimulationResult>,
    pub assembled_at: DateTime<Utc>,
}

#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn publish(&self, artifact: &EvaluationArtifact) -> Result<(), SinkError>;
}

/// Append-only in-memory sink.
#[derive(Debug, Default)]
pub struct InMemorySink {
    artifacts: RwLock<Vec<EvaluationArtifact>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far, oldest first.
    pub async fn artifacts(&self) -> Vec<EvaluationArtifact> {
        self.artifacts.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.artifacts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.artifacts.read().await.is_empty()
    }
}

#[async_trait]
impl ArtifactSink for InMemorySink {
    async fn publish(&self, artifact: &EvaluationArtifact) -> Result<(), SinkError> {
        self.artifacts.write().await.push(artifact.clone());
        Ok(())
    }
}

/// Writes `<proposal-id>.verdict.json` and, for completed runs,
/// `<proposal-id>.simulation.json` into a directory.
#[derive(Debug, Clone)]
pub struct JsonDirectorySink {
    dir: PathBuf,
}

impl JsonDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the verdict for `proposal_id` is written to.
    pub fn verdict_path(&self, proposal_id: &str) -> PathBuf {
        self.dir.join(format!("{}.verdict.json", file_stem(proposal_id)))
    }

    /// Path the simulation for `proposal_id` is written to.
    pub fn simulation_path(&self, proposal_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}.simulation.json", file_stem(proposal_id)))
    }
}

/// Proposal ids are free-form; keep them from escaping the directory.
fn file_stem(proposal_id: &str) -> String {
    proposal_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl ArtifactSink for JsonDirectorySink {
    async fn publish(&self, artifact: &EvaluationArtifact) -> Result<(), SinkError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let verdict_path = self.verdict_path(&artifact.proposal_id);
        let verdict = serde_json::to_vec_pretty(&artifact.verdict)?;
        tokio::fs::write(&verdict_path, verdict).await?;
        debug!(path = %verdict_path.display(), "Verdict written");

        if let Some(simulation) = &artifact.simulation {
            let simulation_path = self.simulation_path(&artifact.proposal_id);
            let body = serde_json::to_vec_pretty(simulation)?;
            tokio::fs::write(&simulation_path, body).await?;
            debug!(path = %simulation_path.display(), "Simulation written");
        }
        Ok(())
    }
}
