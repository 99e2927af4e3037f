use std::sync::Arc;

use async_trait::async_trait;
use cac_router::TaskDispatcher;
use cac_types::{AxisResults, Proposal, ValidationVerdict, VerdictId};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::axes::{economic, physical, references, temporal};
use crate::config::ValidationConfig;
use crate::error::ValidationResult;
use crate::recommendations;
use crate::structural;

/// Anything that can turn a proposal into a verdict.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, proposal: &Proposal) -> ValidationVerdict;
}

/// Structural gate followed by the four coherence axes.
///
/// The physical axis and the optional reference review go through the
/// dispatcher, one after the other; everything else is computed locally.
/// An unavailable physical check blocks approval. Proposal problems are
/// reported on the verdict, never as errors.
pub struct ValidationEngine {
    config: ValidationConfig,
    dispatcher: Arc<dyn TaskDispatcher>,
}

impl ValidationEngine {
    pub fn new(config: ValidationConfig, dispatcher: Arc<dyn TaskDispatcher>) -> ValidationResult<Self> {
        config.validate()?;
        Ok(Self { config, dispatcher })
    }

    /// Configuration accessor.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate one proposal.
    #[instrument(skip_all, fields(proposal_id = %proposal.id, domain = %proposal.domain))]
    pub async fn validate(&self, proposal: &Proposal) -> ValidationVerdict {
        let structural_issues = structural::check(proposal, &self.config);
        if !structural_issues.is_empty() {
            warn!(
                proposal_id = %proposal.id,
                issues = structural_issues.len(),
                "Proposal failed structural validation"
            );
            return self.structural_rejection(proposal, structural_issues);
        }

        let dispatcher = self.dispatcher.as_ref();
        let (physical, economic, temporal, mut references) = futures::join!(
            physical::assess(proposal, &self.config, dispatcher),
            async { economic::assess(proposal, &self.config) },
            async { temporal::assess(proposal, &self.config) },
            async { references::assess(proposal, &self.config) },
        );
        let (economic, economic_summary) = economic;

        if self.config.references.capability_review {
            references
                .result
                .issues
                .extend(references::review(proposal, dispatcher).await);
        }

        let weights = &self.config.axis_weights;
        let overall_score = (physical.result.score * weights.physical
            + economic.result.score * weights.economic
            + temporal.result.score * weights.temporal
            + references.result.score * weights.references)
            .clamp(0.0, 10.0);

        let outcomes = [&physical, &economic, &temporal, &references];
        let blocking_issues: Vec<String> = outcomes
            .iter()
            .flat_map(|o| o.blocking.iter().cloned())
            .collect();
        let recommendations = recommendations::derive(
            proposal,
            economic_summary.as_ref(),
            outcomes
                .iter()
                .flat_map(|o| o.recommendations.iter().cloned()),
        );

        for outcome in outcomes {
            debug!(
                axis = %outcome.result.axis,
                valid = outcome.result.valid,
                score = outcome.result.score,
                "Axis evaluated"
            );
        }

        let verdict = ValidationVerdict {
            id: VerdictId::generate(),
            proposal_id: proposal.id.clone(),
            domain: proposal.domain.clone(),
            structural_issues: Vec::new(),
            axes: Some(AxisResults {
                physical: physical.result,
                economic: economic.result,
                temporal: temporal.result,
                references: references.result,
                economic_summary,
            }),
            overall_score,
            approval_threshold: self.config.approval_threshold,
            blocking_issues,
            recommendations,
            validated_at: Utc::now(),
        };

        info!(
            proposal_id = %proposal.id,
            overall_score = verdict.overall_score,
            blocking = verdict.blocking_issues.len(),
            approved = verdict.is_approved(),
            "Proposal validated"
        );
        verdict
    }

    fn structural_rejection(&self, proposal: &Proposal, issues: Vec<String>) -> ValidationVerdict {
        ValidationVerdict {
            id: VerdictId::generate(),
            proposal_id: proposal.id.clone(),
            domain: proposal.domain.clone(),
            structural_issues: issues.clone(),
            axes: None,
            overall_score: 0.0,
            approval_threshold: self.config.approval_threshold,
            blocking_issues: issues,
            recommendations: Vec::new(),
            validated_at: Utc::now(),
        }
    }
}

#[async_trait]
impl Validator for ValidationEngine {
    async fn validate(&self, proposal: &Proposal) -> ValidationVerdict {
        ValidationEngine::validate(self, proposal).await
    }
}
