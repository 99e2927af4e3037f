//! Physical coherence, judged by the validate capability.
//!
//! The capability may be unavailable or reply with garbage; either way the
//! axis degrades to `validation_unavailable` instead of failing the run.
//! A degraded axis blocks approval until someone reviews the proposal.

use cac_router::{DispatchOptions, ResponseShape, TaskDispatcher};
use cac_types::{Axis, AxisResult, Proposal, TaskKind};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{deducted_score, AxisOutcome};
use crate::config::ValidationConfig;

pub const VALIDATION_UNAVAILABLE: &str = "validation_unavailable";
pub const MANUAL_REVIEW: &str = "Physical validation unavailable - manual review required";

/// Reply expected from the capability.
#[derive(Debug, Clone, Deserialize)]
struct PhysicalReview {
    valid: bool,
    #[serde(default)]
    issues: Vec<String>,
    /// Findings the capability considers disqualifying on their own.
    #[serde(default)]
    blocking_issues: Vec<String>,
    #[serde(default)]
    order_of_magnitude_error: bool,
    /// The capability's own estimate of the annual reduction, if it made one.
    #[serde(default)]
    implied_reduction_tonnes: Option<f64>,
    #[serde(default)]
    recommendations: Vec<String>,
}

pub(crate) fn prompt(proposal: &Proposal) -> String {
    format!(
        "Assess the physical coherence of this climate action proposal.\n\
         \n\
         Domain: {domain}\n\
         Title: {title}\n\
         Mechanism: {description}\n\
         Claimed CO2 reduction: {co2} tonnes per year\n\
         Implementation timeline: {timeline} months\n\
         Stakeholders: {stakeholders}\n\
         \n\
         Check whether the reduction figure is realistic for the mechanism, \
         whether its order of magnitude is right, and whether any physical law \
         is violated. Flag any figure that is off by a factor of 10 or more. \
         List under blocking_issues only findings that make the proposal \
         unacceptable regardless of its other merits.\n\
         \n\
         Reply ONLY with a JSON object:\n\
         {{\"valid\": true|false, \"issues\": [\"...\"], \"blocking_issues\": [\"...\"], \
         \"order_of_magnitude_error\": true|false, \
         \"implied_reduction_tonnes\": number|null, \"recommendations\": [\"...\"]}}",
        domain = proposal.domain,
        title = proposal.title,
        description = proposal.description,
        co2 = proposal.co2_reduction_estimate,
        timeline = proposal.timeline_months,
        stakeholders = if proposal.stakeholders.is_empty() {
            "none listed".to_string()
        } else {
            proposal.stakeholders.join(", ")
        },
    )
}

fn degraded(penalty: f64) -> AxisOutcome {
    AxisOutcome {
        result: AxisResult {
            axis: Axis::Physical,
            valid: false,
            score: deducted_score(1, penalty),
            issues: vec![VALIDATION_UNAVAILABLE.to_string()],
        },
        blocking: vec![VALIDATION_UNAVAILABLE.to_string()],
        recommendations: vec![MANUAL_REVIEW.to_string()],
    }
}

fn magnitude_finding(claimed: f64, implied: f64, factor: f64) -> Option<String> {
    if !(implied.is_finite() && implied > 0.0) {
        return None;
    }
    let ratio = if claimed >= implied {
        claimed / implied
    } else {
        implied / claimed
    };
    (ratio >= factor).then(|| {
        format!(
            "order_of_magnitude_error: claimed {} t/yr against a physically implied {} t/yr ({:.1}x)",
            claimed, implied, ratio
        )
    })
}

/// Ask the validate capability for a physical coherence review.
pub async fn assess(
    proposal: &Proposal,
    config: &ValidationConfig,
    dispatcher: &dyn TaskDispatcher,
) -> AxisOutcome {
    let options = DispatchOptions::default()
        .with_temperature(config.physical.temperature)
        .with_max_tokens(config.physical.max_tokens)
        .with_shape(ResponseShape::json_object(["valid", "issues"]));

    let response = match dispatcher
        .dispatch(TaskKind::Validate, &proposal.domain, &prompt(proposal), options)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!(proposal_id = %proposal.id, error = %e, "Physical coherence check unavailable");
            return degraded(config.issue_penalty);
        }
    };

    let review: PhysicalReview = match response.json.map(serde_json::from_value::<PhysicalReview>) {
        Some(Ok(review)) => review,
        Some(Err(e)) => {
            warn!(proposal_id = %proposal.id, error = %e, "Physical review reply has wrong field types");
            return degraded(config.issue_penalty);
        }
        None => {
            warn!(proposal_id = %proposal.id, "Physical review reply carried no JSON");
            return degraded(config.issue_penalty);
        }
    };

    let mut issues = review.issues;
    let mut blocking: Vec<String> = review
        .blocking_issues
        .into_iter()
        .map(|issue| format!("physical_violation: {}", issue))
        .collect();

    if let Some(finding) = review
        .implied_reduction_tonnes
        .and_then(|implied| {
            magnitude_finding(
                proposal.co2_reduction_estimate,
                implied,
                config.physical.magnitude_factor,
            )
        })
    {
        blocking.push(finding);
    } else if review.order_of_magnitude_error {
        blocking.push(format!(
            "order_of_magnitude_error: claimed {} t/yr flagged as off by {}x or more",
            proposal.co2_reduction_estimate, config.physical.magnitude_factor
        ));
    }
    issues.extend(blocking.iter().cloned());

    let valid = review.valid && blocking.is_empty();
    let counted = if valid { issues.len() } else { issues.len().max(1) };

    debug!(
        proposal_id = %proposal.id,
        endpoint = %response.decision.endpoint,
        valid,
        issues = issues.len(),
        "Physical review received"
    );

    AxisOutcome {
        result: AxisResult {
            axis: Axis::Physical,
            valid,
            score: deducted_score(counted, config.issue_penalty),
            issues,
        },
        blocking,
        recommendations: review.recommendations,
    }
}
