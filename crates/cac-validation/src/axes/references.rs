//! Reference quality: weighted count of vetted, recent sources, plus an
//! optional capability review of the list.
//!
//! The review shares the validate route with the physical axis, so the
//! engine runs it only once the physical call has released its slot.

use cac_router::{DispatchOptions, ResponseShape, TaskDispatcher};
use cac_types::{Axis, AxisResult, ClaimKind, Proposal, ScientificReference, SourceQuality, TaskKind};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use super::AxisOutcome;
use crate::config::{ReferencePolicy, ValidationConfig};

pub const REVIEW_UNAVAILABLE: &str = "reference_review_unavailable";

/// Why a reference did or did not count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceStanding {
    Qualifying(f64),
    Unvetted,
    Stale { window: i32 },
    FutureDated,
}

pub fn standing(
    reference: &ScientificReference,
    policy: &ReferencePolicy,
    evaluation_year: i32,
) -> ReferenceStanding {
    let weight = match reference.quality {
        SourceQuality::PeerReviewed => policy.peer_reviewed_weight,
        SourceQuality::Institutional => policy.institutional_weight,
        SourceQuality::Grey | SourceQuality::Unknown => 0.0,
    };
    if weight <= 0.0 {
        return ReferenceStanding::Unvetted;
    }

    let age = evaluation_year - reference.year;
    if age < 0 {
        return ReferenceStanding::FutureDated;
    }
    let window = match reference.claim {
        ClaimKind::Data => policy.data_window_years,
        ClaimKind::Principle => policy.principle_window_years,
    };
    if age > window {
        return ReferenceStanding::Stale { window };
    }
    ReferenceStanding::Qualifying(weight)
}

#[derive(Debug, Deserialize)]
struct ReferenceReview {
    #[serde(default)]
    issues: Vec<String>,
}

fn review_prompt(proposal: &Proposal) -> String {
    let listing: Vec<String> = proposal
        .scientific_references
        .iter()
        .map(|r| format!("- {} ({})", r.title, r.year))
        .collect();
    format!(
        "A climate action proposal titled \"{}\" in the {} domain cites:\n{}\n\n\
         Are these sources relevant to the claim, and is an essential reference missing? \
         Reply ONLY with a JSON object: {{\"issues\": [\"...\"]}}",
        proposal.title,
        proposal.domain,
        listing.join("\n")
    )
}

/// Ask the validate capability whether the cited sources fit the claim.
///
/// Never fails: an outage or unusable reply becomes a non-blocking
/// `reference_review_unavailable` issue.
pub async fn review(proposal: &Proposal, dispatcher: &dyn TaskDispatcher) -> Vec<String> {
    let options = DispatchOptions::default().with_shape(ResponseShape::json_object(["issues"]));
    match dispatcher
        .dispatch(TaskKind::Validate, &proposal.domain, &review_prompt(proposal), options)
        .await
    {
        Ok(response) => match response.json.map(serde_json::from_value::<ReferenceReview>) {
            Some(Ok(review)) => review
                .issues
                .into_iter()
                .map(|issue| format!("reference_review: {}", issue))
                .collect(),
            _ => {
                warn!(proposal_id = %proposal.id, "Reference review reply unusable");
                vec![REVIEW_UNAVAILABLE.to_string()]
            }
        },
        Err(e) => {
            warn!(proposal_id = %proposal.id, error = %e, "Reference review unavailable");
            vec![REVIEW_UNAVAILABLE.to_string()]
        }
    }
}

/// Score the cited sources. The optional capability review is run
/// separately through [`review`].
pub fn assess(proposal: &Proposal, config: &ValidationConfig) -> AxisOutcome {
    let policy = &config.references;
    let year = policy.evaluation_year.unwrap_or_else(|| Utc::now().year());

    let mut issues = Vec::new();
    let mut weighted = 0.0;
    let mut qualifying = 0usize;

    for reference in &proposal.scientific_references {
        match standing(reference, policy, year) {
            ReferenceStanding::Qualifying(weight) => {
                weighted += weight;
                qualifying += 1;
            }
            ReferenceStanding::Unvetted => issues.push(format!(
                "unvetted_reference: '{}' is neither peer-reviewed nor institutional",
                reference.title
            )),
            ReferenceStanding::Stale { window } => issues.push(format!(
                "stale_reference: '{}' ({}) is older than {} years",
                reference.title, reference.year, window
            )),
            ReferenceStanding::FutureDated => issues.push(format!(
                "future_dated_reference: '{}' is dated {}",
                reference.title, reference.year
            )),
        }
    }

    let mut blocking = Vec::new();
    if qualifying < policy.min_qualifying {
        let finding = format!(
            "insufficient_references: {} qualifying reference(s), at least {} required",
            qualifying, policy.min_qualifying
        );
        issues.push(finding.clone());
        blocking.push(finding);
    }

    let score = (10.0 * weighted / policy.saturation).clamp(0.0, 10.0);
    debug!(proposal_id = %proposal.id, qualifying, weighted, score, "References weighed");

    AxisOutcome {
        result: AxisResult {
            axis: Axis::References,
            valid: blocking.is_empty(),
            score,
            issues,
        },
        blocking,
        recommendations: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(year: i32, quality: SourceQuality, claim: ClaimKind) -> ScientificReference {
        ScientificReference {
            title: "r".into(),
            year,
            quality,
            claim,
        }
    }

    #[test]
    fn data_claims_age_faster_than_principles() {
        let policy = ReferencePolicy::default();
        let old = reference(2017, SourceQuality::PeerReviewed, ClaimKind::Data);
        assert_eq!(standing(&old, &policy, 2025), ReferenceStanding::Stale { window: 5 });

        let principle = reference(2017, SourceQuality::PeerReviewed, ClaimKind::Principle);
        assert_eq!(
            standing(&principle, &policy, 2025),
            ReferenceStanding::Qualifying(1.0)
        );
    }

    #[test]
    fn institutional_sources_count_with_lower_weight() {
        let policy = ReferencePolicy::default();
        let ipcc = reference(2023, SourceQuality::Institutional, ClaimKind::Data);
        assert_eq!(standing(&ipcc, &policy, 2025), ReferenceStanding::Qualifying(0.75));
    }

    #[test]
    fn grey_literature_never_qualifies() {
        let policy = ReferencePolicy::default();
        let blog = reference(2025, SourceQuality::Grey, ClaimKind::Data);
        assert_eq!(standing(&blog, &policy, 2025), ReferenceStanding::Unvetted);
    }

    #[test]
    fn future_years_are_flagged() {
        let policy = ReferencePolicy::default();
        let odd = reference(2031, SourceQuality::PeerReviewed, ClaimKind::Data);
        assert_eq!(standing(&odd, &policy, 2025), ReferenceStanding::FutureDated);
    }
}
