//! Advisory recommendations attached to every verdict.
//!
//! Recommendations never affect the gate.

use cac_types::{EconomicBand, EconomicSummary, Proposal};

/// Cost above which a proposal should be staged.
pub const VERY_HIGH_COST: f64 = 1_000_000_000.0;

/// Timeline above which milestones should be shortened.
pub const VERY_LONG_TIMELINE_MONTHS: i64 = 120;

/// Heuristics from the proposal itself plus whatever the axes suggested.
pub fn derive(
    proposal: &Proposal,
    economic: Option<&EconomicSummary>,
    from_axes: impl IntoIterator<Item = String>,
) -> Vec<String> {
    let mut out = Vec::new();

    if proposal.implementation_cost > VERY_HIGH_COST {
        out.push("Very high implementation cost - consider splitting into phases".to_string());
    }
    if proposal.timeline_months > VERY_LONG_TIMELINE_MONTHS {
        out.push("Very long timeline - consider shorter milestones".to_string());
    }
    if let Some(summary) = economic {
        if summary.band == EconomicBand::Poor {
            out.push(format!(
                "High cost per tonne CO2: {:.2} CHF/tonne - look for cheaper delivery or a larger reduction",
                summary.cost_per_tonne
            ));
        }
    }
    if proposal.stakeholders.is_empty() {
        out.push("No stakeholders identified - consider adding key actors".to_string());
    }
    if proposal.risks.is_empty() {
        out.push("No risks identified - consider potential obstacles".to_string());
    }

    for recommendation in from_axes {
        if !out.contains(&recommendation) {
            out.push(recommendation);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cac_types::{Domain, ProbabilityClass};

    #[test]
    fn bare_proposal_gets_actor_and_risk_advice() {
        let proposal = Proposal::builder("a", Domain::Agriculture)
            .cost(50_000.0)
            .timeline_months(12)
            .build();
        let recs = derive(&proposal, None, Vec::new());
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("stakeholders"));
    }

    #[test]
    fn large_slow_poor_proposal_collects_everything() {
        let proposal = Proposal::builder("i", Domain::Industry)
            .cost(2_000_000_000.0)
            .timeline_months(180)
            .stakeholder("Cement producers")
            .risk("Clinker supply", ProbabilityClass::Medium, "Long-term contracts")
            .build();
        let summary = EconomicSummary {
            cost_per_tonne: 900.0,
            band: EconomicBand::Poor,
        };
        let recs = derive(&proposal, Some(&summary), vec!["Add a pilot plant".to_string()]);
        assert_eq!(recs.len(), 4);
        assert!(recs[2].contains("900.00"));
        assert_eq!(recs[3], "Add a pilot plant");
    }

    #[test]
    fn axis_recommendations_are_deduplicated() {
        let proposal = Proposal::builder("e", Domain::Energy)
            .stakeholder("Utility")
            .risk("Delay", ProbabilityClass::Low, "Buffer")
            .build();
        let recs = derive(&proposal, None, vec!["x".to_string(), "x".to_string()]);
        assert_eq!(recs, vec!["x".to_string()]);
    }
}
