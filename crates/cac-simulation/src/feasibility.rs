//! Feasibility score: cost, timeline and coordination burden.

use cac_types::{FeasibilityScore, Proposal};

use crate::config::FeasibilityConfig;

fn inverse_normalized(value: f64, reference: f64) -> f64 {
    (10.0 / (1.0 + value / reference)).clamp(0.0, 10.0)
}

pub fn assess(proposal: &Proposal, config: &FeasibilityConfig) -> FeasibilityScore {
    let cost_factor = inverse_normalized(proposal.implementation_cost, config.cost_reference);
    let timeline_factor = inverse_normalized(
        proposal.timeline_months as f64,
        config.timeline_reference_months,
    );
    let excess = proposal
        .stakeholders
        .len()
        .saturating_sub(config.stakeholder_allowance);
    let coordination_factor = (10.0 - config.stakeholder_penalty * excess as f64).clamp(0.0, 10.0);

    FeasibilityScore {
        score: (cost_factor + timeline_factor + coordination_factor) / 3.0,
        cost_factor,
        timeline_factor,
        coordination_factor,
    }
}
