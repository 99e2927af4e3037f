//! Economic coherence: cost per tonne over ten years against domain bands.

use cac_types::{Axis, AxisResult, EconomicBand, EconomicSummary, Proposal};

use super::AxisOutcome;
use crate::config::ValidationConfig;

/// Years of the annual estimate the cost is spread over.
pub const AMORTIZATION_YEARS: f64 = 10.0;

pub fn cost_per_tonne(proposal: &Proposal) -> f64 {
    proposal.implementation_cost / (proposal.co2_reduction_estimate * AMORTIZATION_YEARS)
}

fn band_score(band: EconomicBand) -> f64 {
    match band {
        EconomicBand::Excellent => 10.0,
        EconomicBand::Good => 8.5,
        EconomicBand::Acceptable => 7.0,
        EconomicBand::Poor => 4.0,
    }
}

/// Assess the proposal. Returns the outcome plus the band summary, which is
/// `None` only when the domain has no bands configured.
pub fn assess(proposal: &Proposal, config: &ValidationConfig) -> (AxisOutcome, Option<EconomicSummary>) {
    let Some(bands) = config.cost_thresholds.bands(&proposal.domain) else {
        let issue = format!("no cost bands configured for domain {}", proposal.domain);
        return (
            AxisOutcome::from_issues(Axis::Economic, vec![issue], Vec::new(), config.issue_penalty),
            None,
        );
    };

    let cpt = cost_per_tonne(proposal);
    let band = bands.classify(cpt);
    let blocking_cutoff = bands.acceptable * config.blocking_cost_multiplier;

    let mut issues = Vec::new();
    let mut blocking = Vec::new();
    let score = if cpt > blocking_cutoff {
        let finding = format!(
            "economic_implausibility: cost per tonne {:.2} exceeds {:.2}, {}x the acceptable cutoff for {}",
            cpt, blocking_cutoff, config.blocking_cost_multiplier, proposal.domain
        );
        issues.push(finding.clone());
        blocking.push(finding);
        0.0
    } else {
        if band == EconomicBand::Poor {
            issues.push(format!(
                "poor_cost_effectiveness: cost per tonne {:.2} is above the acceptable cutoff {:.2} for {}",
                cpt, bands.acceptable, proposal.domain
            ));
        }
        band_score(band)
    };

    let outcome = AxisOutcome {
        result: AxisResult {
            axis: Axis::Economic,
            valid: band != EconomicBand::Poor,
            score,
            issues,
        },
        blocking,
        recommendations: Vec::new(),
    };
    let summary = EconomicSummary {
        cost_per_tonne: cpt,
        band,
    };
    (outcome, Some(summary))
}
