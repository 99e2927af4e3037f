//! Structural gate.
//!
//! Runs before any axis. Every finding is blocking and carries the
//! `invalid_proposal_structure` prefix.

use cac_types::Proposal;

use crate::config::ValidationConfig;

pub const STRUCTURE_ISSUE_PREFIX: &str = "invalid_proposal_structure";

fn issue(detail: impl std::fmt::Display) -> String {
    format!("{}: {}", STRUCTURE_ISSUE_PREFIX, detail)
}

/// Check the data-model invariants. Empty means the proposal may proceed.
pub fn check(proposal: &Proposal, config: &ValidationConfig) -> Vec<String> {
    let mut issues = Vec::new();

    if proposal.id.trim().is_empty() {
        issues.push(issue("missing id"));
    }
    if proposal.title.trim().is_empty() {
        issues.push(issue("missing title"));
    }
    if proposal.description.trim().is_empty() {
        issues.push(issue("missing description"));
    }
    if !proposal.domain.is_recognized() {
        issues.push(issue(format_args!(
            "unrecognized domain '{}'",
            proposal.domain
        )));
    }

    let co2 = proposal.co2_reduction_estimate;
    if !co2.is_finite() || co2 <= 0.0 {
        issues.push(issue(format_args!(
            "co2_reduction_estimate must be a positive number, got {}",
            co2
        )));
    } else if co2 > config.max_co2_reduction {
        issues.push(issue(format_args!(
            "co2_reduction_estimate {} t/yr exceeds the {} t/yr ceiling",
            co2, config.max_co2_reduction
        )));
    }

    let cost = proposal.implementation_cost;
    if !cost.is_finite() || cost <= 0.0 {
        issues.push(issue(format_args!(
            "implementation_cost must be a positive number, got {}",
            cost
        )));
    }

    if proposal.timeline_months <= 0 {
        issues.push(issue(format_args!(
            "timeline_months must be positive, got {}",
            proposal.timeline_months
        )));
    }

    let cited = proposal.scientific_references.len();
    if cited < config.min_references {
        issues.push(issue(format_args!(
            "{} scientific reference(s) cited, at least {} required",
            cited, config.min_references
        )));
    }

    for dependency in &proposal.interdependencies {
        if !dependency.domain.is_recognized() {
            issues.push(issue(format_args!(
                "interdependency '{}' names unrecognized domain '{}'",
                dependency.id, dependency.domain
            )));
        } else if dependency.id.trim().is_empty() {
            issues.push(issue(format_args!(
                "interdependency in domain {} has no id",
                dependency.domain
            )));
        }
    }

    issues
}
