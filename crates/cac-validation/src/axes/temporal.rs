//! Temporal coherence: timeline bound and phase plan consistency.

use cac_types::{Axis, Proposal};

use super::AxisOutcome;
use crate::config::ValidationConfig;

pub fn assess(proposal: &Proposal, config: &ValidationConfig) -> AxisOutcome {
    let mut issues = Vec::new();
    let timeline = proposal.timeline_months;

    if timeline > config.max_timeline_months {
        issues.push(format!(
            "timeline_too_long: {} months exceeds the {}-month horizon",
            timeline, config.max_timeline_months
        ));
    }

    if !proposal.phases.is_empty() {
        let declared: u64 = proposal
            .phases
            .iter()
            .map(|p| u64::from(p.duration_months))
            .sum();
        let gap = (declared as f64 - timeline as f64).abs();
        if gap > config.phase_tolerance * timeline as f64 {
            issues.push(format!(
                "phase_duration_mismatch: phases sum to {} months against a {}-month timeline",
                declared, timeline
            ));
        }

        for phase in proposal.phases.iter().filter(|p| p.duration_months == 0) {
            issues.push(format!("empty_phase: '{}' has zero duration", phase.name));
        }

        for pair in proposal.phases.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            if next.start_month < previous.end_month() {
                issues.push(format!(
                    "phase_overlap: '{}' starts at month {} before '{}' ends at month {}",
                    next.name,
                    next.start_month,
                    previous.name,
                    previous.end_month()
                ));
            }
        }
    }

    AxisOutcome::from_issues(Axis::Temporal, issues, Vec::new(), config.issue_penalty)
}
