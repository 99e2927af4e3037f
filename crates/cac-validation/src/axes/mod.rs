//! Coherence axes evaluated after the structural gate.

pub mod economic;
pub mod physical;
pub mod references;
pub mod temporal;

use cac_types::{Axis, AxisResult};

/// What one axis contributes to a verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisOutcome {
    pub result: AxisResult,
    /// Findings that unconditionally reject the proposal. Also listed in
    /// `result.issues`.
    pub blocking: Vec<String>,
    pub recommendations: Vec<String>,
}

impl AxisOutcome {
    /// Issue-counted axis: 10 when clean, minus `penalty` per issue.
    pub(crate) fn from_issues(axis: Axis, issues: Vec<String>, blocking: Vec<String>, penalty: f64) -> Self {
        let score = deducted_score(issues.len(), penalty);
        Self {
            result: AxisResult {
                axis,
                valid: issues.is_empty(),
                score,
                issues,
            },
            blocking,
            recommendations: Vec::new(),
        }
    }
}

pub(crate) fn deducted_score(issue_count: usize, penalty: f64) -> f64 {
    (10.0 - penalty * issue_count as f64).clamp(0.0, 10.0)
}
