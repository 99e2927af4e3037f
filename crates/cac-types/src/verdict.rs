use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::ids::VerdictId;

/// The four coherence axes checked after the structural gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Physical,
    Economic,
    Temporal,
    References,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Axis::Physical => "physical",
            Axis::Economic => "economic",
            Axis::Temporal => "temporal",
            Axis::References => "references",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisResult {
    pub axis: Axis,
    pub valid: bool,
    /// Sub-score in [0, 10].
    pub score: f64,
    pub issues: Vec<String>,
}

/// Cost-effectiveness band, best first.
///
/// The derived ordering is used to check that a costlier proposal never
/// lands in a better band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomicBand {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

impl std::fmt::Display for EconomicBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EconomicBand::Excellent => "excellent",
            EconomicBand::Good => "good",
            EconomicBand::Acceptable => "acceptable",
            EconomicBand::Poor => "poor",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicSummary {
    /// implementation_cost / (annual estimate x 10 years).
    pub cost_per_tonne: f64,
    pub band: EconomicBand,
}

/// Per-axis breakdown, present only when the structural check passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisResults {
    pub physical: AxisResult,
    pub economic: AxisResult,
    pub temporal: AxisResult,
    pub references: AxisResult,
    pub economic_summary: Option<EconomicSummary>,
}

impl AxisResults {
    pub fn iter(&self) -> impl Iterator<Item = &AxisResult> {
        [&self.physical, &self.economic, &self.temporal, &self.references].into_iter()
    }
}

/// Coherence verdict for one proposal, produced once per validation run.
///
/// Never edited after construction; a re-validation produces a new verdict
/// with a new id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub id: VerdictId,
    pub proposal_id: String,
    pub domain: Domain,
    /// Structural failures. Non-empty means no axis ran.
    pub structural_issues: Vec<String>,
    pub axes: Option<AxisResults>,
    /// Weighted mean of the axis sub-scores, in [0, 10].
    pub overall_score: f64,
    /// Score the verdict was gated against.
    pub approval_threshold: f64,
    pub blocking_issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub validated_at: DateTime<Utc>,
}

impl ValidationVerdict {
    /// Hard publication gate: no blocking issue and a passing score.
    pub fn is_approved(&self) -> bool {
        self.blocking_issues.is_empty() && self.overall_score >= self.approval_threshold
    }

    pub fn structurally_valid(&self) -> bool {
        self.structural_issues.is_empty()
    }

    /// Human-readable reasons for a rejection. Empty when approved.
    pub fn rejection_reasons(&self) -> Vec<String> {
        if self.is_approved() {
            return Vec::new();
        }
        let mut reasons = self.blocking_issues.clone();
        if self.overall_score < self.approval_threshold {
            reasons.push(format!(
                "overall score {:.2} below approval threshold {:.2}",
                self.overall_score, self.approval_threshold
            ));
        }
        reasons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(score: f64, blocking: Vec<String>) -> ValidationVerdict {
        ValidationVerdict {
            id: VerdictId::generate(),
            proposal_id: "transport-001".into(),
            domain: Domain::Transport,
            structural_issues: vec![],
            axes: None,
            overall_score: score,
            approval_threshold: 7.0,
            blocking_issues: blocking,
            recommendations: vec![],
            validated_at: Utc::now(),
        }
    }

    #[test]
    fn approval_requires_score_and_no_blockers() {
        assert!(verdict(7.0, vec![]).is_approved());
        assert!(!verdict(6.99, vec![]).is_approved());
        assert!(!verdict(9.5, vec!["too costly".into()]).is_approved());
    }

    #[test]
    fn rejection_reasons_mention_low_score() {
        let reasons = verdict(5.0, vec![]).rejection_reasons();
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("below approval threshold"));
    }

    #[test]
    fn economic_band_orders_best_first() {
        assert!(EconomicBand::Excellent < EconomicBand::Good);
        assert!(EconomicBand::Acceptable < EconomicBand::Poor);
    }
}
