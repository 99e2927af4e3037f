//! Validation engine configuration.
//!
//! The domain cost table and every threshold are injected here; the axis
//! logic reads them and never carries its own constants.

use std::collections::BTreeMap;

use cac_types::{Domain, EconomicBand};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Cost-per-tonne cutoffs for one domain. Must be strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBands {
    pub excellent: f64,
    pub good: f64,
    pub acceptable: f64,
}

impl CostBands {
    pub const fn new(excellent: f64, good: f64, acceptable: f64) -> Self {
        Self {
            excellent,
            good,
            acceptable,
        }
    }

    /// First band whose cutoff the value is strictly below; `Poor` otherwise.
    pub fn classify(&self, cost_per_tonne: f64) -> EconomicBand {
        if cost_per_tonne < self.excellent {
            EconomicBand::Excellent
        } else if cost_per_tonne < self.good {
            EconomicBand::Good
        } else if cost_per_tonne < self.acceptable {
            EconomicBand::Acceptable
        } else {
            EconomicBand::Poor
        }
    }

    fn is_well_formed(&self) -> bool {
        self.excellent.is_finite()
            && self.acceptable.is_finite()
            && self.excellent > 0.0
            && self.excellent < self.good
            && self.good < self.acceptable
    }
}

/// Per-domain cost-per-tonne bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostThresholdTable(BTreeMap<Domain, CostBands>);

impl Default for CostThresholdTable {
    fn default() -> Self {
        let table = [
            (Domain::Transport, CostBands::new(150.0, 400.0, 600.0)),
            (Domain::Energy, CostBands::new(100.0, 300.0, 500.0)),
            (Domain::Building, CostBands::new(80.0, 250.0, 450.0)),
            (Domain::Agriculture, CostBands::new(50.0, 200.0, 400.0)),
            (Domain::Industry, CostBands::new(200.0, 500.0, 700.0)),
            (Domain::CrossCutting, CostBands::new(100.0, 350.0, 550.0)),
        ];
        Self(table.into_iter().collect())
    }
}

impl CostThresholdTable {
    pub fn bands(&self, domain: &Domain) -> Option<&CostBands> {
        self.0.get(domain)
    }

    pub fn set(&mut self, domain: Domain, bands: CostBands) {
        self.0.insert(domain, bands);
    }

    fn validate(&self) -> ValidationResult<()> {
        for domain in Domain::RECOGNIZED.iter() {
            let bands = self.0.get(domain).ok_or_else(|| {
                ValidationError::InvalidConfig(format!("no cost bands for domain {}", domain))
            })?;
            if !bands.is_well_formed() {
                return Err(ValidationError::InvalidConfig(format!(
                    "cost bands for {} must be positive and strictly increasing",
                    domain
                )));
            }
        }
        if let Some(stray) = self.0.keys().find(|d| !d.is_recognized()) {
            return Err(ValidationError::InvalidConfig(format!(
                "cost bands given for unrecognized domain {}",
                stray
            )));
        }
        Ok(())
    }
}

/// Aggregation weights. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisWeights {
    pub physical: f64,
    pub economic: f64,
    pub temporal: f64,
    pub references: f64,
}

impl Default for AxisWeights {
    fn default() -> Self {
        Self {
            physical: 0.4,
            economic: 0.3,
            temporal: 0.15,
            references: 0.15,
        }
    }
}

impl AxisWeights {
    fn validate(&self) -> ValidationResult<()> {
        let weights = [self.physical, self.economic, self.temporal, self.references];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ValidationError::InvalidConfig(
                "axis weights must be non-negative".into(),
            ));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ValidationError::InvalidConfig(format!(
                "axis weights sum to {sum}, expected 1"
            )));
        }
        Ok(())
    }
}

/// Reference-quality heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencePolicy {
    /// Maximum age in years for a reference backing a data claim.
    pub data_window_years: i32,
    /// Maximum age in years for a reference backing a general principle.
    pub principle_window_years: i32,
    /// Fewer qualifying references than this is blocking.
    pub min_qualifying: usize,
    /// Weighted count at which the axis scores 10.
    pub saturation: f64,
    pub peer_reviewed_weight: f64,
    pub institutional_weight: f64,
    /// Year ages are computed against. Current UTC year when unset.
    pub evaluation_year: Option<i32>,
    /// Ask the validate capability to review the reference list too.
    pub capability_review: bool,
}

impl Default for ReferencePolicy {
    fn default() -> Self {
        Self {
            data_window_years: 5,
            principle_window_years: 10,
            min_qualifying: 2,
            saturation: 4.0,
            peer_reviewed_weight: 1.0,
            institutional_weight: 0.75,
            evaluation_year: None,
            capability_review: false,
        }
    }
}

/// Physical coherence capability call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalReviewConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Claimed / implied ratio (either way) at which a figure is blocking.
    pub magnitude_factor: f64,
}

impl Default for PhysicalReviewConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 1_500,
            magnitude_factor: 10.0,
        }
    }
}

/// Complete validation engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub cost_thresholds: CostThresholdTable,
    pub axis_weights: AxisWeights,
    /// Minimum overall score for approval.
    pub approval_threshold: f64,
    /// Sub-score deduction per issue on issue-counted axes.
    pub issue_penalty: f64,
    /// Cost per tonne above `acceptable x multiplier` is blocking.
    pub blocking_cost_multiplier: f64,
    /// Upper bound on a credible annual reduction, tonnes/year.
    pub max_co2_reduction: f64,
    /// Minimum number of cited references, qualifying or not.
    pub min_references: usize,
    pub max_timeline_months: i64,
    /// Allowed relative gap between summed phase durations and the timeline.
    pub phase_tolerance: f64,
    pub references: ReferencePolicy,
    pub physical: PhysicalReviewConfig,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            cost_thresholds: CostThresholdTable::default(),
            axis_weights: AxisWeights::default(),
            approval_threshold: 7.0,
            issue_penalty: 2.5,
            blocking_cost_multiplier: 2.0,
            max_co2_reduction: 1_000_000.0,
            min_references: 2,
            max_timeline_months: 120,
            phase_tolerance: 0.10,
            references: ReferencePolicy::default(),
            physical: PhysicalReviewConfig::default(),
        }
    }
}

impl ValidationConfig {
    /// Semantic checks run at engine construction.
    pub fn validate(&self) -> ValidationResult<()> {
        self.cost_thresholds.validate()?;
        self.axis_weights.validate()?;

        if !(0.0..=10.0).contains(&self.approval_threshold) {
            return Err(ValidationError::InvalidConfig(format!(
                "approval_threshold {} outside [0, 10]",
                self.approval_threshold
            )));
        }
        if !(self.issue_penalty > 0.0 && self.issue_penalty <= 10.0) {
            return Err(ValidationError::InvalidConfig(
                "issue_penalty must be in (0, 10]".into(),
            ));
        }
        if !(self.blocking_cost_multiplier >= 1.0) {
            return Err(ValidationError::InvalidConfig(
                "blocking_cost_multiplier must be at least 1".into(),
            ));
        }
        if !(self.max_co2_reduction > 0.0) {
            return Err(ValidationError::InvalidConfig(
                "max_co2_reduction must be positive".into(),
            ));
        }
        if self.max_timeline_months < 1 {
            return Err(ValidationError::InvalidConfig(
                "max_timeline_months must be at least 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.phase_tolerance) {
            return Err(ValidationError::InvalidConfig(
                "phase_tolerance must be in [0, 1)".into(),
            ));
        }

        let refs = &self.references;
        if refs.data_window_years < 0 || refs.principle_window_years < 0 {
            return Err(ValidationError::InvalidConfig(
                "reference windows must not be negative".into(),
            ));
        }
        if !(refs.saturation > 0.0) {
            return Err(ValidationError::InvalidConfig(
                "reference saturation must be positive".into(),
            ));
        }
        if refs.peer_reviewed_weight < 0.0 || refs.institutional_weight < 0.0 {
            return Err(ValidationError::InvalidConfig(
                "reference weights must not be negative".into(),
            ));
        }

        if !(self.physical.magnitude_factor > 1.0) {
            return Err(ValidationError::InvalidConfig(
                "physical.magnitude_factor must exceed 1".into(),
            ));
        }
        Ok(())
    }
}
