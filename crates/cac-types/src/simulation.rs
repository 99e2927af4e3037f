use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::SimulationId;
use crate::scenario::ScenarioKind;

/// Economic figures for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEconomics {
    /// implementation_cost / cumulative reduction over the horizon.
    pub cost_per_tonne: f64,
    /// Return on investment over the horizon against the social cost of carbon.
    pub roi_10y_percent: f64,
    /// Years until the valued reduction covers the investment, if within horizon.
    pub payback_years: Option<f64>,
    /// Discounted value of the reduction minus the investment.
    pub net_present_value: f64,
}

/// Monthly projection under one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjection {
    pub scenario: ScenarioKind,
    pub adoption_rate: f64,
    pub efficiency_factor: f64,
    /// Tonnes CO2 avoided per month, one entry per month of the horizon.
    pub monthly: Vec<f64>,
    pub cumulative_total: f64,
    pub peak_monthly: f64,
    pub economics: ScenarioEconomics,
}

impl ScenarioProjection {
    /// Running sum of the monthly series.
    pub fn cumulative_series(&self) -> Vec<f64> {
        self.monthly
            .iter()
            .scan(0.0, |total, month| {
                *total += month;
                Some(*total)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityScore {
    /// Mean of the three factors, in [0, 10].
    pub score: f64,
    pub cost_factor: f64,
    pub timeline_factor: f64,
    pub coordination_factor: f64,
}

/// Spread between scenarios. Never collapsed into the point estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub point: f64,
    pub high: f64,
}

/// Realistic cumulative total restated in everyday units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equivalents {
    pub car_years: f64,
    pub tree_years: f64,
}

/// Bass diffusion estimate of public uptake over the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialAdoption {
    pub adoption_share: f64,
    /// Cumulative adoption share sampled at each year end.
    pub yearly_curve: Vec<f64>,
}

/// Impact projection for one proposal, produced once per simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub id: SimulationId,
    pub proposal_id: String,
    pub horizon_months: u32,
    pub scenarios: BTreeMap<ScenarioKind, ScenarioProjection>,
    /// Realistic scenario economics.
    pub headline: ScenarioEconomics,
    pub feasibility: FeasibilityScore,
    pub confidence_interval: ConfidenceInterval,
    pub equivalents: Equivalents,
    pub social_adoption: SocialAdoption,
    pub simulated_at: DateTime<Utc>,
}

impl SimulationResult {
    pub fn scenario(&self, kind: ScenarioKind) -> Option<&ScenarioProjection> {
        self.scenarios.get(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumulative_series_ends_at_total() {
        let projection = ScenarioProjection {
            scenario: ScenarioKind::Realistic,
            adoption_rate: 0.6,
            efficiency_factor: 0.85,
            monthly: vec![1.0, 2.0, 3.5],
            cumulative_total: 6.5,
            peak_monthly: 3.5,
            economics: ScenarioEconomics {
                cost_per_tonne: 10.0,
                roi_10y_percent: 0.0,
                payback_years: None,
                net_present_value: 0.0,
            },
        };

        assert_eq!(projection.cumulative_series(), vec![1.0, 3.0, 6.5]);
    }
}
