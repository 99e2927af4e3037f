//! Simulation engine configuration.
//!
//! Scenario parameters and policy constants are injected here. The curve
//! steepness and the social cost of carbon are tunable policy parameters;
//! their defaults are starting points, not calibrated values.

use std::collections::BTreeMap;

use cac_types::ScenarioKind;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// `(adoption_rate, efficiency_factor)` for one scenario, both in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub adoption_rate: f64,
    pub efficiency_factor: f64,
}

impl ScenarioParameters {
    pub const fn new(adoption_rate: f64, efficiency_factor: f64) -> Self {
        Self {
            adoption_rate,
            efficiency_factor,
        }
    }
}

/// Parameters per scenario. All three scenarios must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioTable(BTreeMap<ScenarioKind, ScenarioParameters>);

impl Default for ScenarioTable {
    fn default() -> Self {
        Self(
            [
                (ScenarioKind::Pessimistic, ScenarioParameters::new(0.30, 0.70)),
                (ScenarioKind::Realistic, ScenarioParameters::new(0.60, 0.85)),
                (ScenarioKind::Optimistic, ScenarioParameters::new(0.90, 0.95)),
            ]
            .into_iter()
            .collect(),
        )
    }
}

impl ScenarioTable {
    pub fn get(&self, kind: ScenarioKind) -> Option<&ScenarioParameters> {
        self.0.get(&kind)
    }

    pub fn set(&mut self, kind: ScenarioKind, parameters: ScenarioParameters) {
        self.0.insert(kind, parameters);
    }

    fn validate(&self) -> Result<(), SimulationError> {
        let mut previous: Option<(ScenarioKind, ScenarioParameters)> = None;
        for kind in ScenarioKind::ALL {
            let params = *self.0.get(&kind).ok_or_else(|| {
                SimulationError::InvalidConfig(format!("scenario {} is not configured", kind))
            })?;
            let in_unit = |v: f64| v > 0.0 && v <= 1.0;
            if !in_unit(params.adoption_rate) || !in_unit(params.efficiency_factor) {
                return Err(SimulationError::InvalidConfig(format!(
                    "scenario {} rates must be in (0, 1]",
                    kind
                )));
            }
            if let Some((prev_kind, prev)) = previous {
                if params.adoption_rate < prev.adoption_rate
                    || params.efficiency_factor < prev.efficiency_factor
                {
                    return Err(SimulationError::InvalidConfig(format!(
                        "scenario {} is less favourable than {}",
                        kind, prev_kind
                    )));
                }
            }
            previous = Some((kind, params));
        }
        Ok(())
    }
}

/// How steep the logistic uptake curve is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CurveSteepness {
    /// Choose `k` so uptake reaches `target_fraction` of the adoption rate at
    /// the end of the proposal timeline.
    Derived { target_fraction: f64 },
    /// Use this `k` (per month) regardless of timeline.
    Fixed { k: f64 },
}

impl Default for CurveSteepness {
    fn default() -> Self {
        CurveSteepness::Derived {
            target_fraction: 0.95,
        }
    }
}

impl CurveSteepness {
    /// Steepness for a given timeline in months.
    pub fn k(&self, timeline_months: f64) -> f64 {
        match *self {
            CurveSteepness::Derived { target_fraction } => {
                2.0 * (target_fraction / (1.0 - target_fraction)).ln() / timeline_months
            }
            CurveSteepness::Fixed { k } => k,
        }
    }

    fn validate(&self) -> Result<(), SimulationError> {
        match *self {
            CurveSteepness::Derived { target_fraction }
                if !(target_fraction > 0.5 && target_fraction < 1.0) =>
            {
                Err(SimulationError::InvalidConfig(
                    "curve.target_fraction must be in (0.5, 1)".into(),
                ))
            }
            CurveSteepness::Fixed { k } if !(k.is_finite() && k > 0.0) => Err(
                SimulationError::InvalidConfig("curve.k must be positive".into()),
            ),
            _ => Ok(()),
        }
    }
}

/// Feasibility normalisation. Each factor is `10 / (1 + value / reference)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeasibilityConfig {
    /// Cost at which the cost factor drops to 5.
    pub cost_reference: f64,
    /// Timeline in months at which the timeline factor drops to 5.
    pub timeline_reference_months: f64,
    /// Stakeholders coordinated without penalty.
    pub stakeholder_allowance: usize,
    /// Deduction per stakeholder beyond the allowance.
    pub stakeholder_penalty: f64,
}

impl Default for FeasibilityConfig {
    fn default() -> Self {
        Self {
            cost_reference: 50_000_000.0,
            timeline_reference_months: 60.0,
            stakeholder_allowance: 3,
            stakeholder_penalty: 1.0,
        }
    }
}

/// Bass diffusion coefficients for the social adoption projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdoptionConfig {
    pub innovation: f64,
    pub imitation: f64,
}

impl Default for AdoptionConfig {
    fn default() -> Self {
        Self {
            innovation: 0.02,
            imitation: 0.38,
        }
    }
}

/// Yearly tonnes used to restate reductions in everyday units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquivalentsConfig {
    pub tonnes_per_car_year: f64,
    pub tonnes_per_tree_year: f64,
}

impl Default for EquivalentsConfig {
    fn default() -> Self {
        Self {
            tonnes_per_car_year: 4.6,
            tonnes_per_tree_year: 0.025,
        }
    }
}

/// Complete simulation engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub scenarios: ScenarioTable,
    pub horizon_months: u32,
    pub curve: CurveSteepness,
    /// Currency per tonne of CO2 avoided.
    pub social_cost_of_carbon: f64,
    /// Annual rate used for the net present value.
    pub discount_rate: f64,
    pub feasibility: FeasibilityConfig,
    pub adoption: AdoptionConfig,
    pub equivalents: EquivalentsConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scenarios: ScenarioTable::default(),
            horizon_months: 120,
            curve: CurveSteepness::default(),
            social_cost_of_carbon: 100.0,
            discount_rate: 0.03,
            feasibility: FeasibilityConfig::default(),
            adoption: AdoptionConfig::default(),
            equivalents: EquivalentsConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.scenarios.validate()?;
        self.curve.validate()?;

        if self.horizon_months == 0 {
            return Err(SimulationError::InvalidConfig(
                "horizon_months must be positive".into(),
            ));
        }
        if !(self.social_cost_of_carbon.is_finite() && self.social_cost_of_carbon > 0.0) {
            return Err(SimulationError::InvalidConfig(
                "social_cost_of_carbon must be positive".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.discount_rate) {
            return Err(SimulationError::InvalidConfig(
                "discount_rate must be in [0, 1)".into(),
            ));
        }

        let f = &self.feasibility;
        if !(f.cost_reference > 0.0 && f.timeline_reference_months > 0.0) {
            return Err(SimulationError::InvalidConfig(
                "feasibility references must be positive".into(),
            ));
        }
        if f.stakeholder_penalty < 0.0 {
            return Err(SimulationError::InvalidConfig(
                "feasibility.stakeholder_penalty must not be negative".into(),
            ));
        }

        let a = &self.adoption;
        if !(a.innovation > 0.0 && a.imitation >= 0.0 && a.innovation + a.imitation <= 1.0) {
            return Err(SimulationError::InvalidConfig(
                "adoption coefficients must be positive and sum to at most 1".into(),
            ));
        }

        let e = &self.equivalents;
        if !(e.tonnes_per_car_year > 0.0 && e.tonnes_per_tree_year > 0.0) {
            return Err(SimulationError::InvalidConfig(
                "equivalent factors must be positive".into(),
            ));
        }
        Ok(())
    }
}
