use std::collections::BTreeMap;

use cac_types::{
    ConfidenceInterval, Equivalents, Proposal, ScenarioKind, ScenarioProjection, SimulationId,
    SimulationResult,
};
use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::{adoption, feasibility, projection};

/// Deterministic impact simulator.
///
/// No external calls. The same proposal and configuration always produce
/// bit-identical series; only ids and timestamps differ between runs.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
}

/// Validated numeric inputs.
struct Inputs {
    annual_reduction: f64,
    implementation_cost: f64,
    timeline_months: f64,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration accessor.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn inputs(proposal: &Proposal) -> Result<Inputs, SimulationError> {
        let co2 = proposal.co2_reduction_estimate;
        if !co2.is_finite() || co2 <= 0.0 {
            return Err(SimulationError::InvalidInput(format!(
                "co2_reduction_estimate must be positive, got {}",
                co2
            )));
        }
        let cost = proposal.implementation_cost;
        if !cost.is_finite() || cost <= 0.0 {
            return Err(SimulationError::InvalidInput(format!(
                "implementation_cost must be positive, got {}",
                cost
            )));
        }
        if proposal.timeline_months <= 0 {
            return Err(SimulationError::InvalidInput(format!(
                "timeline_months must be positive, got {}",
                proposal.timeline_months
            )));
        }
        Ok(Inputs {
            annual_reduction: co2,
            implementation_cost: cost,
            timeline_months: proposal.timeline_months as f64,
        })
    }

    fn project_kind(&self, kind: ScenarioKind, inputs: &Inputs) -> Result<ScenarioProjection, SimulationError> {
        let params = self
            .config
            .scenarios
            .get(kind)
            .ok_or_else(|| SimulationError::UnknownScenario(kind.to_string()))?;
        Ok(projection::project(
            kind,
            params,
            inputs.annual_reduction,
            inputs.implementation_cost,
            inputs.timeline_months,
            &self.config,
        ))
    }

    /// Project a single scenario by name.
    pub fn project_scenario(
        &self,
        proposal: &Proposal,
        scenario: &str,
    ) -> Result<ScenarioProjection, SimulationError> {
        let kind: ScenarioKind = scenario
            .parse()
            .map_err(|_| SimulationError::UnknownScenario(scenario.to_string()))?;
        let inputs = Self::inputs(proposal)?;
        self.project_kind(kind, &inputs)
    }

    /// Run every scenario and assemble the full result.
    #[instrument(skip_all, fields(proposal_id = %proposal.id))]
    pub fn simulate(&self, proposal: &Proposal) -> Result<SimulationResult, SimulationError> {
        let inputs = Self::inputs(proposal)?;

        let mut scenarios = BTreeMap::new();
        for kind in ScenarioKind::ALL {
            let projection = self.project_kind(kind, &inputs)?;
            debug!(
                scenario = %kind,
                cumulative = projection.cumulative_total,
                peak_monthly = projection.peak_monthly,
                "Scenario projected"
            );
            scenarios.insert(kind, projection);
        }

        let total = |kind: ScenarioKind| scenarios.get(&kind).map(|p| p.cumulative_total);
        let (Some(low), Some(point), Some(high)) = (
            total(ScenarioKind::Pessimistic),
            total(ScenarioKind::Realistic),
            total(ScenarioKind::Optimistic),
        ) else {
            return Err(SimulationError::InvalidConfig("scenario set incomplete".into()));
        };
        let headline = scenarios
            .get(&ScenarioKind::Realistic)
            .map(|p| p.economics)
            .ok_or_else(|| SimulationError::UnknownScenario(ScenarioKind::Realistic.to_string()))?;

        let equivalents = Equivalents {
            car_years: point / self.config.equivalents.tonnes_per_car_year,
            tree_years: point / self.config.equivalents.tonnes_per_tree_year,
        };

        let result = SimulationResult {
            id: SimulationId::generate(),
            proposal_id: proposal.id.clone(),
            horizon_months: self.config.horizon_months,
            scenarios,
            headline,
            feasibility: feasibility::assess(proposal, &self.config.feasibility),
            confidence_interval: ConfidenceInterval { low, point, high },
            equivalents,
            social_adoption: adoption::project(&self.config.adoption, self.config.horizon_months),
            simulated_at: Utc::now(),
        };

        info!(
            proposal_id = %proposal.id,
            realistic_total = point,
            cost_per_tonne = result.headline.cost_per_tonne,
            feasibility = result.feasibility.score,
            "Simulation complete"
        );
        Ok(result)
    }
}
