//! Monthly reduction series and per-scenario economics.

use cac_types::{ScenarioEconomics, ScenarioKind, ScenarioProjection};

use crate::config::{ScenarioParameters, SimulationConfig};

/// Logistic uptake for one scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UptakeCurve {
    pub adoption_rate: f64,
    pub k: f64,
    pub timeline_months: f64,
}

impl UptakeCurve {
    /// Uptake at month `t` (months since start). Held at `adoption_rate`
    /// once the timeline has elapsed.
    pub fn at(&self, t: f64) -> f64 {
        if t > self.timeline_months {
            return self.adoption_rate;
        }
        let t_mid = self.timeline_months / 2.0;
        self.adoption_rate / (1.0 + (-self.k * (t - t_mid)).exp())
    }
}

/// Monthly tonnes avoided over the horizon. Month `m` is evaluated at its
/// end, `t = m + 1`.
pub fn monthly_series(
    annual_reduction: f64,
    timeline_months: f64,
    params: &ScenarioParameters,
    config: &SimulationConfig,
) -> Vec<f64> {
    let curve = UptakeCurve {
        adoption_rate: params.adoption_rate,
        k: config.curve.k(timeline_months),
        timeline_months,
    };
    let per_month = annual_reduction / 12.0;
    (0..config.horizon_months)
        .map(|m| per_month * curve.at(f64::from(m) + 1.0) * params.efficiency_factor)
        .collect()
}

/// Fractional years until the valued cumulative reduction covers `cost`,
/// interpolated within the crossing month.
pub fn payback_years(monthly: &[f64], cost: f64, carbon_price: f64) -> Option<f64> {
    let mut valued = 0.0;
    for (m, tonnes) in monthly.iter().enumerate() {
        let month_value = tonnes * carbon_price;
        if valued + month_value >= cost && month_value > 0.0 {
            let fraction = (cost - valued) / month_value;
            return Some((m as f64 + fraction) / 12.0);
        }
        valued += month_value;
    }
    None
}

/// Monthly valued reductions discounted at an annual rate, minus `cost`.
pub fn net_present_value(monthly: &[f64], cost: f64, carbon_price: f64, annual_rate: f64) -> f64 {
    let discounted: f64 = monthly
        .iter()
        .enumerate()
        .map(|(m, tonnes)| {
            let years = (m as f64 + 1.0) / 12.0;
            tonnes * carbon_price / (1.0 + annual_rate).powf(years)
        })
        .sum();
    discounted - cost
}

/// Project one scenario. Inputs are assumed validated.
pub fn project(
    kind: ScenarioKind,
    params: &ScenarioParameters,
    annual_reduction: f64,
    implementation_cost: f64,
    timeline_months: f64,
    config: &SimulationConfig,
) -> ScenarioProjection {
    let monthly = monthly_series(annual_reduction, timeline_months, params, config);
    let cumulative_total: f64 = monthly.iter().sum();
    let peak_monthly = monthly.iter().copied().fold(0.0, f64::max);
    let scc = config.social_cost_of_carbon;

    let economics = ScenarioEconomics {
        cost_per_tonne: implementation_cost / cumulative_total,
        roi_10y_percent: (cumulative_total * scc - implementation_cost) / implementation_cost * 100.0,
        payback_years: payback_years(&monthly, implementation_cost, scc),
        net_present_value: net_present_value(&monthly, implementation_cost, scc, config.discount_rate),
    };

    ScenarioProjection {
        scenario: kind,
        adoption_rate: params.adoption_rate,
        efficiency_factor: params.efficiency_factor,
        monthly,
        cumulative_total,
        peak_monthly,
        economics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptake_is_half_at_midpoint_and_held_after_timeline() {
        let curve = UptakeCurve {
            adoption_rate: 0.6,
            k: 0.5,
            timeline_months: 12.0,
        };
        assert!((curve.at(6.0) - 0.3).abs() < 1e-12);
        assert_eq!(curve.at(13.0), 0.6);
        assert_eq!(curve.at(120.0), 0.6);
    }

    #[test]
    fn series_spans_the_horizon() {
        let config = SimulationConfig::default();
        let params = ScenarioParameters::new(0.6, 0.85);
        let series = monthly_series(1_200.0, 12.0, &params, &config);
        assert_eq!(series.len(), 120);
        // Past the timeline: 100 t/month x 0.6 x 0.85.
        assert!((series[119] - 51.0).abs() < 1e-9);
        assert!(series.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn payback_interpolates_inside_the_month() {
        let monthly = vec![10.0; 24];
        // 1000 per month at price 100; cost 1500 is covered halfway through month 2.
        let years = payback_years(&monthly, 1_500.0, 100.0).unwrap();
        assert!((years - 1.5 / 12.0).abs() < 1e-12);
        assert_eq!(payback_years(&monthly, 1e9, 100.0), None);
    }

    #[test]
    fn npv_without_discount_is_plain_difference() {
        let monthly = vec![1.0; 12];
        let npv = net_present_value(&monthly, 500.0, 100.0, 0.0);
        assert!((npv - 700.0).abs() < 1e-9);
    }
}
