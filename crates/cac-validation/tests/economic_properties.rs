//! Property tests: the economic band never improves as cost rises.

use cac_types::{Domain, Proposal};
use cac_validation::axes::economic;
use cac_validation::ValidationConfig;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_domain() -> impl Strategy<Value = Domain> {
    prop_oneof![
        Just(Domain::Transport),
        Just(Domain::Energy),
        Just(Domain::Building),
        Just(Domain::Agriculture),
        Just(Domain::Industry),
        Just(Domain::CrossCutting),
    ]
}

fn proposal(domain: Domain, co2: f64, cost: f64) -> Proposal {
    Proposal::builder("prop", domain)
        .co2_reduction(co2)
        .cost(cost)
        .timeline_months(24)
        .build()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Raising the cost of an otherwise identical proposal never moves it to
    /// a better band, and never lowers its cost per tonne.
    #[test]
    fn band_is_monotonic_in_cost(
        domain in arb_domain(),
        co2 in 1.0f64..1_000_000.0,
        cost in 1.0f64..1e10,
        extra in 0.0f64..1e10,
    ) {
        let config = ValidationConfig::default();
        let (_, cheap) = economic::assess(&proposal(domain.clone(), co2, cost), &config);
        let (_, dear) = economic::assess(&proposal(domain, co2, cost + extra), &config);
        let (cheap, dear) = (cheap.unwrap(), dear.unwrap());

        prop_assert!(cheap.cost_per_tonne <= dear.cost_per_tonne);
        prop_assert!(cheap.band <= dear.band);
    }

    /// Blocking only ever happens in the poor band.
    #[test]
    fn blocking_implies_poor(
        domain in arb_domain(),
        co2 in 1.0f64..100_000.0,
        cost in 1.0f64..1e10,
    ) {
        let config = ValidationConfig::default();
        let (outcome, summary) = economic::assess(&proposal(domain, co2, cost), &config);
        if !outcome.blocking.is_empty() {
            prop_assert_eq!(summary.unwrap().band, cac_types::EconomicBand::Poor);
            prop_assert_eq!(outcome.result.score, 0.0);
        }
    }

    /// Sub-scores stay within [0, 10].
    #[test]
    fn economic_score_in_range(
        domain in arb_domain(),
        co2 in 1.0f64..1_000_000.0,
        cost in 1.0f64..1e11,
    ) {
        let (outcome, _) = economic::assess(&proposal(domain, co2, cost), &ValidationConfig::default());
        prop_assert!((0.0..=10.0).contains(&outcome.result.score));
    }
}
