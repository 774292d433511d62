mod common;

use bankability_core::sensitivity::{
    run_combined_scenario, run_sensitivity, FactorSet, Perturbation, SensitivityFactor,
    SensitivityOutcome,
};
use bankability_core::ModelConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{merchant_wind, utility_solar};

// ===========================================================================
// One-factor sweep
// ===========================================================================

#[test]
fn test_operating_cost_never_alters_capital_cost_base() {
    let input = utility_solar();
    let output = run_sensitivity(&input, &ModelConfig::default(), &FactorSet::default()).unwrap();

    let capital: Vec<_> = output
        .result
        .entries
        .iter()
        .filter(|e| e.factor == SensitivityFactor::CapitalCost)
        .collect();
    assert_eq!(capital.len(), 4);
    for entry in capital {
        assert_eq!(entry.base_value, input.total_installed_cost);
    }
}

#[test]
fn test_every_entry_shares_the_base_case() {
    let output = run_sensitivity(&merchant_wind(), &ModelConfig::default(), &FactorSet::default())
        .unwrap()
        .result;
    assert_eq!(output.entries.len(), 20);
    assert!(output.entries.iter().all(|e| e.base == output.base));
}

#[test]
fn test_capital_cost_moves_npv_against_its_direction() {
    let set = FactorSet {
        factors: vec![SensitivityFactor::CapitalCost],
        levels: vec![dec!(-0.10), dec!(0.10)],
    };
    let output = run_sensitivity(&utility_solar(), &ModelConfig::default(), &set)
        .unwrap()
        .result;
    let deltas: Vec<Decimal> = output
        .entries
        .iter()
        .map(|e| match &e.outcome {
            SensitivityOutcome::Computed { deltas, .. } => deltas.npv,
            SensitivityOutcome::Failed { error } => panic!("case failed: {error}"),
        })
        .collect();
    assert!(deltas[0] > Decimal::ZERO);
    assert!(deltas[1] < Decimal::ZERO);
}

#[test]
fn test_interest_rate_only_touches_debt_metrics() {
    let set = FactorSet {
        factors: vec![SensitivityFactor::InterestRate],
        levels: vec![dec!(0.20)],
    };
    let output = run_sensitivity(&utility_solar(), &ModelConfig::default(), &set)
        .unwrap()
        .result;
    let entry = &output.entries[0];
    assert_eq!(entry.perturbed_value, dec!(0.06));
    let metrics = entry.metrics().unwrap();
    // Project NPV is unlevered
    assert_eq!(metrics.npv, output.base.npv);
    assert!(metrics.min_dscr < output.base.min_dscr);
}

// ===========================================================================
// Combined scenario
// ===========================================================================

#[test]
fn test_combined_downside_worse_than_each_leg() {
    let config = ModelConfig::default();
    let legs = [
        Perturbation {
            factor: SensitivityFactor::RevenuePrice,
            level: dec!(-0.10),
        },
        Perturbation {
            factor: SensitivityFactor::CapacityFactor,
            level: dec!(-0.10),
        },
    ];
    let combined = run_combined_scenario(&utility_solar(), &config, &legs)
        .unwrap()
        .result;
    for leg in legs {
        let single = run_combined_scenario(&utility_solar(), &config, &[leg])
            .unwrap()
            .result;
        assert!(combined.scenario.npv < single.scenario.npv);
    }
}
