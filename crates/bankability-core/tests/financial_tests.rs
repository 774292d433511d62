mod common;

use bankability_core::financial::{build_pro_forma, run_financial_model, DSCR_SENTINEL};
use bankability_core::project::TaxCredit;
use bankability_core::time_value::{amortization_schedule, internal_rate_of_return, IrrSolution};
use bankability_core::{AssessmentError, ModelConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{merchant_wind, utility_solar};

// ===========================================================================
// Pro forma shape
// ===========================================================================

#[test]
fn test_rows_match_project_life() {
    let result = build_pro_forma(&utility_solar(), &ModelConfig::default()).unwrap();
    assert_eq!(result.cash_flows.len(), 30);
    for (i, row) in result.cash_flows.iter().enumerate() {
        assert_eq!(row.year as usize, i + 1);
    }
}

#[test]
fn test_cumulative_equals_running_sum() {
    let result = build_pro_forma(&merchant_wind(), &ModelConfig::default()).unwrap();
    let mut running = Decimal::ZERO;
    for row in &result.cash_flows {
        running += row.free_cash_flow;
        assert_eq!(row.cumulative_cash_flow, running, "year {}", row.year);
    }
}

#[test]
fn test_years_after_tenor_carry_sentinel() {
    let result = build_pro_forma(&utility_solar(), &ModelConfig::default()).unwrap();
    for row in result.cash_flows.iter().filter(|r| r.debt_service.is_zero()) {
        assert_eq!(row.dscr, DSCR_SENTINEL);
        assert!(row.year > 20);
    }
}

#[test]
fn test_debt_fully_retired_at_tenor() {
    let result = build_pro_forma(&utility_solar(), &ModelConfig::default()).unwrap();
    let year_20 = &result.cash_flows[19];
    assert!(year_20.outstanding_debt.abs() < dec!(0.01));
}

// ===========================================================================
// Headline metrics
// ===========================================================================

#[test]
fn test_solar_headline_metrics() {
    let result = build_pro_forma(&utility_solar(), &ModelConfig::default()).unwrap();

    // 73.5M at 5% over 20 years against ~8.26M year-one NOI
    assert!(result.min_dscr > dec!(1.35), "min DSCR {}", result.min_dscr);
    assert!(result.min_dscr < dec!(1.45), "min DSCR {}", result.min_dscr);

    let irr = result.project_irr.rate().unwrap();
    assert!((irr - dec!(0.0802)).abs() < dec!(0.002), "project IRR {irr}");

    let lcoe = result.lcoe.unwrap();
    assert!(lcoe > dec!(50) && lcoe < dec!(60), "LCOE {lcoe}");
    assert_eq!(result.debt_amount, dec!(73_500_000));
}

#[test]
fn test_envelope_carries_assumptions() {
    let output = run_financial_model(&utility_solar(), &ModelConfig::default()).unwrap();
    assert_eq!(output.metadata.precision, "rust_decimal_128bit");
    assert_eq!(output.assumptions["project_life_years"], 30);
    assert_eq!(output.result.cash_flows.len(), 30);
}

#[test]
fn test_itc_improves_equity_returns() {
    let base = build_pro_forma(&utility_solar(), &ModelConfig::default()).unwrap();
    let mut input = utility_solar();
    input.tax_credit = TaxCredit::Itc { rate: dec!(0.30) };
    let with_itc = build_pro_forma(&input, &ModelConfig::default()).unwrap();
    assert!(with_itc.equity_npv > base.equity_npv);
    assert_eq!(with_itc.cash_flows[0].tax_credit, dec!(31_500_000));
}

// ===========================================================================
// Input errors
// ===========================================================================

#[test]
fn test_missing_contract_price_is_reported() {
    let mut input = utility_solar();
    input.contracted_price_per_mwh = None;
    let err = build_pro_forma(&input, &ModelConfig::default()).unwrap_err();
    match err {
        AssessmentError::MissingInput { field } => assert_eq!(field, "contracted_price_per_mwh"),
        other => panic!("Expected MissingInput, got {other:?}"),
    }
}

#[test]
fn test_unsupported_class_life() {
    let mut input = utility_solar();
    input.depreciation_class_life = 15;
    let err = build_pro_forma(&input, &ModelConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        AssessmentError::UnsupportedClassLife { class_life: 15 }
    ));
}

#[test]
fn test_leverage_above_one_rejected() {
    let mut input = utility_solar();
    input.leverage_ratio = dec!(1.2);
    assert!(matches!(
        build_pro_forma(&input, &ModelConfig::default()),
        Err(AssessmentError::InvalidInput { .. })
    ));
}

// ===========================================================================
// Time value building blocks
// ===========================================================================

#[test]
fn test_irr_of_single_period_flow() {
    let solution = internal_rate_of_return(&[dec!(-100), dec!(110)]);
    let rate = solution.rate().unwrap();
    assert!((rate - dec!(0.10)).abs() < dec!(0.000001));
}

#[test]
fn test_irr_without_sign_change_not_computed() {
    let solution = internal_rate_of_return(&[dec!(100), dec!(50)]);
    assert_eq!(solution, IrrSolution::NotComputed);
}

#[test]
fn test_schedule_principal_sums_to_loan() {
    let schedule = amortization_schedule(dec!(1_000_000), dec!(0.06), 10).unwrap();
    let repaid: Decimal = schedule.iter().map(|row| row.principal).sum();
    assert!((repaid - dec!(1_000_000)).abs() < dec!(0.000001));
    assert_eq!(schedule.iter().count(), 10);
}
