use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::AssessmentError;
use crate::project::{ProjectInput, TaxCredit, HOURS_PER_YEAR};
use crate::time_value::{
    amortization_schedule, depreciation_schedule, internal_rate_of_return, present_value,
    AmortizationRow, IrrSolution,
};
use crate::types::{with_metadata, ComputationOutput, Money, Multiple, Rate};
use crate::AssessmentResult;

/// DSCR reported for years without debt service.
pub const DSCR_SENTINEL: Multiple = dec!(999.99);

/// Coverage below which lenders typically flag a covenant concern.
const DSCR_WARNING_LEVEL: Multiple = dec!(1.20);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One operating year of the pro forma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowYear {
    /// Operating year, starting at 1
    pub year: u32,
    pub energy_mwh: Decimal,
    pub revenue: Money,
    pub operating_expenses: Money,
    /// Cash available for debt service (revenue - opex)
    pub net_operating_income: Money,
    pub interest: Money,
    pub principal: Money,
    pub debt_service: Money,
    /// Loan balance at year end
    pub outstanding_debt: Money,
    pub depreciation: Money,
    pub taxable_income: Money,
    pub tax: Money,
    pub tax_credit: Money,
    /// NOI - debt service - tax + tax credit
    pub free_cash_flow: Money,
    pub cumulative_cash_flow: Money,
    /// NOI / debt service, or the sentinel when no debt service is due
    pub dscr: Multiple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialResult {
    pub cash_flows: Vec<CashFlowYear>,
    pub project_life_years: u32,
    /// Unlevered NPV at the configured discount rate
    pub project_npv: Money,
    /// Unlevered IRR on [-cost, NOI...]
    pub project_irr: IrrSolution,
    /// Levered NPV on [-equity, FCF...]
    pub equity_npv: Money,
    pub equity_irr: IrrSolution,
    /// Levelized cost of energy, $/MWh. Absent when no energy is produced.
    pub lcoe: Option<Money>,
    pub min_dscr: Multiple,
    pub avg_dscr: Multiple,
    /// Year-1 NOI / debt at origination
    pub debt_yield: Rate,
    /// Lifetime free cash flow / equity invested
    pub equity_multiple: Multiple,
    /// Years until cumulative NOI recovers the installed cost
    pub payback_years: Option<Decimal>,
    pub debt_amount: Money,
    pub equity_amount: Money,
    pub annual_debt_service: Money,
    pub total_energy_mwh: Decimal,
    pub total_revenue: Money,
    pub total_operating_expenses: Money,
    pub total_tax_credits: Money,
    pub total_free_cash_flow: Money,
}

impl FinancialResult {
    pub fn first_year(&self) -> Option<&CashFlowYear> {
        self.cash_flows.first()
    }

    /// Years with a positive debt service payment.
    pub fn debt_service_years(&self) -> impl Iterator<Item = &CashFlowYear> {
        self.cash_flows
            .iter()
            .filter(|cf| cf.debt_service > Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Run the pro forma and wrap it with methodology, assumptions and warnings.
pub fn run_financial_model(
    input: &ProjectInput,
    config: &ModelConfig,
) -> AssessmentResult<ComputationOutput<FinancialResult>> {
    let start = Instant::now();

    let result = build_pro_forma(input, config)?;
    let warnings = collect_warnings(input, &result);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Project Pro Forma (level-payment debt, MACRS depreciation)",
        &serde_json::json!({
            "project_name": input.project_name,
            "technology": input.technology,
            "project_life_years": result.project_life_years,
            "discount_rate": config.discount_rate.to_string(),
            "price_escalation": config.price_escalation.to_string(),
            "om_escalation": config.om_escalation.to_string(),
            "tax_rate": config.tax_rate.to_string(),
            "fixed_om_per_kw_year": input.fixed_om().to_string(),
            "variable_om_per_mwh": input.variable_om().to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Project the operating years and derive the summary metrics.
pub fn build_pro_forma(
    input: &ProjectInput,
    config: &ModelConfig,
) -> AssessmentResult<FinancialResult> {
    input.validate()?;
    config.validate()?;

    let price = input.energy_price()?;
    let depreciation = depreciation_schedule(
        input.total_installed_cost,
        input.depreciation_class_life,
    )?;

    let project_life = config
        .project_life_years
        .unwrap_or(input.benchmark().useful_life_years);

    let debt_amount = input.debt_amount();
    let equity_amount = input.equity_amount();
    let schedule = amortization_schedule(debt_amount, input.interest_rate, input.loan_tenor_years)?;
    let loan_rows: Vec<AmortizationRow> = schedule.iter().collect();

    let capacity_kw = input.capacity_kw();
    let fixed_om = input.fixed_om();
    let variable_om = input.variable_om();
    let base_energy = input.capacity_mw
        * Decimal::from(HOURS_PER_YEAR)
        * input.capacity_factor
        * input.availability;

    let mut cash_flows: Vec<CashFlowYear> = Vec::with_capacity(project_life as usize);
    let mut output_factor = Decimal::ONE;
    let mut price_factor = Decimal::ONE;
    let mut om_factor = Decimal::ONE;
    let mut cumulative = Decimal::ZERO;

    for year in 1..=project_life {
        if year > 1 {
            output_factor *= Decimal::ONE - input.degradation_rate;
            price_factor =
                escalate(price_factor, config.price_escalation, "price_escalation", year)?;
            om_factor = escalate(om_factor, config.om_escalation, "om_escalation", year)?;
        }

        let energy = base_energy * output_factor;
        let revenue = energy
            .checked_mul(price)
            .and_then(|r| r.checked_mul(price_factor))
            .ok_or_else(|| overflow("revenue", year))?;
        let opex = (fixed_om * capacity_kw)
            .checked_add(variable_om * energy)
            .and_then(|o| o.checked_mul(om_factor))
            .ok_or_else(|| overflow("operating_expenses", year))?;
        let noi = revenue
            .checked_sub(opex)
            .ok_or_else(|| overflow("net_operating_income", year))?;

        let (interest, principal, outstanding_debt) = match loan_rows.get(year as usize - 1) {
            Some(row) => (row.interest, row.principal, row.balance),
            None => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };
        let debt_service = interest + principal;

        let year_depreciation = depreciation
            .get(year as usize - 1)
            .map(|d| d.amount)
            .unwrap_or(Decimal::ZERO);
        let taxable_income = noi - interest - year_depreciation;
        let tax = (taxable_income * config.tax_rate).max(Decimal::ZERO);
        let tax_credit = tax_credit_for_year(input, config, year, energy);

        let free_cash_flow = noi - debt_service - tax + tax_credit;
        cumulative = cumulative
            .checked_add(free_cash_flow)
            .ok_or_else(|| overflow("free_cash_flow", year))?;

        let dscr = if debt_service > Decimal::ZERO {
            noi / debt_service
        } else {
            DSCR_SENTINEL
        };

        cash_flows.push(CashFlowYear {
            year,
            energy_mwh: energy,
            revenue,
            operating_expenses: opex,
            net_operating_income: noi,
            interest,
            principal,
            debt_service,
            outstanding_debt,
            depreciation: year_depreciation,
            taxable_income,
            tax,
            tax_credit,
            free_cash_flow,
            cumulative_cash_flow: cumulative,
            dscr,
        });
    }

    // ── Summary metrics ──────────────────────────────────────────────
    let noi_series: Vec<Money> = cash_flows.iter().map(|cf| cf.net_operating_income).collect();
    let fcf_series: Vec<Money> = cash_flows.iter().map(|cf| cf.free_cash_flow).collect();
    let opex_series: Vec<Money> = cash_flows.iter().map(|cf| cf.operating_expenses).collect();
    let energy_series: Vec<Decimal> = cash_flows.iter().map(|cf| cf.energy_mwh).collect();

    let project_npv =
        present_value(&noi_series, config.discount_rate)? - input.total_installed_cost;
    let project_irr = internal_rate_of_return(&prepend(-input.total_installed_cost, &noi_series));

    let equity_npv = present_value(&fcf_series, config.discount_rate)? - equity_amount;
    let equity_irr = if equity_amount > Decimal::ZERO {
        internal_rate_of_return(&prepend(-equity_amount, &fcf_series))
    } else {
        IrrSolution::NotComputed
    };

    let pv_energy = present_value(&energy_series, config.discount_rate)?;
    let lcoe = if pv_energy > Decimal::ZERO {
        let pv_opex = present_value(&opex_series, config.discount_rate)?;
        Some((input.total_installed_cost + pv_opex) / pv_energy)
    } else {
        None
    };

    let (min_dscr, avg_dscr) = coverage_summary(&cash_flows);

    let first_noi = noi_series.first().copied().unwrap_or(Decimal::ZERO);
    let debt_yield = if debt_amount > Decimal::ZERO {
        first_noi / debt_amount
    } else {
        Decimal::ZERO
    };

    let total_revenue = checked_total(cash_flows.iter().map(|cf| cf.revenue), "revenue")?;
    let total_free_cash_flow = cumulative;
    let equity_multiple = if equity_amount > Decimal::ZERO {
        total_free_cash_flow / equity_amount
    } else {
        Decimal::ZERO
    };

    let payback_years = compute_payback(input.total_installed_cost, &noi_series);

    debug!(
        project = %input.project_name,
        years = project_life,
        %min_dscr,
        %project_npv,
        "pro forma complete"
    );

    Ok(FinancialResult {
        project_life_years: project_life,
        project_npv,
        project_irr,
        equity_npv,
        equity_irr,
        lcoe,
        min_dscr,
        avg_dscr,
        debt_yield,
        equity_multiple,
        payback_years,
        debt_amount,
        equity_amount,
        annual_debt_service: schedule.payment(),
        total_energy_mwh: energy_series.iter().sum(),
        total_revenue,
        total_operating_expenses: checked_total(opex_series.iter().copied(), "operating_expenses")?,
        total_tax_credits: cash_flows.iter().map(|cf| cf.tax_credit).sum(),
        total_free_cash_flow,
        cash_flows,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn tax_credit_for_year(
    input: &ProjectInput,
    config: &ModelConfig,
    year: u32,
    energy: Decimal,
) -> Money {
    match &input.tax_credit {
        TaxCredit::None => Decimal::ZERO,
        TaxCredit::Itc { rate } if year == 1 => *rate * input.total_installed_cost,
        TaxCredit::Itc { .. } => Decimal::ZERO,
        TaxCredit::Ptc { per_mwh } if year <= config.ptc_years => *per_mwh * energy,
        TaxCredit::Ptc { .. } => Decimal::ZERO,
    }
}

/// Compound a growth factor by one year.
fn escalate(factor: Decimal, rate: Rate, field: &str, year: u32) -> AssessmentResult<Decimal> {
    factor
        .checked_mul(Decimal::ONE + rate)
        .ok_or_else(|| overflow(field, year))
}

fn overflow(field: &str, year: u32) -> AssessmentError {
    AssessmentError::invalid(field, format!("Value exceeds the decimal range in year {year}"))
}

fn checked_total(mut values: impl Iterator<Item = Money>, field: &str) -> AssessmentResult<Money> {
    values
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| AssessmentError::invalid(field, "Total exceeds the decimal range"))
}

fn prepend(initial: Money, flows: &[Money]) -> Vec<Money> {
    let mut series = Vec::with_capacity(flows.len() + 1);
    series.push(initial);
    series.extend_from_slice(flows);
    series
}

/// Minimum and average DSCR across debt service years.
fn coverage_summary(cash_flows: &[CashFlowYear]) -> (Multiple, Multiple) {
    let ratios: Vec<Multiple> = cash_flows
        .iter()
        .filter(|cf| cf.debt_service > Decimal::ZERO)
        .map(|cf| cf.dscr)
        .collect();

    if ratios.is_empty() {
        return (DSCR_SENTINEL, DSCR_SENTINEL);
    }

    let min = ratios.iter().copied().min().unwrap_or(DSCR_SENTINEL);
    let avg = ratios.iter().sum::<Decimal>() / Decimal::from(ratios.len() as u64);
    (min, avg)
}

/// Interpolated year in which cumulative NOI first covers the installed cost.
fn compute_payback(cost: Money, noi: &[Money]) -> Option<Decimal> {
    let mut cumulative = Decimal::ZERO;
    for (i, amount) in noi.iter().enumerate() {
        let previous = cumulative;
        cumulative += amount;
        if cumulative >= cost {
            let fraction = if *amount > Decimal::ZERO {
                (cost - previous) / amount
            } else {
                Decimal::ZERO
            };
            return Some(Decimal::from(i as u64) + fraction);
        }
    }
    None
}

pub(crate) fn collect_warnings(input: &ProjectInput, result: &FinancialResult) -> Vec<String> {
    let mut warnings = Vec::new();

    if result.min_dscr < DSCR_WARNING_LEVEL {
        warnings.push(format!(
            "Minimum DSCR of {:.2}x is below {DSCR_WARNING_LEVEL}x, lender covenant risk",
            result.min_dscr
        ));
    }
    if !result.project_irr.is_computed() {
        warnings.push("Project IRR could not be computed for this cash flow profile".into());
    }
    let negative_years: Vec<String> = result
        .cash_flows
        .iter()
        .filter(|cf| cf.free_cash_flow < Decimal::ZERO)
        .map(|cf| cf.year.to_string())
        .collect();
    if !negative_years.is_empty() {
        warnings.push(format!(
            "Negative free cash flow in year(s) {}",
            negative_years.join(", ")
        ));
    }
    if input.loan_tenor_years > result.project_life_years {
        warnings.push(format!(
            "Loan tenor of {} years exceeds the {}-year project life; debt is not fully retired",
            input.loan_tenor_years, result.project_life_years
        ));
    }
    if result.lcoe.is_none() {
        warnings.push("No energy is produced; LCOE is undefined".into());
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::solar_project;
    use crate::project::OfftakeType;
    use pretty_assertions::assert_eq;

    fn model(input: &ProjectInput) -> FinancialResult {
        build_pro_forma(input, &ModelConfig::default()).unwrap()
    }

    #[test]
    fn test_row_count_matches_useful_life() {
        let input = solar_project();
        let result = model(&input);
        assert_eq!(result.cash_flows.len(), 30);
        assert_eq!(result.project_life_years, 30);
        assert_eq!(result.cash_flows[0].year, 1);
    }

    #[test]
    fn test_project_life_override() {
        let config = ModelConfig {
            project_life_years: Some(25),
            ..ModelConfig::default()
        };
        let result = build_pro_forma(&solar_project(), &config).unwrap();
        assert_eq!(result.cash_flows.len(), 25);
    }

    #[test]
    fn test_first_year_energy_and_revenue() {
        let result = model(&solar_project());
        let y1 = &result.cash_flows[0];
        // 100 MW x 8760 x 0.25 x 0.98
        assert_eq!(y1.energy_mwh, dec!(214620));
        assert_eq!(y1.revenue, dec!(214620) * dec!(45));
        // Benchmark fixed O&M of $14/kW-yr on 100,000 kW
        assert_eq!(y1.operating_expenses, dec!(1_400_000));
    }

    #[test]
    fn test_degradation_and_escalation_applied() {
        let result = model(&solar_project());
        let y1 = &result.cash_flows[0];
        let y2 = &result.cash_flows[1];
        assert_eq!(y2.energy_mwh, y1.energy_mwh * dec!(0.995));
        assert_eq!(y2.operating_expenses, y1.operating_expenses * dec!(1.025));
        assert_eq!(y2.revenue, y2.energy_mwh * dec!(45) * dec!(1.02));
    }

    #[test]
    fn test_cumulative_is_running_sum() {
        let result = model(&solar_project());
        let mut running = Decimal::ZERO;
        for cf in &result.cash_flows {
            running += cf.free_cash_flow;
            assert_eq!(cf.cumulative_cash_flow, running, "year {}", cf.year);
        }
    }

    #[test]
    fn test_post_tenor_years_carry_sentinel() {
        let result = model(&solar_project());
        for cf in result.cash_flows.iter().filter(|cf| cf.year > 20) {
            assert_eq!(cf.debt_service, Decimal::ZERO);
            assert_eq!(cf.dscr, DSCR_SENTINEL);
        }
        assert_eq!(result.cash_flows[19].outstanding_debt, Decimal::ZERO);
    }

    #[test]
    fn test_min_dscr_above_covenant() {
        let result = model(&solar_project());
        assert!(
            result.min_dscr >= dec!(1.20),
            "Min DSCR should clear 1.20x, got {}",
            result.min_dscr
        );
        assert!(result.min_dscr < DSCR_SENTINEL);
        assert!(result.avg_dscr >= result.min_dscr);
    }

    #[test]
    fn test_unlevered_project_uses_sentinel() {
        let mut input = solar_project();
        input.leverage_ratio = Decimal::ZERO;
        let result = model(&input);
        assert_eq!(result.min_dscr, DSCR_SENTINEL);
        assert_eq!(result.avg_dscr, DSCR_SENTINEL);
        assert_eq!(result.debt_yield, Decimal::ZERO);
    }

    #[test]
    fn test_project_npv_matches_discounted_noi() {
        let input = solar_project();
        let result = model(&input);
        let noi: Vec<Money> = result
            .cash_flows
            .iter()
            .map(|cf| cf.net_operating_income)
            .collect();
        let expected = present_value(&noi, dec!(0.08)).unwrap() - input.total_installed_cost;
        assert_eq!(result.project_npv, expected);
    }

    #[test]
    fn test_irr_consistent_with_npv_sign() {
        let result = model(&solar_project());
        let irr = result.project_irr.rate().expect("project IRR should converge");
        if result.project_npv > Decimal::ZERO {
            assert!(irr > dec!(0.08));
        } else {
            assert!(irr <= dec!(0.08));
        }
    }

    #[test]
    fn test_lcoe_positive_and_plausible() {
        let result = model(&solar_project());
        let lcoe = result.lcoe.unwrap();
        assert!(lcoe > dec!(20) && lcoe < dec!(80), "LCOE was {lcoe}");
    }

    #[test]
    fn test_zero_capacity_factor_has_no_lcoe() {
        let mut input = solar_project();
        input.capacity_factor = Decimal::ZERO;
        let result = model(&input);
        assert!(result.lcoe.is_none());
        assert!(result.payback_years.is_none());
    }

    #[test]
    fn test_itc_credited_in_first_year_only() {
        let mut input = solar_project();
        input.tax_credit = TaxCredit::Itc { rate: dec!(0.30) };
        let result = model(&input);
        assert_eq!(result.cash_flows[0].tax_credit, dec!(31_500_000));
        assert!(result.cash_flows[1..]
            .iter()
            .all(|cf| cf.tax_credit == Decimal::ZERO));
    }

    #[test]
    fn test_ptc_limited_to_credit_period() {
        let mut input = solar_project();
        input.tax_credit = TaxCredit::Ptc { per_mwh: dec!(27.5) };
        let result = model(&input);
        assert_eq!(
            result.cash_flows[0].tax_credit,
            result.cash_flows[0].energy_mwh * dec!(27.5)
        );
        assert!(result.cash_flows[9].tax_credit > Decimal::ZERO);
        assert_eq!(result.cash_flows[10].tax_credit, Decimal::ZERO);
    }

    #[test]
    fn test_tax_never_negative() {
        let result = model(&solar_project());
        assert!(result.cash_flows.iter().all(|cf| cf.tax >= Decimal::ZERO));
        // MACRS year 2 shields more than NOI less interest
        assert!(result.cash_flows[1].taxable_income < Decimal::ZERO);
        assert_eq!(result.cash_flows[1].tax, Decimal::ZERO);
    }

    #[test]
    fn test_missing_contract_price_fails() {
        let mut input = solar_project();
        input.contracted_price_per_mwh = None;
        let err = build_pro_forma(&input, &ModelConfig::default()).unwrap_err();
        assert!(matches!(err, AssessmentError::MissingInput { .. }));
    }

    #[test]
    fn test_merchant_uses_wholesale_price() {
        let mut input = solar_project();
        input.offtake_type = OfftakeType::Merchant;
        input.contracted_price_per_mwh = None;
        let result = model(&input);
        assert_eq!(
            result.cash_flows[0].revenue,
            result.cash_flows[0].energy_mwh * dec!(48)
        );
    }

    #[test]
    fn test_unsupported_class_life_fails() {
        let mut input = solar_project();
        input.depreciation_class_life = 15;
        let err = build_pro_forma(&input, &ModelConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            AssessmentError::UnsupportedClassLife { class_life: 15 }
        ));
    }

    #[test]
    fn test_invalid_input_fails_fast() {
        let mut input = solar_project();
        input.availability = dec!(1.2);
        let err = build_pro_forma(&input, &ModelConfig::default()).unwrap_err();
        assert!(matches!(err, AssessmentError::InvalidInput { .. }));
    }

    #[test]
    fn test_runaway_escalation_rejected_without_panic() {
        let config = ModelConfig {
            price_escalation: dec!(1.0),
            project_life_years: Some(100),
            ..ModelConfig::default()
        };
        let err = build_pro_forma(&solar_project(), &config).unwrap_err();
        assert!(matches!(err, AssessmentError::InvalidInput { .. }));
    }

    #[test]
    fn test_decimal_overflow_is_an_error() {
        let mut input = solar_project();
        input.capacity_mw = dec!(1_000_000_000);
        let config = ModelConfig {
            price_escalation: dec!(0.5),
            om_escalation: dec!(0.5),
            project_life_years: Some(100),
            ..ModelConfig::default()
        };
        let err = build_pro_forma(&input, &config).unwrap_err();
        assert!(matches!(err, AssessmentError::InvalidInput { .. }));
    }

    #[test]
    fn test_payback_interpolated() {
        assert_eq!(
            compute_payback(dec!(100), &[dec!(40), dec!(40), dec!(40)]),
            Some(dec!(2.5))
        );
        assert_eq!(compute_payback(dec!(100), &[dec!(10), dec!(10)]), None);
    }

    #[test]
    fn test_envelope_warns_on_thin_coverage() {
        let mut input = solar_project();
        input.contracted_price_per_mwh = Some(dec!(35));
        let output = run_financial_model(&input, &ModelConfig::default()).unwrap();
        assert!(output.result.min_dscr < dec!(1.20));
        assert!(output.warnings.iter().any(|w| w.contains("Minimum DSCR")));
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
    }
}
