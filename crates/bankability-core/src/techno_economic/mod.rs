//! Techno-economic benchmarking: how a project's costs and performance
//! compare with market norms for its technology.

mod benchmarking;

pub use benchmarking::{BandPosition, CostBenchmark};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::ModelConfig;
use crate::project::ProjectInput;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::AssessmentResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    /// Capacity factor after availability losses
    pub net_capacity_factor: Rate,
    pub capacity_factor_p50: Rate,
    /// Stated capacity factor over the benchmark P50
    pub capacity_factor_ratio: Decimal,
    pub first_year_energy_mwh: Decimal,
    pub lifetime_energy_mwh: Decimal,
    /// Output in the final year relative to year one
    pub end_of_life_output_ratio: Decimal,
    pub project_life_years: u32,
}

/// Year-one unit economics. Per-MWh figures are absent when the project
/// produces no energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCompetitiveness {
    pub revenue_per_mwh: Option<Money>,
    pub opex_per_mwh: Option<Money>,
    pub margin_per_mwh: Option<Money>,
    /// Installed cost per MWh of first-year output
    pub capital_intensity: Option<Money>,
    pub operating_margin: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnoEconomicResult {
    pub project_name: String,
    pub capital_cost: CostBenchmark,
    pub fixed_om: CostBenchmark,
    pub performance: PerformanceAnalysis,
    pub competitiveness: CostCompetitiveness,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

pub fn analyze_techno_economics(
    input: &ProjectInput,
    config: &ModelConfig,
) -> AssessmentResult<ComputationOutput<TechnoEconomicResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate()?;
    config.validate()?;

    let bench = input.benchmark();
    let capacity_kw = input.capacity_kw();

    let capital_cost = CostBenchmark::capital(
        input.total_installed_cost / capacity_kw,
        &bench.capex_per_kw,
    );
    let fixed_om = CostBenchmark::operating(input.fixed_om(), &bench.fixed_om_per_kw_year);

    if capital_cost.position == BandPosition::AboveMarketHigh {
        warnings.push(format!(
            "Installed cost of ${}/kW is above the {} market range",
            capital_cost.value.round_dp(0),
            input.technology.label()
        ));
    }
    if fixed_om.position == BandPosition::AboveMarketHigh {
        warnings.push(format!(
            "Fixed O&M of ${}/kW-yr is above the {} market range",
            fixed_om.value.round_dp(2),
            input.technology.label()
        ));
    }

    let project_life = config
        .project_life_years
        .unwrap_or(bench.useful_life_years);
    let first_year = input.first_year_energy_mwh();
    let retained = Decimal::ONE - input.degradation_rate;

    let mut lifetime_energy = Decimal::ZERO;
    let mut output_factor = Decimal::ONE;
    for _ in 0..project_life {
        lifetime_energy += first_year * output_factor;
        output_factor *= retained;
    }

    let capacity_factor_ratio = if bench.capacity_factor_p50.is_zero() {
        Decimal::ZERO
    } else {
        input.capacity_factor / bench.capacity_factor_p50
    };

    let performance = PerformanceAnalysis {
        net_capacity_factor: input.capacity_factor * input.availability,
        capacity_factor_p50: bench.capacity_factor_p50,
        capacity_factor_ratio,
        first_year_energy_mwh: first_year,
        lifetime_energy_mwh: lifetime_energy,
        end_of_life_output_ratio: output_factor,
        project_life_years: project_life,
    };

    let revenue = first_year * input.energy_price()?;
    let opex = input.fixed_om() * capacity_kw + input.variable_om() * first_year;
    let per_mwh = |amount: Money| (!first_year.is_zero()).then(|| amount / first_year);

    let competitiveness = CostCompetitiveness {
        revenue_per_mwh: per_mwh(revenue),
        opex_per_mwh: per_mwh(opex),
        margin_per_mwh: per_mwh(revenue - opex),
        capital_intensity: per_mwh(input.total_installed_cost),
        operating_margin: (!revenue.is_zero()).then(|| (revenue - opex) / revenue),
    };

    if matches!(competitiveness.margin_per_mwh, Some(m) if m < Decimal::ZERO) {
        warnings.push("Year-one operating costs exceed revenue".into());
    }

    let output = TechnoEconomicResult {
        project_name: input.project_name.clone(),
        capital_cost,
        fixed_om,
        performance,
        competitiveness,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Techno-economic benchmarking against technology cost and performance bands",
        &serde_json::json!({
            "technology": input.technology,
            "capacity_mw": input.capacity_mw.to_string(),
            "project_life_years": project_life,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
