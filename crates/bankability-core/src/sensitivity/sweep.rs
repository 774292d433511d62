use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::ModelConfig;
use crate::error::AssessmentError;
use crate::financial::{build_pro_forma, FinancialResult};
use crate::project::ProjectInput;
use crate::types::{with_metadata, ComputationOutput, Money, Multiple, Rate};
use crate::AssessmentResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Model input that can be flexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityFactor {
    RevenuePrice,
    OperatingCost,
    CapitalCost,
    /// Flexed relative to the base rate like every other factor: a +20%
    /// level turns a 5% loan rate into 6%, not 25%.
    InterestRate,
    CapacityFactor,
}

impl SensitivityFactor {
    pub const ALL: [SensitivityFactor; 5] = [
        SensitivityFactor::RevenuePrice,
        SensitivityFactor::OperatingCost,
        SensitivityFactor::CapitalCost,
        SensitivityFactor::InterestRate,
        SensitivityFactor::CapacityFactor,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SensitivityFactor::RevenuePrice => "Revenue / Price",
            SensitivityFactor::OperatingCost => "Operating Costs",
            SensitivityFactor::CapitalCost => "Total Installed Cost",
            SensitivityFactor::InterestRate => "Interest Rate",
            SensitivityFactor::CapacityFactor => "Capacity Factor",
        }
    }

    /// Unperturbed value of the input this factor flexes. Operating cost is
    /// reported as fixed O&M in $/kW-yr.
    pub fn base_value(self, input: &ProjectInput) -> AssessmentResult<Decimal> {
        Ok(match self {
            SensitivityFactor::RevenuePrice => input.energy_price()?,
            SensitivityFactor::OperatingCost => input.fixed_om(),
            SensitivityFactor::CapitalCost => input.total_installed_cost,
            SensitivityFactor::InterestRate => input.interest_rate,
            SensitivityFactor::CapacityFactor => input.capacity_factor,
        })
    }

    /// Scale this factor's input by `1 + level` on `input`.
    pub(crate) fn apply(self, input: &mut ProjectInput, level: Decimal) -> AssessmentResult<()> {
        let scale = Decimal::ONE + level;
        match self {
            SensitivityFactor::RevenuePrice => {
                let price = input.energy_price()? * scale;
                if input.offtake_type.is_contracted() {
                    input.contracted_price_per_mwh = Some(price);
                } else {
                    input.merchant_price_per_mwh = Some(price);
                }
            }
            SensitivityFactor::OperatingCost => {
                // Pin both O&M components so the benchmark fallback is scaled too.
                input.fixed_om_per_kw_year = Some(input.fixed_om() * scale);
                input.variable_om_per_mwh = Some(input.variable_om() * scale);
            }
            SensitivityFactor::CapitalCost => input.total_installed_cost *= scale,
            SensitivityFactor::InterestRate => input.interest_rate *= scale,
            SensitivityFactor::CapacityFactor => input.capacity_factor *= scale,
        }
        Ok(())
    }
}

/// Factors to flex and the relative levels to flex them by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorSet {
    pub factors: Vec<SensitivityFactor>,
    /// Relative changes, e.g. -0.10 for a 10% decrease
    pub levels: Vec<Decimal>,
}

impl Default for FactorSet {
    fn default() -> Self {
        Self {
            factors: SensitivityFactor::ALL.to_vec(),
            levels: vec![dec!(-0.20), dec!(-0.10), dec!(0.10), dec!(0.20)],
        }
    }
}

impl FactorSet {
    pub fn validate(&self) -> AssessmentResult<()> {
        if self.factors.is_empty() {
            return Err(AssessmentError::invalid(
                "factors",
                "At least one sensitivity factor is required",
            ));
        }
        if self.levels.is_empty() {
            return Err(AssessmentError::invalid(
                "levels",
                "At least one sensitivity level is required",
            ));
        }
        if let Some(level) = self.levels.iter().find(|l| **l <= dec!(-1)) {
            return Err(AssessmentError::invalid(
                "levels",
                format!("Level {level} would drive the input to zero or below"),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Headline metrics compared across cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub npv: Money,
    pub irr: Option<Rate>,
    pub equity_irr: Option<Rate>,
    pub min_dscr: Multiple,
    pub avg_dscr: Multiple,
    pub lcoe: Option<Money>,
    pub payback_years: Option<Decimal>,
}

impl KeyMetrics {
    pub fn from_result(result: &FinancialResult) -> Self {
        Self {
            npv: result.project_npv,
            irr: result.project_irr.rate(),
            equity_irr: result.equity_irr.rate(),
            min_dscr: result.min_dscr,
            avg_dscr: result.avg_dscr,
            lcoe: result.lcoe,
            payback_years: result.payback_years,
        }
    }

    pub fn deltas_from(&self, base: &KeyMetrics) -> MetricDeltas {
        MetricDeltas {
            npv: self.npv - base.npv,
            irr: self.irr.zip(base.irr).map(|(p, b)| p - b),
            min_dscr: self.min_dscr - base.min_dscr,
            lcoe: self.lcoe.zip(base.lcoe).map(|(p, b)| p - b),
        }
    }
}

/// Perturbed minus base. IRR and LCOE deltas are absent when either side
/// is undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDeltas {
    pub npv: Money,
    pub irr: Option<Rate>,
    pub min_dscr: Multiple,
    pub lcoe: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SensitivityOutcome {
    Computed {
        metrics: KeyMetrics,
        deltas: MetricDeltas,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityEntry {
    pub factor: SensitivityFactor,
    pub level: Decimal,
    pub base_value: Decimal,
    pub perturbed_value: Decimal,
    pub base: KeyMetrics,
    pub outcome: SensitivityOutcome,
}

impl SensitivityEntry {
    pub fn metrics(&self) -> Option<&KeyMetrics> {
        match &self.outcome {
            SensitivityOutcome::Computed { metrics, .. } => Some(metrics),
            SensitivityOutcome::Failed { .. } => None,
        }
    }
}

/// NPV range produced by one factor across all computed levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TornadoBar {
    pub factor: SensitivityFactor,
    pub npv_low: Money,
    pub npv_high: Money,
    pub swing: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub base: KeyMetrics,
    /// Sorted by factor, then level
    pub entries: Vec<SensitivityEntry>,
    /// Factors ranked by NPV swing, widest first
    pub tornado: Vec<TornadoBar>,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// One perturbed model run, fully described before any work starts.
struct PerturbationTask {
    factor: SensitivityFactor,
    level: Decimal,
    base_value: Decimal,
    perturbed_value: Decimal,
    input: ProjectInput,
}

impl PerturbationTask {
    fn build(
        base_input: &ProjectInput,
        factor: SensitivityFactor,
        level: Decimal,
    ) -> AssessmentResult<Self> {
        let mut input = base_input.clone();
        factor.apply(&mut input, level)?;
        Ok(Self {
            factor,
            level,
            base_value: factor.base_value(base_input)?,
            perturbed_value: factor.base_value(&input)?,
            input,
        })
    }

    fn run(self, config: &ModelConfig, base: &KeyMetrics) -> SensitivityEntry {
        let outcome = match build_pro_forma(&self.input, config) {
            Ok(result) => {
                let metrics = KeyMetrics::from_result(&result);
                let deltas = metrics.deltas_from(base);
                SensitivityOutcome::Computed { metrics, deltas }
            }
            Err(e) => {
                warn!(
                    factor = ?self.factor,
                    level = %self.level,
                    error = %e,
                    "sensitivity case failed"
                );
                SensitivityOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        SensitivityEntry {
            factor: self.factor,
            level: self.level,
            base_value: self.base_value,
            perturbed_value: self.perturbed_value,
            base: base.clone(),
            outcome,
        }
    }
}

/// Flex each factor by each level and re-run the financial model.
///
/// The base case must succeed. Individual perturbed cases that fail are
/// reported as [`SensitivityOutcome::Failed`] rather than aborting the sweep.
pub fn run_sensitivity(
    input: &ProjectInput,
    config: &ModelConfig,
    factors: &FactorSet,
) -> AssessmentResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    factors.validate()?;
    let base_result = build_pro_forma(input, config)?;
    let base = KeyMetrics::from_result(&base_result);

    let tasks = factors
        .factors
        .iter()
        .flat_map(|factor| factors.levels.iter().map(move |level| (*factor, *level)))
        .map(|(factor, level)| PerturbationTask::build(input, factor, level))
        .collect::<AssessmentResult<Vec<_>>>()?;
    debug!(cases = tasks.len(), "running sensitivity sweep");

    let mut entries = evaluate_tasks(tasks, config, &base);
    entries.sort_by(|a, b| a.factor.cmp(&b.factor).then(a.level.cmp(&b.level)));

    for entry in &entries {
        if let SensitivityOutcome::Failed { error } = &entry.outcome {
            warnings.push(format!(
                "{} at {}%: {error}",
                entry.factor.label(),
                (entry.level * dec!(100)).normalize()
            ));
        }
    }

    let tornado = tornado(&entries);

    let output = SensitivityOutput {
        base,
        entries,
        tornado,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "One-factor-at-a-time sensitivity on the project pro forma",
        &serde_json::json!({
            "project_name": input.project_name,
            "factors": factors.factors,
            "levels": factors.levels,
            "discount_rate": config.discount_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(feature = "parallel")]
fn evaluate_tasks(
    tasks: Vec<PerturbationTask>,
    config: &ModelConfig,
    base: &KeyMetrics,
) -> Vec<SensitivityEntry> {
    tasks
        .into_par_iter()
        .map(|task| task.run(config, base))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_tasks(
    tasks: Vec<PerturbationTask>,
    config: &ModelConfig,
    base: &KeyMetrics,
) -> Vec<SensitivityEntry> {
    tasks
        .into_iter()
        .map(|task| task.run(config, base))
        .collect()
}

fn tornado(entries: &[SensitivityEntry]) -> Vec<TornadoBar> {
    let mut bars: Vec<TornadoBar> = SensitivityFactor::ALL
        .iter()
        .filter_map(|factor| {
            let npvs: Vec<Money> = entries
                .iter()
                .filter(|e| e.factor == *factor)
                .filter_map(|e| e.metrics().map(|m| m.npv))
                .collect();
            let low = npvs.iter().copied().min()?;
            let high = npvs.iter().copied().max()?;
            Some(TornadoBar {
                factor: *factor,
                npv_low: low,
                npv_high: high,
                swing: high - low,
            })
        })
        .collect();
    bars.sort_by(|a, b| b.swing.cmp(&a.swing).then(a.factor.cmp(&b.factor)));
    bars
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::solar_project;
    use pretty_assertions::assert_eq;

    fn sweep(factors: &FactorSet) -> SensitivityOutput {
        run_sensitivity(&solar_project(), &ModelConfig::default(), factors)
            .unwrap()
            .result
    }

    #[test]
    fn test_default_sweep_has_every_pair() {
        let out = sweep(&FactorSet::default());
        assert_eq!(out.entries.len(), 20);
        assert_eq!(out.tornado.len(), 5);
    }

    #[test]
    fn test_entries_sorted_by_factor_then_level() {
        let out = sweep(&FactorSet::default());
        for pair in out.entries.windows(2) {
            let key_a = (pair[0].factor, pair[0].level);
            let key_b = (pair[1].factor, pair[1].level);
            assert!(key_a < key_b);
        }
    }

    #[test]
    fn test_higher_price_raises_npv() {
        let set = FactorSet {
            factors: vec![SensitivityFactor::RevenuePrice],
            levels: vec![dec!(-0.10), dec!(0.10)],
        };
        let out = sweep(&set);
        let down = out.entries[0].metrics().unwrap();
        let up = out.entries[1].metrics().unwrap();
        assert!(down.npv < out.base.npv);
        assert!(up.npv > out.base.npv);
        assert_eq!(out.entries[1].perturbed_value, dec!(49.5));
    }

    #[test]
    fn test_operating_cost_scales_benchmark_om() {
        let set = FactorSet {
            factors: vec![SensitivityFactor::OperatingCost],
            levels: vec![dec!(0.20)],
        };
        let out = sweep(&set);
        let entry = &out.entries[0];
        assert_eq!(entry.base_value, dec!(14));
        assert_eq!(entry.perturbed_value, dec!(16.8));
        match &entry.outcome {
            SensitivityOutcome::Computed { deltas, .. } => assert!(deltas.npv < Decimal::ZERO),
            other => panic!("Expected computed outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_interest_rate_flexed_relatively() {
        let mut input = solar_project();
        input.interest_rate = dec!(0.05);
        SensitivityFactor::InterestRate
            .apply(&mut input, dec!(0.20))
            .unwrap();
        assert_eq!(input.interest_rate, dec!(0.06));
    }

    #[test]
    fn test_base_input_not_mutated() {
        let input = solar_project();
        let before = serde_json::to_string(&input).unwrap();
        run_sensitivity(&input, &ModelConfig::default(), &FactorSet::default()).unwrap();
        assert_eq!(serde_json::to_string(&input).unwrap(), before);
    }

    #[test]
    fn test_invalid_perturbation_recorded_as_failure() {
        let mut input = solar_project();
        input.capacity_factor = dec!(0.90);
        let set = FactorSet {
            factors: vec![SensitivityFactor::CapacityFactor],
            levels: vec![dec!(-0.10), dec!(0.20)],
        };
        let output = run_sensitivity(&input, &ModelConfig::default(), &set).unwrap();
        let entries = &output.result.entries;
        assert!(matches!(
            entries[0].outcome,
            SensitivityOutcome::Computed { .. }
        ));
        assert!(matches!(entries[1].outcome, SensitivityOutcome::Failed { .. }));
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_base_case_failure_is_an_error() {
        let mut input = solar_project();
        input.contracted_price_per_mwh = None;
        let result = run_sensitivity(&input, &ModelConfig::default(), &FactorSet::default());
        assert!(matches!(result, Err(AssessmentError::MissingInput { .. })));
    }

    #[test]
    fn test_level_at_minus_one_rejected() {
        let set = FactorSet {
            factors: vec![SensitivityFactor::CapitalCost],
            levels: vec![dec!(-1)],
        };
        let result = run_sensitivity(&solar_project(), &ModelConfig::default(), &set);
        assert!(matches!(result, Err(AssessmentError::InvalidInput { .. })));
    }

    #[test]
    fn test_tornado_ranked_by_swing() {
        let out = sweep(&FactorSet::default());
        for pair in out.tornado.windows(2) {
            assert!(pair[0].swing >= pair[1].swing);
        }
        assert!(out.tornado.iter().all(|b| b.npv_high >= b.npv_low));
    }
}
