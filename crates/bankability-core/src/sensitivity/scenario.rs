use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::debug;

use super::sweep::{KeyMetrics, MetricDeltas, SensitivityFactor};
use crate::config::ModelConfig;
use crate::error::AssessmentError;
use crate::financial::build_pro_forma;
use crate::project::ProjectInput;
use crate::types::{with_metadata, ComputationOutput};
use crate::AssessmentResult;

/// A single relative change applied as part of a combined scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perturbation {
    pub factor: SensitivityFactor,
    pub level: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub perturbations: Vec<Perturbation>,
    pub base: KeyMetrics,
    pub scenario: KeyMetrics,
    pub deltas: MetricDeltas,
    /// True when the scenario still clears 1.0x minimum DSCR
    pub debt_serviceable: bool,
}

/// Apply several perturbations together and compare against the base case.
///
/// Each factor may appear at most once. Unlike the one-factor sweep, a
/// failing scenario is an error.
pub fn run_combined_scenario(
    input: &ProjectInput,
    config: &ModelConfig,
    perturbations: &[Perturbation],
) -> AssessmentResult<ComputationOutput<ScenarioResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if perturbations.is_empty() {
        return Err(AssessmentError::invalid(
            "perturbations",
            "A combined scenario needs at least one perturbation",
        ));
    }
    let mut seen = BTreeSet::new();
    for p in perturbations {
        if !seen.insert(p.factor) {
            return Err(AssessmentError::invalid(
                "perturbations",
                format!("{} is perturbed more than once", p.factor.label()),
            ));
        }
        if p.level <= dec!(-1) {
            return Err(AssessmentError::invalid(
                "perturbations",
                format!("Level {} would drive the input to zero or below", p.level),
            ));
        }
    }

    let base = KeyMetrics::from_result(&build_pro_forma(input, config)?);

    let mut stressed = input.clone();
    for p in perturbations {
        p.factor.apply(&mut stressed, p.level)?;
    }
    debug!(count = perturbations.len(), "running combined scenario");
    let scenario = KeyMetrics::from_result(&build_pro_forma(&stressed, config)?);
    let deltas = scenario.deltas_from(&base);
    let debt_serviceable = scenario.min_dscr >= Decimal::ONE;

    if !debt_serviceable {
        warnings.push(format!(
            "Minimum DSCR falls to {}x under this scenario",
            scenario.min_dscr.round_dp(2)
        ));
    }
    if scenario.irr.is_none() {
        warnings.push("Project IRR could not be computed under this scenario".into());
    }

    let output = ScenarioResult {
        perturbations: perturbations.to_vec(),
        base,
        scenario,
        deltas,
        debt_serviceable,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Combined multi-factor stress scenario on the project pro forma",
        &serde_json::json!({
            "project_name": input.project_name,
            "perturbations": perturbations,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::solar_project;
    use crate::sensitivity::{run_sensitivity, FactorSet};

    fn stress(perturbations: &[Perturbation]) -> AssessmentResult<ScenarioResult> {
        run_combined_scenario(&solar_project(), &ModelConfig::default(), perturbations)
            .map(|o| o.result)
    }

    #[test]
    fn test_downside_case_hurts_every_metric() {
        let result = stress(&[
            Perturbation {
                factor: SensitivityFactor::RevenuePrice,
                level: dec!(-0.10),
            },
            Perturbation {
                factor: SensitivityFactor::OperatingCost,
                level: dec!(0.10),
            },
        ])
        .unwrap();
        assert!(result.deltas.npv < Decimal::ZERO);
        assert!(result.deltas.min_dscr < Decimal::ZERO);
        assert_eq!(result.perturbations.len(), 2);
    }

    #[test]
    fn test_single_perturbation_matches_sweep_entry() {
        let level = dec!(0.10);
        let combined = stress(&[Perturbation {
            factor: SensitivityFactor::CapitalCost,
            level,
        }])
        .unwrap();
        let set = FactorSet {
            factors: vec![SensitivityFactor::CapitalCost],
            levels: vec![level],
        };
        let sweep = run_sensitivity(&solar_project(), &ModelConfig::default(), &set).unwrap();
        let entry = sweep.result.entries[0].metrics().unwrap();
        assert_eq!(&combined.scenario, entry);
    }

    #[test]
    fn test_duplicate_factor_rejected() {
        let p = Perturbation {
            factor: SensitivityFactor::InterestRate,
            level: dec!(0.10),
        };
        assert!(matches!(
            stress(&[p, p]),
            Err(AssessmentError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_empty_scenario_rejected() {
        assert!(stress(&[]).is_err());
    }

    #[test]
    fn test_severe_stress_flags_debt_service() {
        let output = run_combined_scenario(
            &solar_project(),
            &ModelConfig::default(),
            &[
                Perturbation {
                    factor: SensitivityFactor::RevenuePrice,
                    level: dec!(-0.50),
                },
                Perturbation {
                    factor: SensitivityFactor::CapacityFactor,
                    level: dec!(-0.30),
                },
            ],
        )
        .unwrap();
        assert!(!output.result.debt_serviceable);
        assert!(!output.warnings.is_empty());
    }
}
