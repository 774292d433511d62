use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use bankability_core::sensitivity::{self, FactorSet, Perturbation, SensitivityFactor};

use super::ProjectArgs;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FactorArg {
    Price,
    Opex,
    Capex,
    InterestRate,
    CapacityFactor,
}

impl From<FactorArg> for SensitivityFactor {
    fn from(arg: FactorArg) -> Self {
        match arg {
            FactorArg::Price => SensitivityFactor::RevenuePrice,
            FactorArg::Opex => SensitivityFactor::OperatingCost,
            FactorArg::Capex => SensitivityFactor::CapitalCost,
            FactorArg::InterestRate => SensitivityFactor::InterestRate,
            FactorArg::CapacityFactor => SensitivityFactor::CapacityFactor,
        }
    }
}

/// Arguments for the sensitivity sweep and combined scenarios
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Factors to flex (defaults to all)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub factors: Vec<FactorArg>,

    /// Relative levels, e.g. "-0.2,-0.1,0.1,0.2"
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub levels: Vec<Decimal>,

    /// Run one combined scenario instead of a sweep; repeat as factor=level
    /// (e.g. --combine price=-0.1 --combine capex=0.15)
    #[arg(long, value_parser = parse_perturbation, allow_hyphen_values = true)]
    pub combine: Vec<Perturbation>,
}

fn parse_perturbation(raw: &str) -> Result<Perturbation, String> {
    let (name, level) = raw
        .split_once('=')
        .ok_or_else(|| format!("Expected factor=level, got '{raw}'"))?;
    let factor = FactorArg::from_str(name.trim(), true)?;
    let level: Decimal = level
        .trim()
        .parse()
        .map_err(|e| format!("Invalid level '{level}': {e}"))?;
    Ok(Perturbation {
        factor: factor.into(),
        level,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let project = input::read_project(args.project.input.as_deref())?;
    let config = input::config::load_config(args.project.config.as_deref())?;

    if !args.combine.is_empty() {
        let result = sensitivity::run_combined_scenario(&project, &config.model, &args.combine)?;
        return Ok(serde_json::to_value(result)?);
    }

    let mut factors = FactorSet::default();
    if !args.factors.is_empty() {
        factors.factors = args.factors.into_iter().map(Into::into).collect();
    }
    if !args.levels.is_empty() {
        factors.levels = args.levels;
    }

    let result = sensitivity::run_sensitivity(&project, &config.model, &factors)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_perturbation() {
        let p = parse_perturbation("capacity-factor=-0.15").unwrap();
        assert_eq!(p.factor, SensitivityFactor::CapacityFactor);
        assert_eq!(p.level, dec!(-0.15));
    }

    #[test]
    fn test_parse_perturbation_rejects_unknown_factor() {
        assert!(parse_perturbation("wacc=0.1").is_err());
        assert!(parse_perturbation("price").is_err());
    }
}
