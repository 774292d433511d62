use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use crate::types::Rate;
use crate::AssessmentResult;

const WEIGHT_SUM_TOLERANCE: Decimal = dec!(0.000000001);
/// Largest annual escalation the model compounds.
pub const MAX_ESCALATION: Rate = dec!(0.5);
/// Longest operating life the model projects.
pub const MAX_PROJECT_LIFE_YEARS: u32 = 100;

/// Assumptions shared by every run of the financial model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub discount_rate: Rate,
    pub om_escalation: Rate,
    pub price_escalation: Rate,
    /// Combined federal and state effective rate
    pub tax_rate: Rate,
    /// Operating years modelled; the technology's useful life when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_life_years: Option<u32>,
    /// Years over which a production tax credit is earned
    pub ptc_years: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            discount_rate: dec!(0.08),
            om_escalation: dec!(0.025),
            price_escalation: dec!(0.02),
            tax_rate: dec!(0.21),
            project_life_years: None,
            ptc_years: 10,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> AssessmentResult<()> {
        if self.discount_rate <= dec!(-1) {
            return Err(AssessmentError::invalid(
                "discount_rate",
                "Discount rate must be greater than -100%",
            ));
        }
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(AssessmentError::invalid(
                "tax_rate",
                "Tax rate must be between 0 and 1",
            ));
        }
        for (field, rate) in [
            ("om_escalation", self.om_escalation),
            ("price_escalation", self.price_escalation),
        ] {
            if rate <= dec!(-1) || rate > MAX_ESCALATION {
                return Err(AssessmentError::invalid(
                    field,
                    format!("Escalation must be greater than -100% and at most {MAX_ESCALATION}"),
                ));
            }
        }
        match self.project_life_years {
            Some(0) => {
                return Err(AssessmentError::invalid(
                    "project_life_years",
                    "Project life must be at least one year",
                ))
            }
            Some(years) if years > MAX_PROJECT_LIFE_YEARS => {
                return Err(AssessmentError::invalid(
                    "project_life_years",
                    format!("Project life cannot exceed {MAX_PROJECT_LIFE_YEARS} years"),
                ))
            }
            _ => {}
        }
        Ok(())
    }
}

/// Share of the composite score carried by each dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionWeights {
    pub technology: Decimal,
    pub financial: Decimal,
    pub credit: Decimal,
    pub structure: Decimal,
    pub market: Decimal,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            technology: dec!(0.20),
            financial: dec!(0.25),
            credit: dec!(0.20),
            structure: dec!(0.20),
            market: dec!(0.15),
        }
    }
}

impl DimensionWeights {
    pub fn total(&self) -> Decimal {
        self.technology + self.financial + self.credit + self.structure + self.market
    }

    pub fn validate(&self) -> AssessmentResult<()> {
        let all = [
            self.technology,
            self.financial,
            self.credit,
            self.structure,
            self.market,
        ];
        if all.iter().any(|w| *w < Decimal::ZERO) {
            return Err(AssessmentError::invalid(
                "weights",
                "Dimension weights cannot be negative",
            ));
        }
        let total = self.total();
        if (total - Decimal::ONE).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AssessmentError::invalid(
                "weights",
                format!("Dimension weights must sum to 1.0, got {total}"),
            ));
        }
        Ok(())
    }
}

/// Full configuration for a bankability assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    pub model: ModelConfig,
    pub weights: DimensionWeights,
    /// Minimum project IRR a sponsor would accept
    pub hurdle_rate: Rate,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            weights: DimensionWeights::default(),
            hurdle_rate: dec!(0.08),
        }
    }
}

impl AssessmentConfig {
    pub fn validate(&self) -> AssessmentResult<()> {
        self.model.validate()?;
        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = DimensionWeights::default();
        assert_eq!(weights.total(), Decimal::ONE);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_weights_off_by_more_than_tolerance_rejected() {
        let weights = DimensionWeights {
            market: dec!(0.16),
            ..DimensionWeights::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(AssessmentError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AssessmentConfig =
            serde_json::from_str(r#"{ "model": { "discount_rate": "0.07" } }"#).unwrap();
        assert_eq!(config.model.discount_rate, dec!(0.07));
        assert_eq!(config.model.tax_rate, dec!(0.21));
        assert_eq!(config.weights, DimensionWeights::default());
        assert_eq!(config.hurdle_rate, dec!(0.08));
    }

    #[test]
    fn test_zero_project_life_rejected() {
        let config = ModelConfig {
            project_life_years: Some(0),
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_escalation_and_life_bounded() {
        let runaway = ModelConfig {
            price_escalation: dec!(1.0),
            project_life_years: Some(100),
            ..ModelConfig::default()
        };
        assert!(matches!(
            runaway.validate(),
            Err(AssessmentError::InvalidInput { ref field, .. }) if field == "price_escalation"
        ));

        let long_life = ModelConfig {
            project_life_years: Some(101),
            ..ModelConfig::default()
        };
        assert!(long_life.validate().is_err());

        let at_limits = ModelConfig {
            price_escalation: MAX_ESCALATION,
            om_escalation: MAX_ESCALATION,
            project_life_years: Some(MAX_PROJECT_LIFE_YEARS),
            ..ModelConfig::default()
        };
        assert!(at_limits.validate().is_ok());
    }
}
