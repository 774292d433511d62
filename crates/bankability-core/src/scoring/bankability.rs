use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::config::AssessmentConfig;
use crate::credit::{evaluate_credit_risk, CreditRiskResult};
use crate::financial::{build_pro_forma, pro_forma::collect_warnings, FinancialResult};
use crate::project::ProjectInput;
use crate::scoring::dimensions::{
    credit_factors, financial_factors, market_factors, structure_factors, technology_factors,
    Dimension, FactorSheet, SubScore,
};
use crate::scoring::narrative;
use crate::types::{with_metadata, ComputationOutput, Score};
use crate::AssessmentResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BankabilityGrade {
    #[serde(rename = "Investment Grade")]
    InvestmentGrade,
    #[serde(rename = "Near Investment Grade")]
    NearInvestmentGrade,
    #[serde(rename = "Sub-Investment Grade")]
    SubInvestmentGrade,
    Speculative,
    #[serde(rename = "Pre-Bankable")]
    PreBankable,
}

impl BankabilityGrade {
    /// Lower bounds are inclusive: 80.0 is Investment Grade, 79.999 is not.
    pub fn from_score(score: Score) -> Self {
        if score >= dec!(80) {
            BankabilityGrade::InvestmentGrade
        } else if score >= dec!(65) {
            BankabilityGrade::NearInvestmentGrade
        } else if score >= dec!(50) {
            BankabilityGrade::SubInvestmentGrade
        } else if score >= dec!(35) {
            BankabilityGrade::Speculative
        } else {
            BankabilityGrade::PreBankable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BankabilityGrade::InvestmentGrade => "Investment Grade",
            BankabilityGrade::NearInvestmentGrade => "Near Investment Grade",
            BankabilityGrade::SubInvestmentGrade => "Sub-Investment Grade",
            BankabilityGrade::Speculative => "Speculative",
            BankabilityGrade::PreBankable => "Pre-Bankable",
        }
    }
}

impl std::fmt::Display for BankabilityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankabilityResult {
    pub project_name: String,
    /// Weighted composite on a 0-100 scale
    pub overall_score: Score,
    pub grade: BankabilityGrade,
    /// One entry per dimension, in fixed order
    pub sub_scores: Vec<SubScore>,
    pub financials: FinancialResult,
    pub credit: CreditRiskResult,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

impl BankabilityResult {
    pub fn sub_score(&self, dimension: Dimension) -> Option<&SubScore> {
        self.sub_scores.iter().find(|s| s.dimension == dimension)
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Full bankability assessment wrapped in the standard output envelope.
pub fn score_bankability(
    input: &ProjectInput,
    config: &AssessmentConfig,
) -> AssessmentResult<ComputationOutput<BankabilityResult>> {
    let start = Instant::now();

    let result = evaluate_bankability(input, config)?;

    let mut warnings = collect_warnings(input, &result.financials);
    if !result.credit.equivalent_rating.is_investment_grade() {
        warnings.push(format!(
            "Equivalent credit rating {} is below investment grade",
            result.credit.equivalent_rating
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Weighted five-dimension bankability scorecard",
        &serde_json::json!({
            "project_name": input.project_name,
            "technology": input.technology,
            "weights": config.weights,
            "hurdle_rate": config.hurdle_rate.to_string(),
            "discount_rate": config.model.discount_rate.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Run the financial and credit models once each and score all five
/// dimensions.
#[tracing::instrument(skip_all, fields(project = %input.project_name))]
pub fn evaluate_bankability(
    input: &ProjectInput,
    config: &AssessmentConfig,
) -> AssessmentResult<BankabilityResult> {
    config.validate()?;

    let financials = build_pro_forma(input, &config.model)?;
    let credit = evaluate_credit_risk(input, &financials)?;

    let sheets: [(Dimension, FactorSheet); 5] = [
        (Dimension::Technology, technology_factors(input)),
        (
            Dimension::Financial,
            financial_factors(input, &financials, config.hurdle_rate),
        ),
        (Dimension::Credit, credit_factors(input, &credit)),
        (Dimension::Structure, structure_factors(input)),
        (Dimension::Market, market_factors(input, &financials)),
    ];

    let sub_scores: Vec<SubScore> = sheets
        .into_iter()
        .map(|(dimension, sheet)| {
            let score = sheet.score();
            let weight = dimension.weight(&config.weights);
            SubScore {
                dimension,
                score,
                weight,
                weighted_score: score * weight,
                commentary: narrative::commentary(
                    dimension,
                    score,
                    &financials,
                    &credit,
                    config.hurdle_rate,
                ),
                factors: sheet.into_factors(),
            }
        })
        .collect();

    let overall_score = sub_scores
        .iter()
        .map(|s| s.weighted_score)
        .sum::<Decimal>()
        .max(Decimal::ZERO)
        .min(dec!(100));
    let grade = BankabilityGrade::from_score(overall_score);

    info!(score = %overall_score.round_dp(1), %grade, "bankability assessment complete");

    Ok(BankabilityResult {
        project_name: input.project_name.clone(),
        overall_score,
        grade,
        strengths: narrative::strengths(input, &sub_scores, &financials, config.hurdle_rate),
        weaknesses: narrative::weaknesses(&sub_scores, &financials, &credit, config.hurdle_rate),
        recommendations: narrative::recommendations(input, &financials, &credit),
        sub_scores,
        financials,
        credit,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
