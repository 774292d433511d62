use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::credit::rating::{counterparty_base_pd, credit_spread_bps, rating_for_pd, RiskCategory};
use crate::error::AssessmentError;
use crate::financial::FinancialResult;
use crate::project::{
    CounterpartyRating, CreditRating, EntityType, EpcContractType, InsuranceCoverage,
    OfftakeType, ProjectInput,
};
use crate::types::{with_metadata, ComputationOutput, Money, Multiple, Rate};
use crate::AssessmentResult;

const PD_FLOOR: Rate = dec!(0.0001);
const LGD_FLOOR: Rate = dec!(0.05);
const LGD_CEILING: Rate = dec!(0.95);
/// LGD at or above which the equivalent rating is notched down.
const HIGH_SEVERITY_LGD: Rate = dec!(0.60);
/// Minimum DSCR below which the equivalent rating is notched down.
const WEAK_COVERAGE_DSCR: Multiple = dec!(1.10);
const CONSTRUCTION_PD_ADJUSTMENT: Decimal = dec!(1.25);
const DSRA_LGD_RELIEF_PER_MONTH: Decimal = dec!(0.02);
/// Largest-counterparty revenue share above which a single offtaker is a
/// concentration risk.
const CONCENTRATION_RISK_SHARE: Rate = dec!(0.80);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Multipliers applied to the counterparty's base PD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdAdjustments {
    pub base_pd: Rate,
    pub contract: Decimal,
    pub tenor: Decimal,
    pub dscr: Decimal,
    pub entity: Decimal,
    pub construction: Decimal,
    /// Revenue concentration; 1.0 when the share is not supplied
    pub concentration: Decimal,
}

impl PdAdjustments {
    pub fn combined(&self) -> Decimal {
        self.contract
            * self.tenor
            * self.dscr
            * self.entity
            * self.construction
            * self.concentration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: String,
    pub factor: String,
    pub severity: Severity,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigantStrength {
    Moderate,
    Strong,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mitigant {
    pub category: String,
    pub mitigant: String,
    pub strength: MitigantStrength,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRiskResult {
    /// Probability of default (0-1)
    pub probability_of_default: Rate,
    /// Loss given default (0-1)
    pub loss_given_default: Rate,
    /// Senior debt at origination
    pub exposure_at_default: Money,
    /// PD x LGD x EAD
    pub expected_loss: Money,
    /// Expected loss as a share of exposure
    pub expected_loss_rate: Rate,
    pub equivalent_rating: CreditRating,
    pub risk_category: RiskCategory,
    /// Indicative senior spread; absent for a D equivalent
    pub credit_spread_bps: Option<u32>,
    pub pd_adjustments: PdAdjustments,
    /// Collateral LGD before structural protections
    pub collateral_lgd: Rate,
    pub risk_factors: Vec<RiskFactor>,
    pub mitigants: Vec<Mitigant>,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Assess the credit risk of the project debt and wrap it in the standard
/// output envelope.
pub fn assess_credit_risk(
    input: &ProjectInput,
    financials: &FinancialResult,
) -> AssessmentResult<ComputationOutput<CreditRiskResult>> {
    let start = Instant::now();

    let result = evaluate_credit_risk(input, financials)?;

    let mut warnings = Vec::new();
    if !result.equivalent_rating.is_investment_grade() {
        warnings.push(format!(
            "Equivalent rating {} is below investment grade",
            result.equivalent_rating
        ));
    }
    if result.probability_of_default >= Decimal::ONE {
        warnings.push("Probability of default is capped at 100%".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Adjusted PD x LGD x EAD with rating-band equivalence",
        &serde_json::json!({
            "counterparty_rating": input.counterparty_rating,
            "borrower_entity": input.borrower_entity,
            "offtake_type": input.offtake_type,
            "offtake_tenor_years": input.offtake_tenor_years,
            "construction_risk": input.construction_risk,
            "min_dscr": financials.min_dscr.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Derive PD, LGD, expected loss and the equivalent rating from the project
/// description and its pro forma.
pub fn evaluate_credit_risk(
    input: &ProjectInput,
    financials: &FinancialResult,
) -> AssessmentResult<CreditRiskResult> {
    input.validate()?;

    let rating = input
        .counterparty_rating
        .ok_or_else(|| AssessmentError::missing("counterparty_rating"))?;
    let entity = input
        .borrower_entity
        .ok_or_else(|| AssessmentError::missing("borrower_entity"))?;

    let adjustments = PdAdjustments {
        base_pd: counterparty_base_pd(rating),
        contract: contract_adjustment(input.offtake_type),
        tenor: tenor_adjustment(input.offtake_tenor_years),
        dscr: dscr_adjustment(financials.min_dscr),
        entity: entity_adjustment(entity),
        construction: if input.construction_risk {
            CONSTRUCTION_PD_ADJUSTMENT
        } else {
            Decimal::ONE
        },
        concentration: concentration_adjustment(input.revenue_concentration),
    };
    let probability_of_default = (adjustments.base_pd * adjustments.combined())
        .max(PD_FLOOR)
        .min(Decimal::ONE);

    let collateral_lgd = input.benchmark().collateral_lgd;
    let loss_given_default = apply_protections(input, collateral_lgd)
        .max(LGD_FLOOR)
        .min(LGD_CEILING);

    let exposure_at_default = input.debt_amount();
    let expected_loss = probability_of_default * loss_given_default * exposure_at_default;
    let expected_loss_rate = if exposure_at_default > Decimal::ZERO {
        expected_loss / exposure_at_default
    } else {
        Decimal::ZERO
    };

    let mut equivalent_rating = rating_for_pd(probability_of_default);
    if loss_given_default >= HIGH_SEVERITY_LGD {
        equivalent_rating = equivalent_rating.notch_down();
    }
    if financials.min_dscr < WEAK_COVERAGE_DSCR {
        equivalent_rating = equivalent_rating.notch_down();
    }

    Ok(CreditRiskResult {
        probability_of_default,
        loss_given_default,
        exposure_at_default,
        expected_loss,
        expected_loss_rate,
        equivalent_rating,
        risk_category: RiskCategory::from_pd(probability_of_default),
        credit_spread_bps: credit_spread_bps(equivalent_rating),
        pd_adjustments: adjustments,
        collateral_lgd,
        risk_factors: identify_risk_factors(input, financials, rating),
        mitigants: identify_mitigants(input, financials),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn contract_adjustment(offtake: OfftakeType) -> Decimal {
    match offtake {
        OfftakeType::PpaFixed => dec!(0.85),
        OfftakeType::PpaIndexed => dec!(0.95),
        OfftakeType::RegulatedRate => dec!(0.80),
        OfftakeType::Tolling => dec!(1.0),
        OfftakeType::CapacityContract => dec!(1.05),
        OfftakeType::BundledRate => dec!(0.90),
        OfftakeType::Merchant => dec!(1.60),
    }
}

/// Longer contracts reduce renewal risk.
fn tenor_adjustment(tenor_years: u32) -> Decimal {
    if tenor_years >= 20 {
        dec!(0.85)
    } else if tenor_years >= 15 {
        dec!(0.90)
    } else if tenor_years >= 10 {
        dec!(1.0)
    } else if tenor_years >= 5 {
        dec!(1.15)
    } else {
        dec!(1.40)
    }
}

fn dscr_adjustment(min_dscr: Multiple) -> Decimal {
    if min_dscr >= dec!(1.60) {
        dec!(0.70)
    } else if min_dscr >= dec!(1.40) {
        dec!(0.80)
    } else if min_dscr >= dec!(1.25) {
        dec!(0.90)
    } else if min_dscr >= dec!(1.10) {
        dec!(1.0)
    } else if min_dscr >= Decimal::ONE {
        dec!(1.30)
    } else {
        dec!(1.60)
    }
}

fn entity_adjustment(entity: EntityType) -> Decimal {
    match entity {
        EntityType::InvestorOwnedUtility => dec!(0.90),
        EntityType::MunicipalUtility => dec!(0.85),
        EntityType::Cooperative => dec!(0.95),
        EntityType::IndependentPowerProducer => dec!(1.10),
        EntityType::CommunityChoiceAggregator => dec!(1.15),
        EntityType::TribalUtility => dec!(1.05),
        EntityType::StateAuthority => dec!(0.80),
    }
}

/// A single dominant counterparty raises PD; a spread revenue base lowers it.
fn concentration_adjustment(share: Option<Rate>) -> Decimal {
    match share {
        None => Decimal::ONE,
        Some(s) if s >= dec!(0.90) => dec!(1.10),
        Some(s) if s >= dec!(0.70) => dec!(1.05),
        Some(_) => dec!(0.95),
    }
}

fn apply_protections(input: &ProjectInput, collateral_lgd: Rate) -> Rate {
    let protections = &input.protections;
    let mut lgd = collateral_lgd;

    if protections.completion_guarantee {
        lgd *= dec!(0.90);
    }
    if protections.dsra_months > 0 {
        let relief = DSRA_LGD_RELIEF_PER_MONTH * Decimal::from(protections.dsra_months);
        lgd *= (Decimal::ONE - relief).max(Decimal::ZERO);
    }
    if protections.credit_support {
        lgd *= dec!(0.85);
    }
    if protections.step_in_rights {
        lgd *= dec!(0.92);
    }
    match protections.insurance {
        InsuranceCoverage::Comprehensive => lgd *= dec!(0.90),
        InsuranceCoverage::Standard => lgd *= dec!(0.95),
        InsuranceCoverage::Basic | InsuranceCoverage::None => {}
    }

    lgd
}

fn risk_factor(category: &str, factor: &str, severity: Severity, detail: String) -> RiskFactor {
    RiskFactor {
        category: category.into(),
        factor: factor.into(),
        severity,
        detail,
    }
}

fn identify_risk_factors(
    input: &ProjectInput,
    financials: &FinancialResult,
    rating: CounterpartyRating,
) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    if financials.min_dscr < dec!(1.20) {
        factors.push(risk_factor(
            "Financial",
            "Below-target debt service coverage",
            Severity::High,
            format!(
                "Minimum DSCR of {:.2}x is below the 1.20x level infrastructure lenders typically require.",
                financials.min_dscr
            ),
        ));
    }
    let max_leverage = input.benchmark().max_leverage;
    if input.leverage_ratio > max_leverage {
        factors.push(risk_factor(
            "Financial",
            "High leverage ratio",
            Severity::Medium,
            format!(
                "Debt share of {:.0}% exceeds the {:.0}% lenders usually extend to {} projects.",
                input.leverage_ratio * dec!(100),
                max_leverage * dec!(100),
                input.technology.label()
            ),
        ));
    }
    match rating {
        CounterpartyRating::Unrated => factors.push(risk_factor(
            "Credit",
            "Unrated offtaker",
            Severity::Medium,
            "Offtaker carries no public rating; lenders must underwrite its financials directly."
                .to_string(),
        )),
        CounterpartyRating::Rated(r) if !r.is_investment_grade() => factors.push(risk_factor(
            "Credit",
            "Sub-investment-grade offtaker",
            Severity::High,
            format!("Offtaker rated {r}, below investment grade, which may limit financing options."),
        )),
        CounterpartyRating::Rated(_) => {}
    }
    if let Some(share) = input.revenue_concentration {
        if share > CONCENTRATION_RISK_SHARE && input.counterparty_count <= 1 {
            factors.push(risk_factor(
                "Credit",
                "Revenue concentration",
                Severity::Medium,
                "Revenue stream depends on a single counterparty with no diversification."
                    .into(),
            ));
        }
    }
    if input.offtake_type == OfftakeType::Merchant {
        factors.push(risk_factor(
            "Revenue",
            "Merchant exposure",
            Severity::High,
            "Project lacks a long-term contracted revenue stream, exposing cash flows to market price volatility.".into(),
        ));
    } else if input.offtake_tenor_years < input.loan_tenor_years {
        factors.push(risk_factor(
            "Revenue",
            "Contract-tenor mismatch",
            Severity::Medium,
            format!(
                "Offtake contract ({} years) expires before debt maturity ({} years), creating recontracting risk.",
                input.offtake_tenor_years, input.loan_tenor_years
            ),
        ));
    }
    if input.construction_risk {
        factors.push(risk_factor(
            "Construction",
            "Construction completion risk",
            Severity::Medium,
            "Debt is exposed to cost overrun and delay before commercial operation.".into(),
        ));
    }
    if matches!(
        input.epc_contract,
        EpcContractType::CostPlus | EpcContractType::SelfBuild
    ) {
        factors.push(risk_factor(
            "Construction",
            "Uncapped construction cost",
            Severity::Medium,
            "EPC arrangement leaves cost overrun risk with the project.".into(),
        ));
    }
    if input.protections.dsra_months == 0 {
        factors.push(risk_factor(
            "Structure",
            "Unfunded reserves",
            Severity::Low,
            "No debt service reserve account is funded.".into(),
        ));
    }

    factors
}

fn mitigant(category: &str, name: &str, strength: MitigantStrength, detail: String) -> Mitigant {
    Mitigant {
        category: category.into(),
        mitigant: name.into(),
        strength,
        detail,
    }
}

fn identify_mitigants(input: &ProjectInput, financials: &FinancialResult) -> Vec<Mitigant> {
    let mut mitigants = Vec::new();
    let protections = &input.protections;

    if matches!(
        input.offtake_type,
        OfftakeType::PpaFixed | OfftakeType::RegulatedRate
    ) {
        mitigants.push(mitigant(
            "Revenue",
            "Contracted revenue stream",
            MitigantStrength::Strong,
            format!(
                "Long-term {} provides revenue certainty over {} years.",
                input.offtake_type.label(),
                input.offtake_tenor_years
            ),
        ));
    }
    if input.epc_contract == EpcContractType::FixedPriceTurnkey {
        mitigants.push(mitigant(
            "Construction",
            "Fixed-price turnkey EPC",
            MitigantStrength::Strong,
            "Construction cost risk is transferred to the EPC contractor under a lump-sum turnkey arrangement.".into(),
        ));
    }
    if protections.completion_guarantee {
        mitigants.push(mitigant(
            "Construction",
            "Completion guarantee",
            MitigantStrength::Strong,
            "Sponsor or contractor completion guarantee reduces construction completion risk.".into(),
        ));
    }
    if protections.dsra_months > 0 {
        mitigants.push(mitigant(
            "Liquidity",
            "Funded reserve accounts",
            MitigantStrength::Moderate,
            format!(
                "{} months of debt service reserve provides a liquidity cushion.",
                protections.dsra_months
            ),
        ));
    }
    if protections.insurance == InsuranceCoverage::Comprehensive {
        mitigants.push(mitigant(
            "Risk Transfer",
            "Comprehensive insurance",
            MitigantStrength::Moderate,
            "Insurance program covers property, liability, business interruption and natural catastrophe.".into(),
        ));
    }
    if matches!(input.revenue_concentration, Some(s) if s < dec!(0.70))
        && input.counterparty_count > 1
    {
        mitigants.push(mitigant(
            "Revenue",
            "Diversified revenue base",
            MitigantStrength::Moderate,
            format!(
                "Revenue is spread across {} counterparties.",
                input.counterparty_count
            ),
        ));
    }
    if protections.credit_support {
        mitigants.push(mitigant(
            "Credit",
            "Credit support",
            MitigantStrength::Strong,
            "Additional credit support enhances counterparty credit quality.".into(),
        ));
    }
    if protections.step_in_rights {
        mitigants.push(mitigant(
            "Structure",
            "Lender step-in rights",
            MitigantStrength::Moderate,
            "Lenders can cure defaults and replace the operator before enforcement.".into(),
        ));
    }
    if financials.min_dscr >= dec!(1.40) && financials.debt_amount > Decimal::ZERO {
        mitigants.push(mitigant(
            "Financial",
            "Strong debt service coverage",
            MitigantStrength::Strong,
            format!(
                "Minimum DSCR of {:.2}x provides substantial cash flow cushion above debt service requirements.",
                financials.min_dscr
            ),
        ));
    }

    mitigants
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
