//! Factor point scales for each scoring dimension.
//!
//! Every dimension's factors total 100 possible points. A factor that cannot
//! be evaluated is recorded with zero possible points so it drops out of the
//! ratio instead of counting against the project.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::benchmarks::TechnologyMaturity;
use crate::config::DimensionWeights;
use crate::credit::{counterparty_score, CreditRiskResult};
use crate::financial::FinancialResult;
use crate::project::{
    DevelopmentStage, EpcContractType, InterconnectionStatus, OfftakeType, PermittingStatus,
    ProjectInput, RegulatoryEnvironment, ResourceQuality,
};
use crate::types::{Rate, Score};

const MAX_SCORE: Score = dec!(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Technology,
    Financial,
    Credit,
    Structure,
    Market,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Technology,
        Dimension::Financial,
        Dimension::Credit,
        Dimension::Structure,
        Dimension::Market,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Technology => "Technology",
            Dimension::Financial => "Financial",
            Dimension::Credit => "Credit",
            Dimension::Structure => "Structure",
            Dimension::Market => "Market",
        }
    }

    pub fn weight(self, weights: &DimensionWeights) -> Decimal {
        match self {
            Dimension::Technology => weights.technology,
            Dimension::Financial => weights.financial,
            Dimension::Credit => weights.credit,
            Dimension::Structure => weights.structure,
            Dimension::Market => weights.market,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorPoints {
    pub earned: Decimal,
    pub possible: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub dimension: Dimension,
    /// 0-100
    pub score: Score,
    pub weight: Decimal,
    pub weighted_score: Score,
    pub factors: BTreeMap<String, FactorPoints>,
    pub commentary: String,
}

/// Earned points per factor for one dimension.
#[derive(Debug, Default)]
pub(crate) struct FactorSheet {
    factors: BTreeMap<String, FactorPoints>,
}

impl FactorSheet {
    fn add(&mut self, name: &str, earned: Decimal, possible: Decimal) {
        self.factors.insert(
            name.to_string(),
            FactorPoints {
                earned: earned.min(possible),
                possible,
            },
        );
    }

    /// Earned share of possible points on a 0-100 scale.
    pub(crate) fn score(&self) -> Score {
        let possible: Decimal = self.factors.values().map(|f| f.possible).sum();
        if possible <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let earned: Decimal = self.factors.values().map(|f| f.earned).sum();
        (earned / possible * MAX_SCORE)
            .max(Decimal::ZERO)
            .min(MAX_SCORE)
    }

    pub(crate) fn into_factors(self) -> BTreeMap<String, FactorPoints> {
        self.factors
    }
}

/// Points for the first tier whose floor `value` reaches.
fn at_least(value: Decimal, tiers: &[(Decimal, Decimal)]) -> Decimal {
    tiers
        .iter()
        .find(|(floor, _)| value >= *floor)
        .map(|(_, points)| *points)
        .unwrap_or(Decimal::ZERO)
}

/// Points for the first tier whose ceiling `value` stays within.
fn at_most(value: Decimal, tiers: &[(Decimal, Decimal)]) -> Decimal {
    tiers
        .iter()
        .find(|(ceiling, _)| value <= *ceiling)
        .map(|(_, points)| *points)
        .unwrap_or(Decimal::ZERO)
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator > Decimal::ZERO {
        Some(numerator / denominator)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Technology
// ---------------------------------------------------------------------------

pub(crate) fn technology_factors(input: &ProjectInput) -> FactorSheet {
    let benchmark = input.benchmark();
    let mut sheet = FactorSheet::default();

    let maturity = match benchmark.maturity {
        TechnologyMaturity::Mature => dec!(30),
        TechnologyMaturity::Commercial => dec!(22),
        TechnologyMaturity::Emerging => dec!(12),
        TechnologyMaturity::FirstOfAKind => dec!(5),
    };
    sheet.add("technology_maturity", maturity, dec!(30));

    let capacity_factor = ratio(input.capacity_factor, benchmark.capacity_factor_p50)
        .map(|r| {
            at_least(
                r,
                &[
                    (dec!(1.0), dec!(25)),
                    (dec!(0.9), dec!(20)),
                    (dec!(0.8), dec!(13)),
                    (dec!(0.7), dec!(7)),
                ],
            )
        })
        .unwrap_or(Decimal::ZERO);
    sheet.add("capacity_factor_vs_p50", capacity_factor, dec!(25));

    let resource = match input.resource_quality {
        ResourceQuality::Excellent => dec!(20),
        ResourceQuality::Good => dec!(16),
        ResourceQuality::Average => dec!(10),
        ResourceQuality::BelowAverage => dec!(5),
        ResourceQuality::Poor => Decimal::ZERO,
    };
    sheet.add("resource_quality", resource, dec!(20));

    let availability = at_least(
        input.availability,
        &[
            (dec!(0.98), dec!(15)),
            (dec!(0.95), dec!(12)),
            (dec!(0.90), dec!(7)),
            (Decimal::ZERO, dec!(2)),
        ],
    );
    sheet.add("availability", availability, dec!(15));

    let expected = benchmark.degradation_rate;
    let degradation = if input.degradation_rate <= expected {
        dec!(10)
    } else if input.degradation_rate <= expected * dec!(1.5) {
        dec!(6)
    } else {
        dec!(2)
    };
    sheet.add("degradation_vs_benchmark", degradation, dec!(10));

    sheet
}

// ---------------------------------------------------------------------------
// Financial
// ---------------------------------------------------------------------------

pub(crate) fn financial_factors(
    input: &ProjectInput,
    financials: &FinancialResult,
    hurdle_rate: Rate,
) -> FactorSheet {
    let benchmark = input.benchmark();
    let mut sheet = FactorSheet::default();

    let dscr = at_least(
        financials.min_dscr,
        &[
            (dec!(1.60), dec!(30)),
            (dec!(1.40), dec!(25)),
            (dec!(1.25), dec!(18)),
            (dec!(1.10), dec!(10)),
            (dec!(1.00), dec!(5)),
        ],
    );
    sheet.add("minimum_dscr", dscr, dec!(30));

    match financials.project_irr.rate() {
        Some(irr) => {
            let points = at_least(
                irr,
                &[
                    (hurdle_rate + dec!(0.07), dec!(20)),
                    (hurdle_rate + dec!(0.02), dec!(15)),
                    (hurdle_rate, dec!(10)),
                    (hurdle_rate - dec!(0.03), dec!(5)),
                ],
            );
            sheet.add("project_irr_vs_hurdle", points, dec!(20));
        }
        None => sheet.add("project_irr_vs_hurdle", Decimal::ZERO, Decimal::ZERO),
    }

    let npv = if financials.project_npv > Decimal::ZERO {
        dec!(15)
    } else if financials.project_npv > -(input.total_installed_cost * dec!(0.05)) {
        dec!(5)
    } else {
        Decimal::ZERO
    };
    sheet.add("project_npv", npv, dec!(15));

    let leverage = at_most(
        input.leverage_ratio,
        &[
            (benchmark.typical_leverage, dec!(15)),
            (benchmark.max_leverage, dec!(10)),
            (benchmark.max_leverage + dec!(0.10), dec!(4)),
        ],
    );
    sheet.add("leverage_vs_benchmark", leverage, dec!(15));

    let debt_yield = if financials.debt_amount > Decimal::ZERO {
        at_least(
            financials.debt_yield,
            &[
                (dec!(0.12), dec!(10)),
                (dec!(0.10), dec!(8)),
                (dec!(0.08), dec!(5)),
                (dec!(0.06), dec!(3)),
            ],
        )
    } else {
        dec!(10)
    };
    sheet.add("debt_yield", debt_yield, dec!(10));

    let multiple = at_least(
        financials.equity_multiple,
        &[
            (dec!(2.0), dec!(10)),
            (dec!(1.5), dec!(7)),
            (dec!(1.0), dec!(3)),
        ],
    );
    sheet.add("equity_multiple", multiple, dec!(10));

    sheet
}

// ---------------------------------------------------------------------------
// Credit
// ---------------------------------------------------------------------------

pub(crate) fn credit_factors(input: &ProjectInput, credit: &CreditRiskResult) -> FactorSheet {
    let mut sheet = FactorSheet::default();

    let counterparty = input
        .counterparty_rating
        .map(|r| counterparty_score(r) * dec!(0.35))
        .unwrap_or(Decimal::ZERO);
    sheet.add("counterparty_rating", counterparty, dec!(35));

    let offtake = match input.offtake_type {
        OfftakeType::PpaFixed => dec!(20),
        OfftakeType::RegulatedRate => dec!(19),
        OfftakeType::BundledRate => dec!(17),
        OfftakeType::PpaIndexed => dec!(16),
        OfftakeType::Tolling => dec!(15),
        OfftakeType::CapacityContract => dec!(14),
        OfftakeType::Merchant => dec!(4),
    };
    sheet.add("offtake_type", offtake, dec!(20));

    let coverage = Decimal::from(input.offtake_tenor_years) / Decimal::from(input.loan_tenor_years);
    let tenor = if input.offtake_type.is_contracted() {
        at_least(
            coverage,
            &[
                (dec!(1.0), dec!(15)),
                (dec!(0.75), dec!(10)),
                (dec!(0.5), dec!(5)),
            ],
        )
    } else {
        Decimal::ZERO
    };
    sheet.add("contract_tenor_coverage", tenor, dec!(15));

    let pd = at_most(
        credit.probability_of_default,
        &[
            (dec!(0.001), dec!(20)),
            (dec!(0.004), dec!(16)),
            (dec!(0.012), dec!(11)),
            (dec!(0.035), dec!(6)),
            (dec!(0.08), dec!(3)),
        ],
    );
    sheet.add("probability_of_default", pd, dec!(20));

    let grade = if credit.equivalent_rating.is_investment_grade() {
        dec!(10)
    } else if credit.equivalent_rating.is_crossover() {
        dec!(5)
    } else {
        Decimal::ZERO
    };
    sheet.add("equivalent_rating", grade, dec!(10));

    sheet
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

pub(crate) fn structure_factors(input: &ProjectInput) -> FactorSheet {
    let mut sheet = FactorSheet::default();

    let stage = match input.development_stage {
        DevelopmentStage::PreDevelopment => dec!(2),
        DevelopmentStage::EarlyDevelopment => dec!(7),
        DevelopmentStage::AdvancedDevelopment => dec!(14),
        DevelopmentStage::ConstructionReady => dec!(20),
        DevelopmentStage::UnderConstruction => dec!(22),
        DevelopmentStage::Operational => dec!(25),
    };
    sheet.add("development_stage", stage, dec!(25));

    let permitting = match input.permitting_status {
        PermittingStatus::FullyPermitted => dec!(20),
        PermittingStatus::MajorPermitsSecured => dec!(14),
        PermittingStatus::InProgress => dec!(7),
        PermittingStatus::NotStarted => Decimal::ZERO,
    };
    sheet.add("permitting", permitting, dec!(20));

    let interconnection = match input.interconnection_status {
        InterconnectionStatus::AgreementExecuted => dec!(20),
        InterconnectionStatus::FacilitiesStudy => dec!(13),
        InterconnectionStatus::ImpactStudy => dec!(8),
        InterconnectionStatus::Queued => dec!(4),
        InterconnectionStatus::NotStarted => Decimal::ZERO,
    };
    sheet.add("interconnection", interconnection, dec!(20));

    let epc = match input.epc_contract {
        EpcContractType::FixedPriceTurnkey => dec!(25),
        EpcContractType::FixedPriceEpc => dec!(21),
        EpcContractType::CostPlusGmp => dec!(13),
        EpcContractType::SelfBuild => dec!(8),
        EpcContractType::CostPlus => dec!(5),
    };
    sheet.add("epc_contract", epc, dec!(25));

    let construction = if input.construction_risk {
        dec!(3)
    } else {
        dec!(10)
    };
    sheet.add("construction_risk", construction, dec!(10));

    sheet
}

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

pub(crate) fn market_factors(input: &ProjectInput, financials: &FinancialResult) -> FactorSheet {
    let mut sheet = FactorSheet::default();
    let wholesale = input.wholesale_price_per_mwh;

    // Price has already been resolved by the pro forma.
    let price = input.energy_price().unwrap_or(wholesale);
    let price_points = match ratio(price, wholesale) {
        Some(r) => at_most(
            r,
            &[
                (dec!(1.0), dec!(30)),
                (dec!(1.15), dec!(22)),
                (dec!(1.30), dec!(12)),
                (Decimal::MAX, dec!(5)),
            ],
        ),
        None if price.is_zero() => dec!(30),
        None => dec!(5),
    };
    sheet.add("price_vs_wholesale", price_points, dec!(30));

    let regulatory = match input.regulatory_environment {
        RegulatoryEnvironment::Supportive => dec!(30),
        RegulatoryEnvironment::Stable => dec!(24),
        RegulatoryEnvironment::Uncertain => dec!(12),
        RegulatoryEnvironment::Adverse => dec!(3),
    };
    sheet.add("regulatory_environment", regulatory, dec!(30));

    let certainty = if input.offtake_type.is_contracted() {
        dec!(20)
    } else {
        dec!(6)
    };
    sheet.add("revenue_certainty", certainty, dec!(20));

    let lcoe_points = financials
        .lcoe
        .and_then(|lcoe| ratio(lcoe, wholesale))
        .map(|r| {
            at_most(
                r,
                &[
                    (dec!(0.85), dec!(20)),
                    (dec!(1.0), dec!(15)),
                    (dec!(1.15), dec!(8)),
                    (Decimal::MAX, dec!(2)),
                ],
            )
        })
        .unwrap_or(Decimal::ZERO);
    sheet.add("lcoe_vs_wholesale", lcoe_points, dec!(20));

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::credit::evaluate_credit_risk;
    use crate::financial::build_pro_forma;
    use crate::fixtures::{merchant_wind_project, solar_project};
    use crate::time_value::IrrSolution;
    use pretty_assertions::assert_eq;

    fn possible_total(sheet: &FactorSheet) -> Decimal {
        sheet.factors.values().map(|f| f.possible).sum()
    }

    #[test]
    fn test_each_dimension_totals_one_hundred() {
        let input = solar_project();
        let financials = build_pro_forma(&input, &ModelConfig::default()).unwrap();
        let credit = evaluate_credit_risk(&input, &financials).unwrap();

        assert_eq!(possible_total(&technology_factors(&input)), dec!(100));
        assert_eq!(
            possible_total(&financial_factors(&input, &financials, dec!(0.08))),
            dec!(100)
        );
        assert_eq!(possible_total(&credit_factors(&input, &credit)), dec!(100));
        assert_eq!(possible_total(&structure_factors(&input)), dec!(100));
        assert_eq!(possible_total(&market_factors(&input, &financials)), dec!(100));
    }

    #[test]
    fn test_uncomputed_irr_is_excluded() {
        let input = solar_project();
        let mut financials = build_pro_forma(&input, &ModelConfig::default()).unwrap();
        financials.project_irr = IrrSolution::NotComputed;

        let sheet = financial_factors(&input, &financials, dec!(0.08));
        assert_eq!(possible_total(&sheet), dec!(80));
        let irr = sheet.factors["project_irr_vs_hurdle"];
        assert_eq!(irr.possible, Decimal::ZERO);
        assert!(sheet.score() <= dec!(100));
    }

    #[test]
    fn test_solar_technology_points() {
        let sheet = technology_factors(&solar_project());
        // Mature, CF above P50, good resource, 98% availability, benchmark degradation
        assert_eq!(sheet.score(), dec!(96));
    }

    #[test]
    fn test_structure_for_ready_project() {
        let sheet = structure_factors(&solar_project());
        assert_eq!(sheet.score(), dec!(95));
    }

    #[test]
    fn test_weak_project_scores_low_on_structure() {
        let sheet = structure_factors(&merchant_wind_project());
        // 7 + 7 + 4 + 5 + 3
        assert_eq!(sheet.score(), dec!(26));
    }

    #[test]
    fn test_tier_helpers() {
        let tiers = [(dec!(1.5), dec!(10)), (dec!(1.0), dec!(5))];
        assert_eq!(at_least(dec!(1.5), &tiers), dec!(10));
        assert_eq!(at_least(dec!(1.2), &tiers), dec!(5));
        assert_eq!(at_least(dec!(0.9), &tiers), Decimal::ZERO);

        let ceilings = [(dec!(0.5), dec!(10)), (dec!(1.0), dec!(5))];
        assert_eq!(at_most(dec!(0.5), &ceilings), dec!(10));
        assert_eq!(at_most(dec!(1.1), &ceilings), Decimal::ZERO);
    }

    #[test]
    fn test_empty_sheet_scores_zero() {
        assert_eq!(FactorSheet::default().score(), Decimal::ZERO);
    }
}
