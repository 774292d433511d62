use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::benchmarks::{benchmark_for, TechnologyBenchmark};
use crate::error::AssessmentError;
use crate::types::{Money, Rate};
use crate::AssessmentResult;

/// Hours in a non-leap year, used to convert capacity to energy.
pub const HOURS_PER_YEAR: u32 = 8760;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnologyType {
    SolarPv,
    Csp,
    OnshoreWind,
    OffshoreWind,
    BatteryStorage,
    GasCombinedCycle,
    GasCombustionTurbine,
    Nuclear,
    Smr,
    Hydro,
    Geothermal,
    Biomass,
    CoalIgcc,
    Transmission,
}

impl TechnologyType {
    pub const ALL: [TechnologyType; 14] = [
        TechnologyType::SolarPv,
        TechnologyType::Csp,
        TechnologyType::OnshoreWind,
        TechnologyType::OffshoreWind,
        TechnologyType::BatteryStorage,
        TechnologyType::GasCombinedCycle,
        TechnologyType::GasCombustionTurbine,
        TechnologyType::Nuclear,
        TechnologyType::Smr,
        TechnologyType::Hydro,
        TechnologyType::Geothermal,
        TechnologyType::Biomass,
        TechnologyType::CoalIgcc,
        TechnologyType::Transmission,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TechnologyType::SolarPv => "Solar PV",
            TechnologyType::Csp => "Concentrating Solar Power",
            TechnologyType::OnshoreWind => "Onshore Wind",
            TechnologyType::OffshoreWind => "Offshore Wind",
            TechnologyType::BatteryStorage => "Battery Storage",
            TechnologyType::GasCombinedCycle => "Gas Combined Cycle",
            TechnologyType::GasCombustionTurbine => "Gas Combustion Turbine",
            TechnologyType::Nuclear => "Nuclear",
            TechnologyType::Smr => "Small Modular Reactor",
            TechnologyType::Hydro => "Hydro",
            TechnologyType::Geothermal => "Geothermal",
            TechnologyType::Biomass => "Biomass",
            TechnologyType::CoalIgcc => "Coal IGCC",
            TechnologyType::Transmission => "Transmission",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfftakeType {
    PpaFixed,
    PpaIndexed,
    RegulatedRate,
    Tolling,
    CapacityContract,
    BundledRate,
    Merchant,
}

impl OfftakeType {
    /// Whether revenue is priced by contract rather than by the market.
    pub fn is_contracted(self) -> bool {
        !matches!(self, OfftakeType::Merchant)
    }

    pub fn label(self) -> &'static str {
        match self {
            OfftakeType::PpaFixed => "fixed-price PPA",
            OfftakeType::PpaIndexed => "indexed PPA",
            OfftakeType::RegulatedRate => "regulated rate",
            OfftakeType::Tolling => "tolling agreement",
            OfftakeType::CapacityContract => "capacity contract",
            OfftakeType::BundledRate => "bundled rate",
            OfftakeType::Merchant => "merchant",
        }
    }
}

/// Long-term credit rating on the S&P-style scale, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CreditRating {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA+")]
    AaPlus,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AA-")]
    AaMinus,
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "BBB+")]
    BbbPlus,
    #[serde(rename = "BBB")]
    Bbb,
    #[serde(rename = "BBB-")]
    BbbMinus,
    #[serde(rename = "BB+")]
    BbPlus,
    #[serde(rename = "BB")]
    Bb,
    #[serde(rename = "BB-")]
    BbMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "CCC")]
    Ccc,
    #[serde(rename = "CC")]
    Cc,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
}

impl CreditRating {
    pub const ALL: [CreditRating; 20] = [
        CreditRating::Aaa,
        CreditRating::AaPlus,
        CreditRating::Aa,
        CreditRating::AaMinus,
        CreditRating::APlus,
        CreditRating::A,
        CreditRating::AMinus,
        CreditRating::BbbPlus,
        CreditRating::Bbb,
        CreditRating::BbbMinus,
        CreditRating::BbPlus,
        CreditRating::Bb,
        CreditRating::BbMinus,
        CreditRating::BPlus,
        CreditRating::B,
        CreditRating::BMinus,
        CreditRating::Ccc,
        CreditRating::Cc,
        CreditRating::C,
        CreditRating::D,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CreditRating::Aaa => "AAA",
            CreditRating::AaPlus => "AA+",
            CreditRating::Aa => "AA",
            CreditRating::AaMinus => "AA-",
            CreditRating::APlus => "A+",
            CreditRating::A => "A",
            CreditRating::AMinus => "A-",
            CreditRating::BbbPlus => "BBB+",
            CreditRating::Bbb => "BBB",
            CreditRating::BbbMinus => "BBB-",
            CreditRating::BbPlus => "BB+",
            CreditRating::Bb => "BB",
            CreditRating::BbMinus => "BB-",
            CreditRating::BPlus => "B+",
            CreditRating::B => "B",
            CreditRating::BMinus => "B-",
            CreditRating::Ccc => "CCC",
            CreditRating::Cc => "CC",
            CreditRating::C => "C",
            CreditRating::D => "D",
        }
    }

    /// One notch worse; D stays D.
    pub fn notch_down(self) -> CreditRating {
        let position = self as usize;
        CreditRating::ALL[(position + 1).min(CreditRating::ALL.len() - 1)]
    }

    pub fn is_investment_grade(self) -> bool {
        self <= CreditRating::BbbMinus
    }

    /// BB+ through BB-, the notches just below investment grade.
    pub fn is_crossover(self) -> bool {
        self >= CreditRating::BbPlus && self <= CreditRating::BbMinus
    }
}

impl std::fmt::Display for CreditRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CreditRating::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown credit rating '{s}'"))
    }
}

/// Offtaker credit standing: an agency-style rating, or explicitly unrated
/// (common for cooperatives and smaller municipal utilities). Serialised as
/// the rating string or `"unrated"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CounterpartyRating {
    Rated(CreditRating),
    Unrated,
}

impl CounterpartyRating {
    pub fn rating(self) -> Option<CreditRating> {
        match self {
            CounterpartyRating::Rated(r) => Some(r),
            CounterpartyRating::Unrated => None,
        }
    }

    pub fn is_investment_grade(self) -> bool {
        self.rating().is_some_and(CreditRating::is_investment_grade)
    }
}

impl From<CreditRating> for CounterpartyRating {
    fn from(rating: CreditRating) -> Self {
        CounterpartyRating::Rated(rating)
    }
}

impl std::fmt::Display for CounterpartyRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterpartyRating::Rated(r) => f.write_str(r.as_str()),
            CounterpartyRating::Unrated => f.write_str("unrated"),
        }
    }
}

impl TryFrom<String> for CounterpartyRating {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case("unrated") {
            return Ok(CounterpartyRating::Unrated);
        }
        value.parse().map(CounterpartyRating::Rated)
    }
}

impl From<CounterpartyRating> for String {
    fn from(rating: CounterpartyRating) -> Self {
        rating.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    InvestorOwnedUtility,
    MunicipalUtility,
    Cooperative,
    IndependentPowerProducer,
    CommunityChoiceAggregator,
    TribalUtility,
    StateAuthority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentStage {
    PreDevelopment,
    EarlyDevelopment,
    AdvancedDevelopment,
    ConstructionReady,
    UnderConstruction,
    Operational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermittingStatus {
    FullyPermitted,
    MajorPermitsSecured,
    InProgress,
    NotStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterconnectionStatus {
    AgreementExecuted,
    FacilitiesStudy,
    ImpactStudy,
    Queued,
    NotStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpcContractType {
    FixedPriceTurnkey,
    FixedPriceEpc,
    CostPlusGmp,
    CostPlus,
    SelfBuild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceQuality {
    Excellent,
    Good,
    Average,
    BelowAverage,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegulatoryEnvironment {
    Supportive,
    Stable,
    Uncertain,
    Adverse,
}

/// Federal tax credit elected for the project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaxCredit {
    #[default]
    None,
    /// Investment tax credit as a share of installed cost
    Itc { rate: Rate },
    /// Production tax credit per MWh generated
    Ptc { per_mwh: Money },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceCoverage {
    #[default]
    None,
    Basic,
    Standard,
    Comprehensive,
}

/// Lender protections that reduce loss severity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralProtections {
    pub completion_guarantee: bool,
    /// Months of debt service held in the reserve account
    pub dsra_months: u32,
    /// Parent guarantee, letter of credit or similar
    pub credit_support: bool,
    pub step_in_rights: bool,
    pub insurance: InsuranceCoverage,
}

// ---------------------------------------------------------------------------
// Project description
// ---------------------------------------------------------------------------

fn default_class_life() -> u32 {
    5
}

fn default_counterparty_count() -> u32 {
    1
}

/// Everything the engine needs to assess one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInput {
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Target commercial operation date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod_target: Option<NaiveDate>,

    pub technology: TechnologyType,
    /// Nameplate capacity in MW
    pub capacity_mw: Decimal,
    /// Net capacity factor (decimal)
    pub capacity_factor: Rate,
    /// Annual output degradation (decimal)
    pub degradation_rate: Rate,
    /// Share of hours the plant is available to run
    pub availability: Rate,

    /// All-in installed cost
    pub total_installed_cost: Money,
    /// Debt share of installed cost
    pub leverage_ratio: Rate,
    pub interest_rate: Rate,
    pub loan_tenor_years: u32,
    #[serde(default)]
    pub tax_credit: TaxCredit,
    /// MACRS recovery class (5 or 7)
    #[serde(default = "default_class_life")]
    pub depreciation_class_life: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contracted_price_per_mwh: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_price_per_mwh: Option<Money>,
    /// Prevailing wholesale power price in the project's market
    pub wholesale_price_per_mwh: Money,

    pub offtake_type: OfftakeType,
    #[serde(default)]
    pub offtake_tenor_years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_rating: Option<CounterpartyRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower_entity: Option<EntityType>,
    /// Share of revenue from the largest counterparty; not assessed when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_concentration: Option<Rate>,
    /// Number of revenue counterparties
    #[serde(default = "default_counterparty_count")]
    pub counterparty_count: u32,

    /// Project has not yet reached commercial operation
    #[serde(default)]
    pub construction_risk: bool,
    pub development_stage: DevelopmentStage,
    pub permitting_status: PermittingStatus,
    pub interconnection_status: InterconnectionStatus,
    pub epc_contract: EpcContractType,
    pub resource_quality: ResourceQuality,
    pub regulatory_environment: RegulatoryEnvironment,

    /// Fixed O&M override, $/kW-yr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_om_per_kw_year: Option<Money>,
    /// Variable O&M override, $/MWh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_om_per_mwh: Option<Money>,

    #[serde(default)]
    pub protections: StructuralProtections,
}

impl ProjectInput {
    /// Check the field invariants every model relies on.
    pub fn validate(&self) -> AssessmentResult<()> {
        if self.capacity_mw <= Decimal::ZERO {
            return Err(AssessmentError::invalid(
                "capacity_mw",
                "Capacity must be positive",
            ));
        }
        check_unit_interval("capacity_factor", self.capacity_factor)?;
        check_unit_interval("availability", self.availability)?;
        check_unit_interval("leverage_ratio", self.leverage_ratio)?;
        if self.degradation_rate < Decimal::ZERO || self.degradation_rate >= Decimal::ONE {
            return Err(AssessmentError::invalid(
                "degradation_rate",
                "Degradation must be in [0, 1)",
            ));
        }
        if let Some(share) = self.revenue_concentration {
            check_unit_interval("revenue_concentration", share)?;
        }
        if self.counterparty_count == 0 {
            return Err(AssessmentError::invalid(
                "counterparty_count",
                "At least one revenue counterparty is required",
            ));
        }
        if self.loan_tenor_years == 0 {
            return Err(AssessmentError::invalid(
                "loan_tenor_years",
                "Loan tenor must be at least one year",
            ));
        }
        if self.total_installed_cost <= Decimal::ZERO {
            return Err(AssessmentError::invalid(
                "total_installed_cost",
                "Total installed cost must be positive",
            ));
        }
        if self.interest_rate < Decimal::ZERO {
            return Err(AssessmentError::invalid(
                "interest_rate",
                "Interest rate cannot be negative",
            ));
        }

        let prices = [
            ("contracted_price_per_mwh", self.contracted_price_per_mwh),
            ("merchant_price_per_mwh", self.merchant_price_per_mwh),
            ("wholesale_price_per_mwh", Some(self.wholesale_price_per_mwh)),
            ("fixed_om_per_kw_year", self.fixed_om_per_kw_year),
            ("variable_om_per_mwh", self.variable_om_per_mwh),
        ];
        for (field, value) in prices {
            if matches!(value, Some(v) if v < Decimal::ZERO) {
                return Err(AssessmentError::invalid(field, "Price cannot be negative"));
            }
        }

        match &self.tax_credit {
            TaxCredit::Itc { rate } if *rate < Decimal::ZERO || *rate > Decimal::ONE => {
                return Err(AssessmentError::invalid(
                    "tax_credit.rate",
                    "ITC rate must be in [0, 1]",
                ));
            }
            TaxCredit::Ptc { per_mwh } if *per_mwh < Decimal::ZERO => {
                return Err(AssessmentError::invalid(
                    "tax_credit.per_mwh",
                    "PTC cannot be negative",
                ));
            }
            _ => {}
        }

        Ok(())
    }

    pub fn benchmark(&self) -> &'static TechnologyBenchmark {
        benchmark_for(self.technology)
    }

    pub fn capacity_kw(&self) -> Decimal {
        self.capacity_mw * Decimal::from(1000)
    }

    pub fn debt_amount(&self) -> Money {
        self.total_installed_cost * self.leverage_ratio
    }

    pub fn equity_amount(&self) -> Money {
        self.total_installed_cost - self.debt_amount()
    }

    /// Year-1 realised price: the contract price for contracted offtake,
    /// otherwise the merchant assumption or the wholesale price.
    pub fn energy_price(&self) -> AssessmentResult<Money> {
        if self.offtake_type.is_contracted() {
            self.contracted_price_per_mwh
                .ok_or_else(|| AssessmentError::missing("contracted_price_per_mwh"))
        } else {
            Ok(self
                .merchant_price_per_mwh
                .unwrap_or(self.wholesale_price_per_mwh))
        }
    }

    pub fn fixed_om(&self) -> Money {
        self.fixed_om_per_kw_year
            .unwrap_or(self.benchmark().fixed_om_per_kw_year.mid)
    }

    pub fn variable_om(&self) -> Money {
        self.variable_om_per_mwh
            .unwrap_or(self.benchmark().variable_om_per_mwh)
    }

    /// Undegraded first-year generation in MWh.
    pub fn first_year_energy_mwh(&self) -> Decimal {
        self.capacity_mw
            * Decimal::from(HOURS_PER_YEAR)
            * self.capacity_factor
            * self.availability
    }
}

fn check_unit_interval(field: &str, value: Rate) -> AssessmentResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(AssessmentError::invalid(field, "Must be between 0 and 1"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::solar_project;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_input_passes() {
        assert!(solar_project().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut input = solar_project();
        input.capacity_mw = Decimal::ZERO;
        match input.validate() {
            Err(AssessmentError::InvalidInput { field, .. }) => assert_eq!(field, "capacity_mw"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_leverage_above_one_rejected() {
        let mut input = solar_project();
        input.leverage_ratio = dec!(1.05);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_negative_wholesale_price_rejected() {
        let mut input = solar_project();
        input.wholesale_price_per_mwh = dec!(-1);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_contracted_price_required() {
        let mut input = solar_project();
        input.contracted_price_per_mwh = None;
        match input.energy_price() {
            Err(AssessmentError::MissingInput { field }) => {
                assert_eq!(field, "contracted_price_per_mwh")
            }
            other => panic!("Expected MissingInput, got {other:?}"),
        }
    }

    #[test]
    fn test_merchant_price_falls_back_to_wholesale() {
        let mut input = solar_project();
        input.offtake_type = OfftakeType::Merchant;
        input.contracted_price_per_mwh = None;
        assert_eq!(input.energy_price().unwrap(), dec!(48));
        input.merchant_price_per_mwh = Some(dec!(52));
        assert_eq!(input.energy_price().unwrap(), dec!(52));
    }

    #[test]
    fn test_om_defaults_to_benchmark_midpoint() {
        let input = solar_project();
        assert_eq!(input.fixed_om(), input.benchmark().fixed_om_per_kw_year.mid);
    }

    #[test]
    fn test_rating_order_and_notching() {
        assert!(CreditRating::Aaa < CreditRating::BbbMinus);
        assert_eq!(CreditRating::Bbb.notch_down(), CreditRating::BbbMinus);
        assert_eq!(CreditRating::D.notch_down(), CreditRating::D);
        assert!(CreditRating::BbbMinus.is_investment_grade());
        assert!(!CreditRating::BbPlus.is_investment_grade());
        assert!(CreditRating::BbMinus.is_crossover());
    }

    #[test]
    fn test_rating_serde_names() {
        let json = serde_json::to_string(&CreditRating::AaMinus).unwrap();
        assert_eq!(json, "\"AA-\"");
        let parsed: CreditRating = serde_json::from_str("\"BBB+\"").unwrap();
        assert_eq!(parsed, CreditRating::BbbPlus);
    }

    #[test]
    fn test_optional_fields_default_on_deserialize() {
        let json = r#"{
            "project_name": "Ridge Wind",
            "technology": "onshore_wind",
            "capacity_mw": "150",
            "capacity_factor": "0.36",
            "degradation_rate": "0.004",
            "availability": "0.97",
            "total_installed_cost": "210000000",
            "leverage_ratio": "0.65",
            "interest_rate": "0.055",
            "loan_tenor_years": 18,
            "wholesale_price_per_mwh": "40",
            "offtake_type": "merchant",
            "development_stage": "advanced_development",
            "permitting_status": "in_progress",
            "interconnection_status": "facilities_study",
            "epc_contract": "fixed_price_epc",
            "resource_quality": "excellent",
            "regulatory_environment": "supportive"
        }"#;
        let input: ProjectInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.depreciation_class_life, 5);
        assert_eq!(input.tax_credit, TaxCredit::None);
        assert!(input.counterparty_rating.is_none());
        assert_eq!(input.protections, StructuralProtections::default());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_unrated_counterparty_round_trips() {
        let parsed: CounterpartyRating = serde_json::from_str("\"unrated\"").unwrap();
        assert_eq!(parsed, CounterpartyRating::Unrated);
        assert!(!parsed.is_investment_grade());
        let rated: CounterpartyRating = serde_json::from_str("\"BBB-\"").unwrap();
        assert_eq!(rated, CounterpartyRating::Rated(CreditRating::BbbMinus));
        assert_eq!(serde_json::to_string(&rated).unwrap(), "\"BBB-\"");
        assert!(serde_json::from_str::<CounterpartyRating>("\"Z\"").is_err());
    }

    #[test]
    fn test_revenue_concentration_bounded() {
        let mut input = solar_project();
        input.revenue_concentration = Some(dec!(1.2));
        assert!(matches!(
            input.validate(),
            Err(AssessmentError::InvalidInput { .. })
        ));
        input.revenue_concentration = Some(dec!(0.85));
        input.counterparty_count = 0;
        assert!(input.validate().is_err());
    }
}
