//! Project descriptions shared by the unit tests.

use rust_decimal_macros::dec;

use crate::project::*;

/// 100 MW contracted solar project with an A-rated utility offtaker.
pub(crate) fn solar_project() -> ProjectInput {
    ProjectInput {
        project_name: "Mesa Verde Solar".into(),
        project_id: Some("MVS-001".into()),
        location: Some("Pima County, AZ".into()),
        cod_target: None,
        technology: TechnologyType::SolarPv,
        capacity_mw: dec!(100),
        capacity_factor: dec!(0.25),
        degradation_rate: dec!(0.005),
        availability: dec!(0.98),
        total_installed_cost: dec!(105_000_000),
        leverage_ratio: dec!(0.70),
        interest_rate: dec!(0.05),
        loan_tenor_years: 20,
        tax_credit: TaxCredit::None,
        depreciation_class_life: 5,
        contracted_price_per_mwh: Some(dec!(45)),
        merchant_price_per_mwh: None,
        wholesale_price_per_mwh: dec!(48),
        offtake_type: OfftakeType::PpaFixed,
        offtake_tenor_years: 20,
        counterparty_rating: Some(CreditRating::A.into()),
        borrower_entity: Some(EntityType::InvestorOwnedUtility),
        revenue_concentration: None,
        counterparty_count: 1,
        construction_risk: false,
        development_stage: DevelopmentStage::ConstructionReady,
        permitting_status: PermittingStatus::FullyPermitted,
        interconnection_status: InterconnectionStatus::AgreementExecuted,
        epc_contract: EpcContractType::FixedPriceTurnkey,
        resource_quality: ResourceQuality::Good,
        regulatory_environment: RegulatoryEnvironment::Stable,
        fixed_om_per_kw_year: None,
        variable_om_per_mwh: None,
        protections: StructuralProtections::default(),
    }
}

/// Early-stage merchant wind project with weak structure.
pub(crate) fn merchant_wind_project() -> ProjectInput {
    ProjectInput {
        project_name: "High Plains Wind".into(),
        technology: TechnologyType::OnshoreWind,
        capacity_mw: dec!(150),
        capacity_factor: dec!(0.28),
        degradation_rate: dec!(0.006),
        availability: dec!(0.94),
        total_installed_cost: dec!(255_000_000),
        leverage_ratio: dec!(0.82),
        interest_rate: dec!(0.075),
        loan_tenor_years: 15,
        contracted_price_per_mwh: None,
        merchant_price_per_mwh: Some(dec!(38)),
        wholesale_price_per_mwh: dec!(36),
        offtake_type: OfftakeType::Merchant,
        offtake_tenor_years: 0,
        counterparty_rating: Some(CreditRating::Bb.into()),
        borrower_entity: Some(EntityType::IndependentPowerProducer),
        construction_risk: true,
        development_stage: DevelopmentStage::EarlyDevelopment,
        permitting_status: PermittingStatus::InProgress,
        interconnection_status: InterconnectionStatus::Queued,
        epc_contract: EpcContractType::CostPlus,
        resource_quality: ResourceQuality::BelowAverage,
        regulatory_environment: RegulatoryEnvironment::Uncertain,
        ..solar_project()
    }
}
