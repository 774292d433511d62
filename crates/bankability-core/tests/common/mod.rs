#![allow(dead_code)]

use bankability_core::project::ProjectInput;
use serde_json::json;

/// 100 MW solar with a 20-year fixed PPA to an A-rated utility, loaded the
/// way a caller would submit it: only required fields plus the price.
pub fn utility_solar() -> ProjectInput {
    serde_json::from_value(json!({
        "project_name": "Mesa Verde Solar",
        "technology": "solar_pv",
        "capacity_mw": "100",
        "capacity_factor": "0.25",
        "degradation_rate": "0.005",
        "availability": "0.98",
        "total_installed_cost": "105000000",
        "leverage_ratio": "0.70",
        "interest_rate": "0.05",
        "loan_tenor_years": 20,
        "contracted_price_per_mwh": "45",
        "wholesale_price_per_mwh": "48",
        "offtake_type": "ppa_fixed",
        "offtake_tenor_years": 20,
        "counterparty_rating": "A",
        "borrower_entity": "investor_owned_utility",
        "development_stage": "construction_ready",
        "permitting_status": "fully_permitted",
        "interconnection_status": "agreement_executed",
        "epc_contract": "fixed_price_turnkey",
        "resource_quality": "good",
        "regulatory_environment": "stable"
    }))
    .expect("fixture deserializes")
}

/// 150 MW merchant wind, early stage, sub-investment-grade sponsor.
pub fn merchant_wind() -> ProjectInput {
    serde_json::from_value(json!({
        "project_name": "High Plains Wind",
        "technology": "onshore_wind",
        "capacity_mw": "150",
        "capacity_factor": "0.28",
        "degradation_rate": "0.006",
        "availability": "0.94",
        "total_installed_cost": "255000000",
        "leverage_ratio": "0.82",
        "interest_rate": "0.075",
        "loan_tenor_years": 15,
        "merchant_price_per_mwh": "38",
        "wholesale_price_per_mwh": "36",
        "offtake_type": "merchant",
        "offtake_tenor_years": 0,
        "counterparty_rating": "BB",
        "borrower_entity": "independent_power_producer",
        "construction_risk": true,
        "development_stage": "early_development",
        "permitting_status": "in_progress",
        "interconnection_status": "queued",
        "epc_contract": "cost_plus",
        "resource_quality": "below_average",
        "regulatory_environment": "uncertain"
    }))
    .expect("fixture deserializes")
}
