//! Default probability, loss severity and rating equivalence for project debt.

pub mod rating;
pub mod risk;

pub use rating::{
    base_pd, counterparty_base_pd, counterparty_score, credit_spread_bps, rating_for_pd,
    rating_score, RiskCategory, UNRATED_BASE_PD,
};
pub use risk::{
    assess_credit_risk, evaluate_credit_risk, CreditRiskResult, Mitigant, MitigantStrength,
    PdAdjustments, RiskFactor, Severity,
};
