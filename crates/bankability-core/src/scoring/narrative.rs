use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::credit::{CreditRiskResult, MitigantStrength, RiskCategory, Severity};
use crate::financial::FinancialResult;
use crate::project::{
    EpcContractType, InterconnectionStatus, OfftakeType, PermittingStatus, ProjectInput,
};
use crate::scoring::dimensions::{Dimension, SubScore};
use crate::types::{Rate, Score};

pub(crate) fn commentary(
    dimension: Dimension,
    score: Score,
    financials: &FinancialResult,
    credit: &CreditRiskResult,
    hurdle_rate: Rate,
) -> String {
    match dimension {
        Dimension::Technology => technology_commentary(score).to_string(),
        Dimension::Financial => financial_commentary(financials, hurdle_rate),
        Dimension::Credit => credit_commentary(credit),
        Dimension::Structure => structure_commentary(score).to_string(),
        Dimension::Market => market_commentary(score).to_string(),
    }
}

fn technology_commentary(score: Score) -> &'static str {
    if score >= dec!(80) {
        "Technology profile is well suited to project finance. A mature technology with a strong performance record reduces execution risk."
    } else if score >= dec!(60) {
        "Technology assessment is adequate for financing consideration. Performance data or resource confirmation would improve lender confidence."
    } else if score >= dec!(40) {
        "Technology profile presents moderate risk. Lenders will expect additional performance evidence and independent engineering review."
    } else {
        "Technology readiness is below the threshold for conventional project finance."
    }
}

fn financial_commentary(financials: &FinancialResult, hurdle_rate: Rate) -> String {
    let mut parts = Vec::new();

    if financials.debt_amount.is_zero() {
        parts.push("Project is unlevered; no debt service coverage test applies.".to_string());
    } else if financials.min_dscr >= dec!(1.40) {
        parts.push(format!(
            "Debt service coverage of {:.2}x meets or exceeds typical lender requirements.",
            financials.min_dscr
        ));
    } else if financials.min_dscr >= dec!(1.20) {
        parts.push(format!(
            "Minimum DSCR of {:.2}x is acceptable but leaves limited cushion for downside scenarios.",
            financials.min_dscr
        ));
    } else {
        parts.push(format!(
            "Minimum DSCR of {:.2}x is below the 1.20x floor typically required for infrastructure debt.",
            financials.min_dscr
        ));
    }

    match financials.project_irr.rate() {
        Some(irr) if irr >= hurdle_rate + dec!(0.02) => parts.push(format!(
            "Project IRR of {} supports equity investment at current return expectations.",
            percent(irr)
        )),
        Some(irr) if irr >= hurdle_rate => parts.push(format!(
            "Project IRR of {} clears the hurdle rate with little margin.",
            percent(irr)
        )),
        Some(irr) => parts.push(format!(
            "Project IRR of {} is below the {} hurdle rate.",
            percent(irr),
            percent(hurdle_rate)
        )),
        None => parts.push("Project IRR could not be computed for this cash flow profile.".into()),
    }

    parts.join(" ")
}

fn credit_commentary(credit: &CreditRiskResult) -> String {
    let mut parts = vec![format!(
        "Credit profile maps to an equivalent {} rating with a {} risk classification.",
        credit.equivalent_rating,
        credit.risk_category.label().to_lowercase()
    )];

    let high: Vec<String> = credit
        .risk_factors
        .iter()
        .filter(|f| f.severity == Severity::High)
        .take(3)
        .map(|f| f.factor.to_lowercase())
        .collect();
    if !high.is_empty() {
        parts.push(format!("Key risk factors include {}.", high.join(", ")));
    }

    let strong: Vec<String> = credit
        .mitigants
        .iter()
        .filter(|m| m.strength == MitigantStrength::Strong)
        .take(3)
        .map(|m| m.mitigant.to_lowercase())
        .collect();
    if !strong.is_empty() {
        parts.push(format!("These are partially offset by {}.", strong.join(", ")));
    }

    parts.join(" ")
}

fn structure_commentary(score: Score) -> &'static str {
    if score >= dec!(75) {
        "Development is advanced with contractual risk allocation appropriate for project finance."
    } else if score >= dec!(55) {
        "Structural elements are broadly adequate but permitting, interconnection or EPC terms need further progress."
    } else if score >= dec!(35) {
        "Project structure has notable gaps that would need to be closed during financing negotiations."
    } else {
        "Project requires substantial development before it is ready for lender due diligence."
    }
}

fn market_commentary(score: Score) -> &'static str {
    if score >= dec!(75) {
        "Market conditions are favorable, with competitive pricing and a supportive regulatory environment."
    } else if score >= dec!(55) {
        "Market environment is adequate for project viability."
    } else if score >= dec!(35) {
        "Market conditions present material risk to realised prices or regulatory support."
    } else {
        "Market fundamentals are weak. Substantial de-risking is needed before lenders will consider the project."
    }
}

pub(crate) fn strengths(
    input: &ProjectInput,
    sub_scores: &[SubScore],
    financials: &FinancialResult,
    hurdle_rate: Rate,
) -> Vec<String> {
    let mut strengths: Vec<String> = sub_scores
        .iter()
        .filter(|s| s.score >= dec!(75))
        .map(|s| {
            format!(
                "Strong {} profile (score: {:.0}/100).",
                s.dimension.label().to_lowercase(),
                s.score
            )
        })
        .collect();

    if financials.debt_amount > Decimal::ZERO && financials.min_dscr >= dec!(1.40) {
        strengths.push(format!(
            "Debt coverage of {:.2}x exceeds typical lender minimums.",
            financials.min_dscr
        ));
    }
    if let Some(irr) = financials.project_irr.rate() {
        if irr >= hurdle_rate + dec!(0.02) {
            strengths.push(format!(
                "Project returns ({} IRR) support equity investment.",
                percent(irr)
            ));
        }
    }
    if input.permitting_status == PermittingStatus::FullyPermitted
        && input.interconnection_status == InterconnectionStatus::AgreementExecuted
    {
        strengths.push("Permits and an executed interconnection agreement are in place.".into());
    }
    if matches!(
        input.offtake_type,
        OfftakeType::PpaFixed | OfftakeType::RegulatedRate
    ) {
        strengths.push("Contracted revenue provides cash flow predictability.".into());
    }

    strengths
}

pub(crate) fn weaknesses(
    sub_scores: &[SubScore],
    financials: &FinancialResult,
    credit: &CreditRiskResult,
    hurdle_rate: Rate,
) -> Vec<String> {
    let mut weaknesses: Vec<String> = sub_scores
        .iter()
        .filter(|s| s.score < dec!(50))
        .map(|s| {
            format!(
                "Weak {} profile (score: {:.0}/100) requires attention.",
                s.dimension.label().to_lowercase(),
                s.score
            )
        })
        .collect();

    if financials.min_dscr < dec!(1.20) {
        weaknesses.push(format!(
            "DSCR of {:.2}x is below the 1.20x minimum for most lenders.",
            financials.min_dscr
        ));
    }
    match financials.project_irr.rate() {
        Some(irr) if irr < hurdle_rate => weaknesses.push(format!(
            "Project IRR of {} may not attract equity capital.",
            percent(irr)
        )),
        None => weaknesses.push("Project cash flows do not produce a computable IRR.".into()),
        _ => {}
    }
    if credit.risk_category >= RiskCategory::High {
        weaknesses.push(format!(
            "Credit risk category of '{}' limits access to low-cost financing.",
            credit.risk_category.label()
        ));
    }

    weaknesses
}

pub(crate) fn recommendations(
    input: &ProjectInput,
    financials: &FinancialResult,
    credit: &CreditRiskResult,
) -> Vec<String> {
    let mut recs = Vec::new();

    if financials.debt_amount > Decimal::ZERO && financials.min_dscr < dec!(1.40) {
        recs.push("Consider restructuring the capital stack to improve DSCR, for example by increasing the equity contribution, extending debt tenor or reducing operating costs.".to_string());
    }
    if input.protections.dsra_months == 0 {
        recs.push("Fund a debt service reserve account (minimum 6 months of debt service) to satisfy standard lender requirements.".into());
    }
    if input.permitting_status != PermittingStatus::FullyPermitted {
        recs.push("Secure all required permits before approaching lenders to remove permitting risk from the financing discussion.".into());
    }
    if matches!(
        input.interconnection_status,
        InterconnectionStatus::Queued | InterconnectionStatus::NotStarted
    ) {
        recs.push("Advance interconnection studies and secure an interconnection agreement to de-risk the grid connection timeline.".into());
    }
    if input.offtake_type == OfftakeType::Merchant {
        recs.push("Secure a long-term offtake agreement (PPA or tolling) to provide the contracted revenue certainty project finance requires.".into());
    } else if input.offtake_tenor_years < input.loan_tenor_years {
        recs.push("Extend the offtake contract to cover the full debt tenor or shorten the loan to match it.".into());
    }
    if credit.probability_of_default > dec!(0.01) {
        recs.push("Explore credit enhancement such as letters of credit, guarantees or credit wraps to improve the credit profile.".into());
    }
    if input.epc_contract != EpcContractType::FixedPriceTurnkey {
        recs.push("Negotiate a fixed-price turnkey EPC contract to transfer construction cost and schedule risk to an experienced contractor.".into());
    }
    if input.leverage_ratio > input.benchmark().typical_leverage {
        recs.push(format!(
            "Reduce leverage toward the {:.0}% typical for {} projects.",
            input.benchmark().typical_leverage * dec!(100),
            input.technology.label()
        ));
    }

    recs
}

fn percent(rate: Rate) -> String {
    format!("{:.1}%", rate * dec!(100))
}
