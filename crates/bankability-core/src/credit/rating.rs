//! Rating-scale lookup tables.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::project::{CounterpartyRating, CreditRating};
use crate::types::{Rate, Score};

/// Base PD assumed for an offtaker with no public rating.
pub const UNRATED_BASE_PD: Rate = dec!(0.05);
/// Counterparty score for an unrated offtaker, roughly a B+ credit.
const UNRATED_SCORE: Score = dec!(30);

/// Upper PD bound of each equivalent rating, best first. Anything above the
/// last bound maps to C.
const PD_RATING_BANDS: [(Rate, CreditRating); 18] = [
    (dec!(0.0002), CreditRating::Aaa),
    (dec!(0.0004), CreditRating::AaPlus),
    (dec!(0.0006), CreditRating::Aa),
    (dec!(0.0010), CreditRating::AaMinus),
    (dec!(0.0015), CreditRating::APlus),
    (dec!(0.0025), CreditRating::A),
    (dec!(0.0040), CreditRating::AMinus),
    (dec!(0.0060), CreditRating::BbbPlus),
    (dec!(0.0080), CreditRating::Bbb),
    (dec!(0.0120), CreditRating::BbbMinus),
    (dec!(0.0200), CreditRating::BbPlus),
    (dec!(0.0350), CreditRating::Bb),
    (dec!(0.0550), CreditRating::BbMinus),
    (dec!(0.0800), CreditRating::BPlus),
    (dec!(0.1200), CreditRating::B),
    (dec!(0.2000), CreditRating::BMinus),
    (dec!(0.3500), CreditRating::Ccc),
    (dec!(0.5000), CreditRating::Cc),
];

/// One-year base probability of default by counterparty rating.
pub fn base_pd(rating: CreditRating) -> Rate {
    match rating {
        CreditRating::Aaa => dec!(0.0001),
        CreditRating::AaPlus => dec!(0.0002),
        CreditRating::Aa => dec!(0.0003),
        CreditRating::AaMinus => dec!(0.0005),
        CreditRating::APlus => dec!(0.0008),
        CreditRating::A => dec!(0.0010),
        CreditRating::AMinus => dec!(0.0015),
        CreditRating::BbbPlus => dec!(0.0025),
        CreditRating::Bbb => dec!(0.0040),
        CreditRating::BbbMinus => dec!(0.0070),
        CreditRating::BbPlus => dec!(0.0120),
        CreditRating::Bb => dec!(0.0200),
        CreditRating::BbMinus => dec!(0.0350),
        CreditRating::BPlus => dec!(0.0550),
        CreditRating::B => dec!(0.0800),
        CreditRating::BMinus => dec!(0.1200),
        CreditRating::Ccc => dec!(0.20),
        CreditRating::Cc => dec!(0.35),
        CreditRating::C => dec!(0.50),
        CreditRating::D => Decimal::ONE,
    }
}

pub fn counterparty_base_pd(counterparty: CounterpartyRating) -> Rate {
    match counterparty {
        CounterpartyRating::Rated(rating) => base_pd(rating),
        CounterpartyRating::Unrated => UNRATED_BASE_PD,
    }
}

pub fn rating_for_pd(pd: Rate) -> CreditRating {
    PD_RATING_BANDS
        .iter()
        .find(|(bound, _)| pd <= *bound)
        .map(|(_, rating)| *rating)
        .unwrap_or(CreditRating::C)
}

/// Indicative senior secured spread over the base rate. Defaulted debt has
/// no meaningful spread.
pub fn credit_spread_bps(rating: CreditRating) -> Option<u32> {
    let bps = match rating {
        CreditRating::Aaa => 20,
        CreditRating::AaPlus => 35,
        CreditRating::Aa => 50,
        CreditRating::AaMinus => 65,
        CreditRating::APlus => 80,
        CreditRating::A => 100,
        CreditRating::AMinus => 120,
        CreditRating::BbbPlus => 150,
        CreditRating::Bbb => 180,
        CreditRating::BbbMinus => 220,
        CreditRating::BbPlus => 300,
        CreditRating::Bb => 400,
        CreditRating::BbMinus => 500,
        CreditRating::BPlus => 600,
        CreditRating::B => 750,
        CreditRating::BMinus => 900,
        CreditRating::Ccc => 1200,
        CreditRating::Cc => 1500,
        CreditRating::C => 2000,
        CreditRating::D => return None,
    };
    Some(bps)
}

/// Counterparty quality on a 0-100 scale.
pub fn rating_score(rating: CreditRating) -> Score {
    match rating {
        CreditRating::Aaa => dec!(100),
        CreditRating::AaPlus => dec!(95),
        CreditRating::Aa => dec!(90),
        CreditRating::AaMinus => dec!(85),
        CreditRating::APlus => dec!(80),
        CreditRating::A => dec!(75),
        CreditRating::AMinus => dec!(70),
        CreditRating::BbbPlus => dec!(65),
        CreditRating::Bbb => dec!(60),
        CreditRating::BbbMinus => dec!(55),
        CreditRating::BbPlus => dec!(45),
        CreditRating::Bb => dec!(40),
        CreditRating::BbMinus => dec!(35),
        CreditRating::BPlus => dec!(30),
        CreditRating::B => dec!(25),
        CreditRating::BMinus => dec!(20),
        CreditRating::Ccc => dec!(10),
        CreditRating::Cc => dec!(5),
        CreditRating::C => dec!(2),
        CreditRating::D => Decimal::ZERO,
    }
}

pub fn counterparty_score(counterparty: CounterpartyRating) -> Score {
    match counterparty {
        CounterpartyRating::Rated(rating) => rating_score(rating),
        CounterpartyRating::Unrated => UNRATED_SCORE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Minimal,
    Low,
    Moderate,
    Elevated,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskCategory {
    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Minimal => "Minimal",
            RiskCategory::Low => "Low",
            RiskCategory::Moderate => "Moderate",
            RiskCategory::Elevated => "Elevated",
            RiskCategory::High => "High",
            RiskCategory::VeryHigh => "Very High",
        }
    }

    pub fn from_pd(pd: Rate) -> Self {
        if pd <= dec!(0.0010) {
            RiskCategory::Minimal
        } else if pd <= dec!(0.0040) {
            RiskCategory::Low
        } else if pd <= dec!(0.0120) {
            RiskCategory::Moderate
        } else if pd <= dec!(0.0350) {
            RiskCategory::Elevated
        } else if pd <= dec!(0.0800) {
            RiskCategory::High
        } else {
            RiskCategory::VeryHigh
        }
    }
}
