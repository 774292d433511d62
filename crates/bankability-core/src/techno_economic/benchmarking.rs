use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::benchmarks::CostBand;

/// Where a project cost sits relative to a low/mid/high market band.
/// Boundaries are inclusive on the upper side of each bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPosition {
    BelowMarketLow,
    BelowMarketMidpoint,
    AboveMarketMidpoint,
    AboveMarketHigh,
}

impl BandPosition {
    pub fn classify(value: Decimal, band: &CostBand) -> Self {
        if value <= band.low {
            BandPosition::BelowMarketLow
        } else if value <= band.mid {
            BandPosition::BelowMarketMidpoint
        } else if value <= band.high {
            BandPosition::AboveMarketMidpoint
        } else {
            BandPosition::AboveMarketHigh
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BandPosition::BelowMarketLow => "Below market low",
            BandPosition::BelowMarketMidpoint => "Below market midpoint",
            BandPosition::AboveMarketMidpoint => "Above market midpoint",
            BandPosition::AboveMarketHigh => "Above market high",
        }
    }

    /// Lender reading of a capital cost in this position.
    pub fn capital_assessment(self) -> &'static str {
        match self {
            BandPosition::BelowMarketLow => "favorable",
            BandPosition::BelowMarketMidpoint => "competitive",
            BandPosition::AboveMarketMidpoint => "acceptable",
            BandPosition::AboveMarketHigh => "elevated",
        }
    }

    /// Lender reading of a fixed O&M cost in this position.
    pub fn operating_assessment(self) -> &'static str {
        match self {
            BandPosition::BelowMarketLow => "below benchmark",
            BandPosition::BelowMarketMidpoint => "competitive",
            BandPosition::AboveMarketMidpoint => "above average",
            BandPosition::AboveMarketHigh => "high",
        }
    }
}

/// Cost compared with its benchmark band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBenchmark {
    pub value: Decimal,
    pub benchmark_low: Decimal,
    pub benchmark_mid: Decimal,
    pub benchmark_high: Decimal,
    /// value / mid - 1
    pub deviation_from_mid: Decimal,
    pub position: BandPosition,
    pub assessment: String,
}

impl CostBenchmark {
    pub(crate) fn capital(value: Decimal, band: &CostBand) -> Self {
        let position = BandPosition::classify(value, band);
        Self::build(value, band, position, position.capital_assessment())
    }

    pub(crate) fn operating(value: Decimal, band: &CostBand) -> Self {
        let position = BandPosition::classify(value, band);
        Self::build(value, band, position, position.operating_assessment())
    }

    fn build(value: Decimal, band: &CostBand, position: BandPosition, assessment: &str) -> Self {
        let deviation_from_mid = if band.mid.is_zero() {
            Decimal::ZERO
        } else {
            value / band.mid - Decimal::ONE
        };
        Self {
            value,
            benchmark_low: band.low,
            benchmark_mid: band.mid,
            benchmark_high: band.high,
            deviation_from_mid,
            position,
            assessment: assessment.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn band() -> CostBand {
        CostBand {
            low: dec!(800),
            mid: dec!(1050),
            high: dec!(1400),
        }
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let b = band();
        assert_eq!(BandPosition::classify(dec!(800), &b), BandPosition::BelowMarketLow);
        assert_eq!(
            BandPosition::classify(dec!(1050), &b),
            BandPosition::BelowMarketMidpoint
        );
        assert_eq!(
            BandPosition::classify(dec!(1400), &b),
            BandPosition::AboveMarketMidpoint
        );
        assert_eq!(
            BandPosition::classify(dec!(1400.01), &b),
            BandPosition::AboveMarketHigh
        );
    }

    #[test]
    fn test_deviation_from_mid() {
        let cb = CostBenchmark::capital(dec!(1260), &band());
        assert_eq!(cb.deviation_from_mid, dec!(0.2));
        assert_eq!(cb.assessment, "acceptable");
    }
}
