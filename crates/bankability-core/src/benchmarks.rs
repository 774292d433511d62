//! Reference data for each supported technology.
//!
//! Capital and fixed O&M bands are representative 2024-2025 US market ranges
//! in $/kW and $/kW-yr. Values are defaults to be tuned per deployment; the
//! models only ever read them through [`benchmark_for`].

use rust_decimal_macros::dec;
use serde::Serialize;

use crate::project::TechnologyType;
use crate::types::{Money, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnologyMaturity {
    /// Long operating record, standard lender terms
    Mature,
    /// Commercially deployed at scale with a shorter record
    Commercial,
    /// Few utility-scale references
    Emerging,
    FirstOfAKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBand {
    pub low: Money,
    pub mid: Money,
    pub high: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnologyBenchmark {
    pub technology: TechnologyType,
    pub maturity: TechnologyMaturity,
    pub useful_life_years: u32,
    pub capacity_factor_p50: Rate,
    /// Annual degradation a lender's engineer would expect
    pub degradation_rate: Rate,
    pub capex_per_kw: CostBand,
    pub fixed_om_per_kw_year: CostBand,
    pub variable_om_per_mwh: Money,
    /// Leverage commonly achieved in the market
    pub typical_leverage: Rate,
    /// Leverage beyond which lenders rarely go
    pub max_leverage: Rate,
    /// Loss severity on the physical collateral, before structural protections
    pub collateral_lgd: Rate,
}

const fn band(low: Money, mid: Money, high: Money) -> CostBand {
    CostBand { low, mid, high }
}

/// One row per [`TechnologyType`], in declaration order.
static BENCHMARKS: [TechnologyBenchmark; 14] = [
    TechnologyBenchmark {
        technology: TechnologyType::SolarPv,
        maturity: TechnologyMaturity::Mature,
        useful_life_years: 30,
        capacity_factor_p50: dec!(0.22),
        degradation_rate: dec!(0.005),
        capex_per_kw: band(dec!(800), dec!(1050), dec!(1400)),
        fixed_om_per_kw_year: band(dec!(8), dec!(14), dec!(22)),
        variable_om_per_mwh: dec!(0),
        typical_leverage: dec!(0.70),
        max_leverage: dec!(0.80),
        collateral_lgd: dec!(0.35),
    },
    TechnologyBenchmark {
        technology: TechnologyType::Csp,
        maturity: TechnologyMaturity::Commercial,
        useful_life_years: 30,
        capacity_factor_p50: dec!(0.35),
        degradation_rate: dec!(0.002),
        capex_per_kw: band(dec!(4000), dec!(6000), dec!(8000)),
        fixed_om_per_kw_year: band(dec!(50), dec!(70), dec!(90)),
        variable_om_per_mwh: dec!(3.5),
        typical_leverage: dec!(0.60),
        max_leverage: dec!(0.70),
        collateral_lgd: dec!(0.45),
    },
    TechnologyBenchmark {
        technology: TechnologyType::OnshoreWind,
        maturity: TechnologyMaturity::Mature,
        useful_life_years: 25,
        capacity_factor_p50: dec!(0.33),
        degradation_rate: dec!(0.004),
        capex_per_kw: band(dec!(1100), dec!(1400), dec!(1800)),
        fixed_om_per_kw_year: band(dec!(25), dec!(38), dec!(55)),
        variable_om_per_mwh: dec!(0),
        typical_leverage: dec!(0.70),
        max_leverage: dec!(0.80),
        collateral_lgd: dec!(0.35),
    },
    TechnologyBenchmark {
        technology: TechnologyType::OffshoreWind,
        maturity: TechnologyMaturity::Commercial,
        useful_life_years: 25,
        capacity_factor_p50: dec!(0.42),
        degradation_rate: dec!(0.003),
        capex_per_kw: band(dec!(2800), dec!(3500), dec!(4500)),
        fixed_om_per_kw_year: band(dec!(60), dec!(90), dec!(130)),
        variable_om_per_mwh: dec!(0),
        typical_leverage: dec!(0.65),
        max_leverage: dec!(0.75),
        collateral_lgd: dec!(0.45),
    },
    TechnologyBenchmark {
        technology: TechnologyType::BatteryStorage,
        maturity: TechnologyMaturity::Commercial,
        useful_life_years: 15,
        capacity_factor_p50: dec!(0.15),
        degradation_rate: dec!(0.02),
        capex_per_kw: band(dec!(800), dec!(1200), dec!(1800)),
        fixed_om_per_kw_year: band(dec!(6), dec!(12), dec!(20)),
        variable_om_per_mwh: dec!(0),
        typical_leverage: dec!(0.55),
        max_leverage: dec!(0.70),
        collateral_lgd: dec!(0.50),
    },
    TechnologyBenchmark {
        technology: TechnologyType::GasCombinedCycle,
        maturity: TechnologyMaturity::Mature,
        useful_life_years: 30,
        capacity_factor_p50: dec!(0.55),
        degradation_rate: dec!(0.002),
        capex_per_kw: band(dec!(800), dec!(1100), dec!(1500)),
        fixed_om_per_kw_year: band(dec!(12), dec!(20), dec!(35)),
        variable_om_per_mwh: dec!(3.0),
        typical_leverage: dec!(0.65),
        max_leverage: dec!(0.75),
        collateral_lgd: dec!(0.35),
    },
    TechnologyBenchmark {
        technology: TechnologyType::GasCombustionTurbine,
        maturity: TechnologyMaturity::Mature,
        useful_life_years: 30,
        capacity_factor_p50: dec!(0.15),
        degradation_rate: dec!(0.002),
        capex_per_kw: band(dec!(600), dec!(900), dec!(1300)),
        fixed_om_per_kw_year: band(dec!(10), dec!(18), dec!(30)),
        variable_om_per_mwh: dec!(5.0),
        typical_leverage: dec!(0.60),
        max_leverage: dec!(0.70),
        collateral_lgd: dec!(0.40),
    },
    TechnologyBenchmark {
        technology: TechnologyType::Nuclear,
        maturity: TechnologyMaturity::Mature,
        useful_life_years: 60,
        capacity_factor_p50: dec!(0.92),
        degradation_rate: dec!(0.001),
        capex_per_kw: band(dec!(6000), dec!(8000), dec!(12000)),
        fixed_om_per_kw_year: band(dec!(100), dec!(130), dec!(160)),
        variable_om_per_mwh: dec!(2.5),
        typical_leverage: dec!(0.50),
        max_leverage: dec!(0.60),
        collateral_lgd: dec!(0.40),
    },
    TechnologyBenchmark {
        technology: TechnologyType::Smr,
        maturity: TechnologyMaturity::FirstOfAKind,
        useful_life_years: 60,
        capacity_factor_p50: dec!(0.90),
        degradation_rate: dec!(0.001),
        capex_per_kw: band(dec!(7000), dec!(10000), dec!(15000)),
        fixed_om_per_kw_year: band(dec!(100), dec!(140), dec!(180)),
        variable_om_per_mwh: dec!(3.0),
        typical_leverage: dec!(0.40),
        max_leverage: dec!(0.55),
        collateral_lgd: dec!(0.55),
    },
    TechnologyBenchmark {
        technology: TechnologyType::Hydro,
        maturity: TechnologyMaturity::Mature,
        useful_life_years: 50,
        capacity_factor_p50: dec!(0.42),
        degradation_rate: dec!(0.001),
        capex_per_kw: band(dec!(2000), dec!(3500), dec!(6000)),
        fixed_om_per_kw_year: band(dec!(20), dec!(40), dec!(65)),
        variable_om_per_mwh: dec!(0),
        typical_leverage: dec!(0.65),
        max_leverage: dec!(0.75),
        collateral_lgd: dec!(0.30),
    },
    TechnologyBenchmark {
        technology: TechnologyType::Geothermal,
        maturity: TechnologyMaturity::Commercial,
        useful_life_years: 30,
        capacity_factor_p50: dec!(0.88),
        degradation_rate: dec!(0.002),
        capex_per_kw: band(dec!(2500), dec!(4000), dec!(6500)),
        fixed_om_per_kw_year: band(dec!(30), dec!(50), dec!(80)),
        variable_om_per_mwh: dec!(0),
        typical_leverage: dec!(0.60),
        max_leverage: dec!(0.70),
        collateral_lgd: dec!(0.40),
    },
    TechnologyBenchmark {
        technology: TechnologyType::Biomass,
        maturity: TechnologyMaturity::Commercial,
        useful_life_years: 25,
        capacity_factor_p50: dec!(0.80),
        degradation_rate: dec!(0.003),
        capex_per_kw: band(dec!(2000), dec!(3500), dec!(5000)),
        fixed_om_per_kw_year: band(dec!(50), dec!(80), dec!(120)),
        variable_om_per_mwh: dec!(5.0),
        typical_leverage: dec!(0.55),
        max_leverage: dec!(0.65),
        collateral_lgd: dec!(0.50),
    },
    TechnologyBenchmark {
        technology: TechnologyType::CoalIgcc,
        maturity: TechnologyMaturity::Emerging,
        useful_life_years: 40,
        capacity_factor_p50: dec!(0.75),
        degradation_rate: dec!(0.002),
        capex_per_kw: band(dec!(3500), dec!(4500), dec!(6000)),
        fixed_om_per_kw_year: band(dec!(60), dec!(80), dec!(100)),
        variable_om_per_mwh: dec!(7.0),
        typical_leverage: dec!(0.50),
        max_leverage: dec!(0.60),
        collateral_lgd: dec!(0.55),
    },
    TechnologyBenchmark {
        technology: TechnologyType::Transmission,
        maturity: TechnologyMaturity::Mature,
        useful_life_years: 40,
        capacity_factor_p50: dec!(0.95),
        degradation_rate: dec!(0),
        capex_per_kw: band(dec!(1500), dec!(2500), dec!(4000)),
        fixed_om_per_kw_year: band(dec!(10), dec!(15), dec!(25)),
        variable_om_per_mwh: dec!(0),
        typical_leverage: dec!(0.70),
        max_leverage: dec!(0.80),
        collateral_lgd: dec!(0.25),
    },
];

pub fn benchmark_for(technology: TechnologyType) -> &'static TechnologyBenchmark {
    &BENCHMARKS[technology as usize]
}

pub fn all_benchmarks() -> &'static [TechnologyBenchmark] {
    &BENCHMARKS
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_every_technology_has_its_own_row() {
        for technology in TechnologyType::ALL {
            assert_eq!(benchmark_for(technology).technology, technology);
        }
        assert_eq!(all_benchmarks().len(), TechnologyType::ALL.len());
    }

    #[test]
    fn test_bands_are_ordered() {
        for row in all_benchmarks() {
            assert!(row.capex_per_kw.low <= row.capex_per_kw.mid);
            assert!(row.capex_per_kw.mid <= row.capex_per_kw.high);
            assert!(row.fixed_om_per_kw_year.low <= row.fixed_om_per_kw_year.mid);
            assert!(row.fixed_om_per_kw_year.mid <= row.fixed_om_per_kw_year.high);
        }
    }

    #[test]
    fn test_leverage_and_lgd_in_range() {
        for row in all_benchmarks() {
            assert!(row.typical_leverage <= row.max_leverage, "{:?}", row.technology);
            assert!(row.max_leverage < Decimal::ONE);
            assert!(row.collateral_lgd > Decimal::ZERO && row.collateral_lgd < Decimal::ONE);
            assert!(row.capacity_factor_p50 > Decimal::ZERO);
        }
    }
}
