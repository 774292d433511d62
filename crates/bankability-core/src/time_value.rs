use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AssessmentError;
use crate::types::{Money, Rate};
use crate::AssessmentResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_NEWTON_ITERATIONS: u32 = 100;
const MAX_BISECTION_ITERATIONS: u32 = 200;
const NEWTON_GUESS: Rate = dec!(0.10);
const RATE_FLOOR: Rate = dec!(-0.99);
const RATE_CEILING: Rate = dec!(10.0);
const MIN_BRACKET_WIDTH: Decimal = dec!(0.000000000001);

/// Rates tried, in order, when looking for a sign change to bracket the IRR.
const BRACKET_GRID: [Rate; 21] = [
    dec!(-0.99),
    dec!(-0.90),
    dec!(-0.75),
    dec!(-0.50),
    dec!(-0.25),
    dec!(-0.10),
    dec!(0.0),
    dec!(0.05),
    dec!(0.10),
    dec!(0.15),
    dec!(0.20),
    dec!(0.30),
    dec!(0.50),
    dec!(0.75),
    dec!(1.0),
    dec!(1.5),
    dec!(2.0),
    dec!(3.0),
    dec!(5.0),
    dec!(7.5),
    dec!(10.0),
];

const MACRS_5_YEAR: [Rate; 6] = [
    dec!(0.20),
    dec!(0.32),
    dec!(0.192),
    dec!(0.1152),
    dec!(0.1152),
    dec!(0.0576),
];

const MACRS_7_YEAR: [Rate; 8] = [
    dec!(0.1429),
    dec!(0.2449),
    dec!(0.1749),
    dec!(0.1249),
    dec!(0.0893),
    dec!(0.0892),
    dec!(0.0893),
    dec!(0.0446),
];

// ---------------------------------------------------------------------------
// Present value
// ---------------------------------------------------------------------------

/// Present value of end-of-period cash flows; the first flow is discounted
/// one full period.
pub fn present_value(cash_flows: &[Money], rate: Rate) -> AssessmentResult<Money> {
    if rate <= dec!(-1) {
        return Err(AssessmentError::invalid(
            "rate",
            "Discount rate must be greater than -100%",
        ));
    }

    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;
    let mut total = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        discount = match discount.checked_mul(one_plus_r) {
            Some(d) => d,
            // Remaining terms are smaller than Decimal can represent.
            None => break,
        };
        if discount.is_zero() {
            return Err(AssessmentError::DivisionByZero {
                context: format!("present value discount factor at period {}", t + 1),
            });
        }
        let term = cf
            .checked_div(discount)
            .ok_or_else(|| AssessmentError::DivisionByZero {
                context: format!("present value term at period {}", t + 1),
            })?;
        total += term;
    }

    Ok(total)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Level annual payment that retires `principal` over `term` periods.
pub fn level_payment(principal: Money, rate: Rate, term: u32) -> AssessmentResult<Money> {
    validate_loan(principal, rate, term)?;

    if rate.is_zero() {
        return Ok(principal / Decimal::from(term));
    }

    let factor = (Decimal::ONE + rate)
        .checked_powi(i64::from(term))
        .ok_or_else(|| {
            AssessmentError::invalid("interest_rate", "Compounding factor overflows")
        })?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(AssessmentError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    Ok(principal * rate * factor / denominator)
}

fn validate_loan(principal: Money, rate: Rate, term: u32) -> AssessmentResult<()> {
    if principal < Decimal::ZERO {
        return Err(AssessmentError::invalid(
            "principal",
            "Loan principal cannot be negative",
        ));
    }
    if rate < Decimal::ZERO {
        return Err(AssessmentError::invalid(
            "interest_rate",
            "Interest rate cannot be negative",
        ));
    }
    if term == 0 {
        return Err(AssessmentError::invalid(
            "term_years",
            "Loan term must be at least one year",
        ));
    }
    Ok(())
}

/// One period of a level-payment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub interest: Money,
    pub principal: Money,
    /// Outstanding balance after this period's payment
    pub balance: Money,
}

impl AmortizationRow {
    pub fn payment(&self) -> Money {
        self.interest + self.principal
    }
}

/// Level-payment loan. Rows are produced on demand and the schedule can be
/// iterated any number of times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    principal: Money,
    rate: Rate,
    term: u32,
    payment: Money,
}

impl AmortizationSchedule {
    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    pub fn term(&self) -> u32 {
        self.term
    }

    /// Scheduled level payment. The final row may differ by rounding.
    pub fn payment(&self) -> Money {
        self.payment
    }

    pub fn iter(&self) -> AmortizationIter<'_> {
        AmortizationIter {
            schedule: self,
            period: 0,
            balance: self.principal,
        }
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = AmortizationRow;
    type IntoIter = AmortizationIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct AmortizationIter<'a> {
    schedule: &'a AmortizationSchedule,
    period: u32,
    balance: Money,
}

impl Iterator for AmortizationIter<'_> {
    type Item = AmortizationRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.period >= self.schedule.term {
            return None;
        }
        self.period += 1;

        let interest = self.balance * self.schedule.rate;
        let principal = if self.period == self.schedule.term {
            self.balance
        } else {
            (self.schedule.payment - interest).min(self.balance)
        };
        self.balance -= principal;

        Some(AmortizationRow {
            period: self.period,
            interest,
            principal,
            balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.schedule.term - self.period) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AmortizationIter<'_> {}

pub fn amortization_schedule(
    principal: Money,
    annual_rate: Rate,
    term_years: u32,
) -> AssessmentResult<AmortizationSchedule> {
    let payment = level_payment(principal, annual_rate, term_years)?;
    Ok(AmortizationSchedule {
        principal,
        rate: annual_rate,
        term: term_years,
        payment,
    })
}

// ---------------------------------------------------------------------------
// Depreciation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationYear {
    pub year: u32,
    pub rate: Rate,
    pub amount: Money,
}

/// MACRS half-year convention schedule for the 5- and 7-year classes.
pub fn depreciation_schedule(
    basis: Money,
    class_life: u32,
) -> AssessmentResult<Vec<DepreciationYear>> {
    let rates: &[Rate] = match class_life {
        5 => &MACRS_5_YEAR,
        7 => &MACRS_7_YEAR,
        other => return Err(AssessmentError::UnsupportedClassLife { class_life: other }),
    };

    Ok(rates
        .iter()
        .enumerate()
        .map(|(i, rate)| DepreciationYear {
            year: i as u32 + 1,
            rate: *rate,
            amount: basis * rate,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Internal rate of return
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrMethod {
    Newton,
    Bisection,
}

/// Outcome of the IRR search. A series without a root in the searched range
/// is `NotComputed`, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IrrSolution {
    Converged {
        rate: Rate,
        method: IrrMethod,
        iterations: u32,
    },
    NotComputed,
}

impl IrrSolution {
    pub fn rate(&self) -> Option<Rate> {
        match self {
            IrrSolution::Converged { rate, .. } => Some(*rate),
            IrrSolution::NotComputed => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, IrrSolution::Converged { .. })
    }
}

enum SolverState {
    TryingNewton,
    TryingBisection,
    Finished(IrrSolution),
}

/// IRR of a series whose first flow sits at t = 0. Newton-Raphson from 10%,
/// falling back to bracketed bisection.
pub fn internal_rate_of_return(cash_flows: &[Money]) -> IrrSolution {
    if cash_flows.len() < 2 || !has_sign_change(cash_flows) {
        return IrrSolution::NotComputed;
    }

    let mut state = SolverState::TryingNewton;
    loop {
        state = match state {
            SolverState::TryingNewton => match solve_newton(cash_flows) {
                Some((rate, iterations)) => SolverState::Finished(IrrSolution::Converged {
                    rate,
                    method: IrrMethod::Newton,
                    iterations,
                }),
                None => {
                    debug!("IRR Newton iteration did not converge, falling back to bisection");
                    SolverState::TryingBisection
                }
            },
            SolverState::TryingBisection => match solve_bisection(cash_flows) {
                Some((rate, iterations)) => SolverState::Finished(IrrSolution::Converged {
                    rate,
                    method: IrrMethod::Bisection,
                    iterations,
                }),
                None => {
                    debug!("IRR bisection found no bracketed root");
                    SolverState::Finished(IrrSolution::NotComputed)
                }
            },
            SolverState::Finished(solution) => return solution,
        };
    }
}

fn has_sign_change(cash_flows: &[Money]) -> bool {
    let positive = cash_flows.iter().any(|cf| *cf > Decimal::ZERO);
    let negative = cash_flows.iter().any(|cf| *cf < Decimal::ZERO);
    positive && negative
}

/// NPV (t from 0) and its derivative with respect to the rate. `None` when
/// the rate is outside the domain or the arithmetic overflows.
fn npv_and_slope(cash_flows: &[Money], rate: Rate) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    if one_plus_r <= Decimal::ZERO {
        return None;
    }

    let mut discount = Decimal::ONE;
    let mut value = Decimal::ZERO;
    let mut slope = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = match discount.checked_mul(one_plus_r) {
                Some(d) => d,
                None => break,
            };
        }
        if discount.is_zero() {
            return None;
        }
        let term = cf.checked_div(discount)?;
        value = value.checked_add(term)?;
        if t > 0 {
            let d_term = Decimal::from(t as u64)
                .checked_mul(term)?
                .checked_div(one_plus_r)?;
            slope = slope.checked_sub(d_term)?;
        }
    }

    Some((value, slope))
}

fn npv_at(cash_flows: &[Money], rate: Rate) -> Option<Decimal> {
    npv_and_slope(cash_flows, rate).map(|(value, _)| value)
}

fn solve_newton(cash_flows: &[Money]) -> Option<(Rate, u32)> {
    let mut rate = NEWTON_GUESS;

    for iteration in 1..=MAX_NEWTON_ITERATIONS {
        let (value, slope) = npv_and_slope(cash_flows, rate)?;
        if value.abs() < CONVERGENCE_THRESHOLD {
            return Some((rate, iteration));
        }
        if slope.is_zero() {
            return None;
        }

        rate = rate.checked_sub(value.checked_div(slope)?)?;
        if rate <= RATE_FLOOR || rate > RATE_CEILING {
            return None;
        }
    }

    None
}

fn solve_bisection(cash_flows: &[Money]) -> Option<(Rate, u32)> {
    let mut previous: Option<(Rate, Decimal)> = None;
    let mut bracket = None;

    for rate in BRACKET_GRID {
        let Some(value) = npv_at(cash_flows, rate) else {
            continue;
        };
        if value.abs() < CONVERGENCE_THRESHOLD {
            return Some((rate, 0));
        }
        if let Some((prev_rate, prev_value)) = previous {
            if prev_value.is_sign_negative() != value.is_sign_negative() {
                bracket = Some((prev_rate, prev_value, rate));
                break;
            }
        }
        previous = Some((rate, value));
    }

    let (mut low, mut low_value, mut high) = bracket?;

    for iteration in 1..=MAX_BISECTION_ITERATIONS {
        let mid = (low + high) / dec!(2);
        let mid_value = npv_at(cash_flows, mid)?;

        if mid_value.abs() < CONVERGENCE_THRESHOLD || high - low < MIN_BRACKET_WIDTH {
            return Some((mid, iteration));
        }

        if mid_value.is_sign_negative() == low_value.is_sign_negative() {
            low = mid;
            low_value = mid_value;
        } else {
            high = mid;
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
