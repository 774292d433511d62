//! Composite bankability score built from five weighted dimensions.

pub mod bankability;
pub mod dimensions;
mod narrative;

pub use bankability::{
    evaluate_bankability, score_bankability, BankabilityGrade, BankabilityResult,
};
pub use dimensions::{Dimension, FactorPoints, SubScore};
