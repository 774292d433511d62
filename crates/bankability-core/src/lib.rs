pub mod benchmarks;
pub mod config;
pub mod credit;
pub mod error;
pub mod financial;
pub mod project;
pub mod scoring;
pub mod sensitivity;
pub mod time_value;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

#[cfg(feature = "techno_economic")]
pub mod techno_economic;

pub use config::{AssessmentConfig, DimensionWeights, ModelConfig};
pub use error::AssessmentError;
pub use project::ProjectInput;
pub use types::*;

/// Standard result type for all assessment operations
pub type AssessmentResult<T> = Result<T, AssessmentError>;
