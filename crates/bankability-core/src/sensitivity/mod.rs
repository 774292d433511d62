//! One-factor-at-a-time sensitivity sweeps and combined stress scenarios.

pub mod scenario;
pub mod sweep;

pub use scenario::{run_combined_scenario, Perturbation, ScenarioResult};
pub use sweep::{
    run_sensitivity, FactorSet, KeyMetrics, MetricDeltas, SensitivityEntry, SensitivityFactor,
    SensitivityOutcome, SensitivityOutput, TornadoBar,
};
