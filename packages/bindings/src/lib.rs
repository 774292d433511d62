use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use bankability_core::financial::FinancialResult;
use bankability_core::sensitivity::{FactorSet, Perturbation};
use bankability_core::{AssessmentConfig, ModelConfig, ProjectInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional config document, falling back to defaults.
fn parse_config<T>(config_json: Option<String>) -> NapiResult<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match config_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error),
        None => Ok(T::default()),
    }
}

fn parse_project(project_json: &str) -> NapiResult<ProjectInput> {
    serde_json::from_str(project_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

#[napi]
pub fn score_bankability(project_json: String, config_json: Option<String>) -> NapiResult<String> {
    let project = parse_project(&project_json)?;
    let config: AssessmentConfig = parse_config(config_json)?;
    let output =
        bankability_core::scoring::score_bankability(&project, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_financial_model(
    project_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let project = parse_project(&project_json)?;
    let config: ModelConfig = parse_config(config_json)?;
    let output = bankability_core::financial::run_financial_model(&project, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Credit risk against a pro forma already produced by `runFinancialModel`.
#[napi]
pub fn assess_credit_risk(project_json: String, financials_json: String) -> NapiResult<String> {
    let project = parse_project(&project_json)?;
    let financials: FinancialResult =
        serde_json::from_str(&financials_json).map_err(to_napi_error)?;
    let output = bankability_core::credit::assess_credit_risk(&project, &financials)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SensitivityRequest {
    project: ProjectInput,
    #[serde(default)]
    config: ModelConfig,
    #[serde(default)]
    factors: FactorSet,
}

#[napi]
pub fn run_sensitivity(request_json: String) -> NapiResult<String> {
    let request: SensitivityRequest =
        serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output = bankability_core::sensitivity::run_sensitivity(
        &request.project,
        &request.config,
        &request.factors,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ScenarioRequest {
    project: ProjectInput,
    #[serde(default)]
    config: ModelConfig,
    perturbations: Vec<Perturbation>,
}

#[napi]
pub fn run_combined_scenario(request_json: String) -> NapiResult<String> {
    let request: ScenarioRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output = bankability_core::sensitivity::run_combined_scenario(
        &request.project,
        &request.config,
        &request.perturbations,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Techno-economic
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_techno_economics(
    project_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let project = parse_project(&project_json)?;
    let config: ModelConfig = parse_config(config_json)?;
    let output = bankability_core::techno_economic::analyze_techno_economics(&project, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
