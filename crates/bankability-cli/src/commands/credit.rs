use serde_json::Value;

use bankability_core::{credit, financial};

use super::ProjectArgs;
use crate::input;

pub fn run_credit_risk(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let project = input::read_project(args.input.as_deref())?;
    let config = input::config::load_config(args.config.as_deref())?;
    let financials = financial::build_pro_forma(&project, &config.model)?;
    let result = credit::assess_credit_risk(&project, &financials)?;
    Ok(serde_json::to_value(result)?)
}
