use serde_json::Value;

use bankability_core::techno_economic;

use super::ProjectArgs;
use crate::input;

pub fn run_techno_economic(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let project = input::read_project(args.input.as_deref())?;
    let config = input::config::load_config(args.config.as_deref())?;
    let result = techno_economic::analyze_techno_economics(&project, &config.model)?;
    Ok(serde_json::to_value(result)?)
}
