use serde_json::Value;

use bankability_core::scoring;

use super::ProjectArgs;
use crate::input;

pub fn run_assess(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let project = input::read_project(args.input.as_deref())?;
    let config = input::config::load_config(args.config.as_deref())?;
    let result = scoring::score_bankability(&project, &config)?;
    Ok(serde_json::to_value(result)?)
}
