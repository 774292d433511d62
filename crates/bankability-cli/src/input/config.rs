use bankability_core::AssessmentConfig;
use tracing::debug;

use super::file;

/// Load an assessment config from JSON or YAML, chosen by file extension.
/// Missing sections fall back to the library defaults.
pub fn load_config(path: Option<&str>) -> Result<AssessmentConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(AssessmentConfig::default());
    };

    let (canonical, contents) = file::read_text(path)?;
    let is_yaml = canonical
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let config: AssessmentConfig = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    config.validate()?;

    debug!(path = %canonical.display(), "loaded assessment config");
    Ok(config)
}
