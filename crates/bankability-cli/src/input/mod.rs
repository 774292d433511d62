pub mod config;
pub mod file;
pub mod stdin;

use bankability_core::ProjectInput;

/// Load the project description from `--input` or, failing that, piped stdin.
pub fn read_project(path: Option<&str>) -> Result<ProjectInput, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_json(path)
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <project.json> or a project piped on stdin is required".into())
    }
}
