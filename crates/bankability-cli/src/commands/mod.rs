pub mod assess;
pub mod credit;
pub mod financial;
pub mod sensitivity;
pub mod techno_economic;

use clap::Args;

/// Inputs shared by every project-level command.
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to the project JSON file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Assessment config in JSON or YAML
    #[arg(long)]
    pub config: Option<String>,
}
