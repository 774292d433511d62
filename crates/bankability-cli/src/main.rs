mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::sensitivity::SensitivityArgs;
use commands::ProjectArgs;

/// Bankability assessments for energy infrastructure projects
#[derive(Parser)]
#[command(
    name = "bankability",
    version,
    about = "Bankability assessments for energy infrastructure projects",
    long_about = "Scores how readily lenders would finance an energy project. Runs the \
                  pro forma, credit risk, five-dimension scorecard, sensitivity sweeps \
                  and techno-economic benchmarking with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Diagnostic log level written to stderr (RUST_LOG overrides)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Full bankability scorecard with grade and recommendations
    Assess(ProjectArgs),
    /// Multi-year pro forma with DSCR, NPV, IRR and LCOE
    FinancialModel(ProjectArgs),
    /// Probability of default, loss given default and equivalent rating
    CreditRisk(ProjectArgs),
    /// One-factor sensitivity sweep or a combined stress scenario
    Sensitivity(SensitivityArgs),
    /// Cost and performance against technology benchmarks
    TechnoEconomic(ProjectArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Assess(args) => commands::assess::run_assess(args),
        Commands::FinancialModel(args) => commands::financial::run_financial_model(args),
        Commands::CreditRisk(args) => commands::credit::run_credit_risk(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::TechnoEconomic(args) => commands::techno_economic::run_techno_economic(args),
        Commands::Version => {
            println!("bankability {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
