use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Build the filter, letting `RUST_LOG` override the command-line level.
fn build_filter(log_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(format!("warn,bankability_core={log_level},bankability={log_level}"))
}

/// Send diagnostics to stderr so stdout carries only the command output.
pub fn init_logging(log_level: &str) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(fmt_layer)
        .try_init();

    tracing::debug!(log_level = %log_level, "logging initialized");
}
