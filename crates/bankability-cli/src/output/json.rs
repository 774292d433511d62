use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print the full output envelope to stdout.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = serde_json::to_writer_pretty(&mut handle, value) {
        tracing::error!(error = %e, "failed to serialize output");
        return;
    }
    let _ = writeln!(handle);
}
