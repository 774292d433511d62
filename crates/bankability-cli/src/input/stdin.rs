use serde_json::Value;
use std::io::{self, Read};

/// Read a JSON document piped on stdin. Returns `None` when stdin is an
/// interactive terminal or carries no data.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    tracing::debug!(bytes = trimmed.len(), "read project from stdin");

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse project from stdin: {e}"))?;
    Ok(Some(value))
}
