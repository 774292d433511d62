pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Result fields that hold one row per year, case or dimension.
pub(crate) const ROW_KEYS: [&str; 4] = ["cash_flows", "entries", "sub_scores", "tornado"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The first row-array field present in a result object.
pub(crate) fn row_array(result: &serde_json::Map<String, Value>) -> Option<(&str, &[Value])> {
    ROW_KEYS.iter().find_map(|key| match result.get(*key) {
        Some(Value::Array(rows)) if !rows.is_empty() => Some((*key, rows.as_slice())),
        _ => None,
    })
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
