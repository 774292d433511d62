use serde_json::Value;

/// Print just the headline figure of the output.
///
/// Looks for each command's headline field in priority order, then falls
/// back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "grade",
        "equivalent_rating",
        "min_dscr",
        "tornado",
        "deltas",
        "capital_cost",
    ];

    if let Value::Object(map) = result_obj {
        if let (Some(score), Some(grade)) = (map.get("overall_score"), map.get("grade")) {
            println!("{} ({})", format_minimal(score), format_minimal(grade));
            return;
        }

        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
