//! List encoding normalizer
//!
//! Callers may send a list parameter as one comma-joined value (`?f=1,2,3`)
//! or as repeated keys (`?f=1&f=2&f=3`). Both normalize to the same ordered
//! sequence of strings before type coercion.

use serde_json::Value;

/// Separator for comma-joined list values
pub const CSV_SEPARATOR: &str = ",";

/// Normalize a raw list-encoded input.
///
/// - string: split on commas, empty segments kept, no trimming
/// - array of strings: join with commas, then split again
/// - array of other values: stringify each, then join and split
/// - anything else: returned unchanged for the validator to reject
pub fn normalize_csv(raw: Value) -> Value {
    match raw {
        Value::String(s) => split_csv(&s),
        Value::Array(items) if items.iter().all(Value::is_string) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            split_csv(&parts.join(CSV_SEPARATOR))
        }
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(stringify).collect();
            split_csv(&parts.join(CSV_SEPARATOR))
        }
        other => other,
    }
}

fn split_csv(s: &str) -> Value {
    Value::Array(
        s.split(CSV_SEPARATOR)
            .map(|part| Value::String(part.to_string()))
            .collect(),
    )
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
