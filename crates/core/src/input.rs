//! Reading records from JSON, JSONL and `key:value` pairs

use serde_json::Value;
use tracing::warn;

use crate::error::ImportError;
use crate::import::json_type_name;
use crate::record::{FieldValue, Record};

/// Parse a buffer as one JSON document, falling back to JSONL
///
/// In JSONL mode blank lines are skipped and unparsable lines are logged
/// and dropped. The result is an array of the parsed lines.
pub fn parse_json(buffer: &str) -> Value {
    if let Ok(value) = serde_json::from_str::<Value>(buffer) {
        return value;
    }

    let mut items = Vec::new();
    for (index, line) in buffer.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(value) => items.push(value),
            Err(e) => warn!(line = index + 1, error = %e, "Skipping unparsable JSONL line"),
        }
    }
    Value::Array(items)
}

/// Turn a JSON object or array of objects into records
pub fn records_from_value(value: Value) -> Result<Vec<Record>, ImportError> {
    match value {
        Value::Object(map) => Ok(vec![Record::from_json_object(map)]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(Record::from_json_object(map)),
                other => Err(ImportError::Validation(format!(
                    "element {i} is {}, expected an object",
                    json_type_name(&other)
                ))),
            })
            .collect(),
        other => Err(ImportError::Validation(format!(
            "expected an object or an array of objects, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Parse a buffer of JSON or JSONL into records
pub fn parse_records(buffer: &str) -> Result<Vec<Record>, ImportError> {
    records_from_value(parse_json(buffer))
}

/// Build one record from `key:value` pairs; values stay strings
///
/// Only the first `:` separates key from value, so `url:http://x` keeps
/// the full URL.
pub fn parse_key_values<I, S>(pairs: I) -> Result<Record, ImportError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut record = Record::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let Some((key, value)) = pair.split_once(':') else {
            return Err(ImportError::Validation(format!(
                "expected key:value, got '{pair}'"
            )));
        };
        if key.is_empty() {
            return Err(ImportError::Validation(format!(
                "missing key in '{pair}'"
            )));
        }
        record.insert(key, FieldValue::String(value.to_string()));
    }
    Ok(record)
}
