//! Record sanitization against live column limits

use std::collections::HashMap;

use crate::record::{FieldValue, Record};

/// Fit a record's values to the target columns
///
/// Composites become compact JSON text. Strings longer than their column's
/// limit keep their first `limit` characters. Everything else, including
/// nulls and fields without a column, passes through unchanged.
pub fn sanitize(record: &Record, limits: &HashMap<String, Option<u32>>) -> Record {
    record
        .iter()
        .map(|(name, value)| {
            let limit = limits.get(name).copied().flatten();
            let value = match value {
                FieldValue::Composite(v) => FieldValue::String(v.to_string()),
                FieldValue::String(s) => match limit {
                    Some(limit) => FieldValue::String(truncate_chars(s, limit as usize)),
                    None => FieldValue::String(s.clone()),
                },
                other => other.clone(),
            };
            (name.to_string(), value)
        })
        .collect()
}

fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((end, _)) => s[..end].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn limits() -> HashMap<String, Option<u32>> {
        HashMap::from([
            ("name".to_string(), Some(5)),
            ("bio".to_string(), None),
            ("age".to_string(), None),
        ])
    }

    #[test]
    fn test_truncates_to_exact_limit() {
        let record = Record::new().with("name", "Alexander").with("bio", "x".repeat(500));
        let clean = sanitize(&record, &limits());

        assert_eq!(clean.get("name"), Some(&FieldValue::from("Alexa")));
        assert_eq!(clean.get("bio").and_then(|v| v.as_str()).map(str::len), Some(500));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let record = Record::new().with("name", "日本語のテキスト");
        let clean = sanitize(&record, &limits());
        assert_eq!(clean.get("name"), Some(&FieldValue::from("日本語のテ")));
    }

    #[test]
    fn test_composites_are_serialized() {
        let record = Record::new()
            .with("tags", FieldValue::from(json!(["a", "b"])))
            .with("meta", FieldValue::from(json!({"k": 1})));
        let clean = sanitize(&record, &limits());

        assert_eq!(clean.get("tags"), Some(&FieldValue::from(r#"["a","b"]"#)));
        assert_eq!(clean.get("meta"), Some(&FieldValue::from(r#"{"k":1}"#)));
    }

    #[test]
    fn test_other_values_unchanged() {
        let record = Record::new()
            .with("age", 30i64)
            .with("name", FieldValue::Null)
            .with("unknown", "kept as is");
        let clean = sanitize(&record, &limits());
        assert_eq!(clean, record);
    }
}
