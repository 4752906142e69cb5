//! Dynamically typed records

use chrono::NaiveDateTime;
use serde_json::Value;

/// Canonical text layout for timestamps handed to a backend
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A single field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Null / absent
    Null,
    /// Boolean
    Boolean(bool),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Text
    String(String),
    /// Wall-clock timestamp in local time
    Timestamp(NaiveDateTime),
    /// Array or nested object
    Composite(Value),
}

impl FieldValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Check if the value is an array or nested object
    pub fn is_composite(&self) -> bool {
        matches!(self, FieldValue::Composite(_))
    }

    /// Borrow the string content, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's shape, for log output
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::String(_) => "string",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::Composite(Value::Array(_)) => "array",
            FieldValue::Composite(_) => "object",
        }
    }

    /// Text rendering used when a backend binds every parameter as text
    pub fn to_sql_text(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Integer(n) => Some(n.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Timestamp(ts) => Some(ts.format(TIMESTAMP_FORMAT).to_string()),
            FieldValue::Composite(v) => Some(v.to_string()),
        }
    }

    /// Convert back to JSON
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Integer(n) => Value::from(*n),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Timestamp(ts) => Value::String(ts.format(TIMESTAMP_FORMAT).to_string()),
            FieldValue::Composite(v) => v.clone(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                // u64 above i64::MAX lands here as well
                None => FieldValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => FieldValue::String(s),
            composite @ (Value::Array(_) | Value::Object(_)) => FieldValue::Composite(composite),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::Timestamp(value)
    }
}

/// An ordered mapping from field name to value
///
/// Field order is the insertion order, which decides column order when a
/// table is created from the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON object, keeping key order
    pub fn from_json_object(object: serde_json::Map<String, Value>) -> Self {
        // Map keys are unique, so no duplicate check is needed
        let fields = object
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from(value)))
            .collect();
        Self { fields }
    }

    /// Set a field, replacing an existing value with the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder-style `insert`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a field by exact name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Check if a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert to a JSON object
    pub fn to_json(&self) -> Value {
        let map = self
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        Value::Object(map)
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_key_order() {
        let value = json!({"name": "Alice", "age": 30, "active": true});
        let Value::Object(map) = value else {
            panic!("Expected object");
        };
        let record = Record::from_json_object(map);

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["name", "age", "active"]);
        assert_eq!(record.get("age"), Some(&FieldValue::Integer(30)));
    }

    #[test]
    fn test_wide_object() {
        let map: serde_json::Map<String, Value> =
            (0..2000).map(|i| (format!("f{i}"), json!(i))).collect();
        let record = Record::from_json_object(map);

        assert_eq!(record.len(), 2000);
        assert_eq!(record.keys().next(), Some("f0"));
        assert_eq!(record.get("f1999"), Some(&FieldValue::Integer(1999)));
    }

    #[test]
    fn test_number_conversion() {
        assert_eq!(FieldValue::from(json!(42)), FieldValue::Integer(42));
        assert_eq!(FieldValue::from(json!(0.5)), FieldValue::Float(0.5));
        assert_eq!(
            FieldValue::from(json!(u64::MAX)),
            FieldValue::Float(u64::MAX as f64)
        );
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut record = Record::new().with("a", 1i64).with("b", "x");
        record.insert("a", 2i64);

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(&FieldValue::Integer(2)));
    }

    #[test]
    fn test_sql_text_rendering() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 12, 25)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(FieldValue::Null.to_sql_text(), None);
        assert_eq!(
            FieldValue::Boolean(true).to_sql_text().as_deref(),
            Some("true")
        );
        assert_eq!(
            FieldValue::Timestamp(ts).to_sql_text().as_deref(),
            Some("2024-12-25 10:00:00")
        );
        assert_eq!(
            FieldValue::Composite(json!(["a", "b"])).to_sql_text().as_deref(),
            Some(r#"["a","b"]"#)
        );
    }
}
