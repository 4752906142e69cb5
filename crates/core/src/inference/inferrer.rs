//! Column type inference from a single sample value

use crate::record::FieldValue;

use super::formats::parse_timestamp;
use super::types::ColumnType;

/// Check whether a field name is reserved for the identity column
pub fn is_identity_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("id")
}

/// Infer the column type for a field from one sample value
///
/// Returns `None` for names reserved for the identity column. The result
/// depends only on the name and the shape of the value.
pub fn infer_type(name: &str, value: &FieldValue) -> Option<ColumnType> {
    if is_identity_name(name) {
        return None;
    }

    let column_type = match value {
        FieldValue::Null => ColumnType::String,
        FieldValue::Boolean(_) => ColumnType::Boolean,
        FieldValue::Integer(_) => ColumnType::Integer,
        FieldValue::Float(_) => ColumnType::Float,
        FieldValue::String(s) => {
            if parse_timestamp(s).is_some() {
                ColumnType::Datetime
            } else {
                ColumnType::String
            }
        }
        FieldValue::Composite(_) => ColumnType::Text,
        FieldValue::Timestamp(_) => ColumnType::Datetime,
    };
    Some(column_type)
}
