//! Column types and column specifications

use serde::{Deserialize, Serialize};

/// Column type assigned to an inferred or catalogued column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Short text, optionally length-limited
    String,
    /// Whole numbers
    Integer,
    /// Floating point numbers
    Float,
    /// True / false
    Boolean,
    /// Date and time
    Datetime,
    /// Unbounded text (serialized composites land here)
    Text,
}

impl ColumnType {
    /// Get the lowercase type name
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Datetime => "datetime",
            ColumnType::Text => "text",
        }
    }

    /// Map a backend's declared SQL type onto a column type
    ///
    /// Understands both information_schema spellings (`character varying`,
    /// `timestamp without time zone`) and short names (`varchar`, `int8`).
    /// Anything unrecognised is reported as `String`.
    pub fn from_sql_type(sql_type: &str) -> Self {
        let lowered = sql_type.trim().to_lowercase();
        let base = lowered.split('(').next().unwrap_or_default().trim();

        match base {
            "text" | "json" | "jsonb" | "clob" | "longtext" | "mediumtext" => ColumnType::Text,
            "bigint" | "integer" | "int" | "int2" | "int4" | "int8" | "smallint" | "tinyint"
            | "hugeint" | "ubigint" | "uinteger" | "usmallint" | "utinyint" | "bigserial"
            | "serial" => ColumnType::Integer,
            "double" | "double precision" | "float" | "float4" | "float8" | "real"
            | "numeric" | "decimal" => ColumnType::Float,
            "boolean" | "bool" => ColumnType::Boolean,
            "date" | "datetime" | "timestamp" | "timestamptz" => ColumnType::Datetime,
            other if other.starts_with("timestamp") => ColumnType::Datetime,
            _ => ColumnType::String,
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" => Ok(ColumnType::String),
            "integer" => Ok(ColumnType::Integer),
            "float" => Ok(ColumnType::Float),
            "boolean" => Ok(ColumnType::Boolean),
            "datetime" => Ok(ColumnType::Datetime),
            "text" => Ok(ColumnType::Text),
            _ => Err(format!("Invalid column type: {}", s)),
        }
    }
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name (case-sensitive)
    pub name: String,
    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Maximum length for string columns (`None` = backend default)
    pub limit: Option<u32>,
    /// Declared SQL type as reported by the catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_type: Option<String>,
}

impl ColumnSpec {
    /// Create a new column spec
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            limit: None,
            sql_type: None,
        }
    }

    /// Set the length limit; ignored for non-string columns
    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        if self.column_type == ColumnType::String {
            self.limit = limit;
        }
        self
    }

    /// Record the backend's declared type
    pub fn with_sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }
}
