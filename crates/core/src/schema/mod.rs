//! Table schemas, DDL and schema synchronization
//!
//! Tables created here always have a leading `id` identity column and two
//! trailing `created_at` / `updated_at` timestamps. Evolution is additive
//! only: columns are created and added, never retyped or dropped.

mod catalog;
mod ddl;
mod sync;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::inference::{ColumnSpec, ColumnType};

pub use catalog::SchemaCatalog;
pub use ddl::{AddColumn, CreateTable, quote_ident, sequence_name};
pub use sync::{SchemaSynchronizer, SyncOutcome};

/// Identity column name
pub const ID_COLUMN: &str = "id";
/// Creation timestamp column name
pub const CREATED_AT: &str = "created_at";
/// Update timestamp column name
pub const UPDATED_AT: &str = "updated_at";

/// Ordered columns of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Look up a column by exact name
    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Column name to string length limit
    pub fn limits(&self) -> HashMap<String, Option<u32>> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.limit))
            .collect()
    }

    /// Like [`limits`](Self::limits), with `default` standing in for string
    /// columns the catalog reports without a length
    ///
    /// DuckDB accepts `VARCHAR(n)` but discards `n`, so its catalog never
    /// reports a limit.
    pub fn limits_or(&self, default: Option<u32>) -> HashMap<String, Option<u32>> {
        self.columns
            .iter()
            .map(|c| {
                let limit = match (c.column_type, c.limit) {
                    (ColumnType::String, None) => default,
                    (_, limit) => limit,
                };
                (c.name.clone(), limit)
            })
            .collect()
    }

    /// The identity column, matched case-insensitively
    pub fn identity(&self) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(ID_COLUMN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_schema_lookup() {
        let schema = TableSchema::new(
            "users",
            vec![
                ColumnSpec::new("id", ColumnType::Integer),
                ColumnSpec::new("name", ColumnType::String).with_limit(Some(8)),
                ColumnSpec::new("created_at", ColumnType::Datetime),
            ],
        );

        assert!(schema.contains("name"));
        assert!(!schema.contains("Name"));
        assert_eq!(schema.column_names(), vec!["id", "name", "created_at"]);
        assert_eq!(schema.limits().get("name"), Some(&Some(8)));
        assert_eq!(schema.identity().map(|c| c.name.as_str()), Some("id"));
    }

    #[test]
    fn test_limits_or_fills_unbounded_strings() {
        let schema = TableSchema::new(
            "users",
            vec![
                ColumnSpec::new("name", ColumnType::String),
                ColumnSpec::new("code", ColumnType::String).with_limit(Some(3)),
                ColumnSpec::new("age", ColumnType::Integer),
                ColumnSpec::new("bio", ColumnType::Text),
            ],
        );

        let limits = schema.limits_or(Some(5));
        assert_eq!(limits["name"], Some(5));
        assert_eq!(limits["code"], Some(3));
        assert_eq!(limits["age"], None);
        assert_eq!(limits["bio"], None);

        assert_eq!(schema.limits_or(None), schema.limits());
    }
}
