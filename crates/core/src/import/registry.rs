//! Per-call table handles that turn records into insertable rows

#![allow(clippy::collapsible_if)]

use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::warn;

use crate::error::ImportError;
use crate::inference::{ColumnSpec, ColumnType, is_identity_name, parse_timestamp};
use crate::record::{FieldValue, Record};
use crate::schema::{CREATED_AT, TableSchema, UPDATED_AT};

/// One value per insert column, in column order
pub type Row = Vec<FieldValue>;

/// Immutable view of a table used to build rows
#[derive(Debug, Clone)]
pub struct TableHandle {
    schema: TableSchema,
    include_identity: bool,
    identity: Option<String>,
    insert_columns: Vec<ColumnSpec>,
    positions: HashMap<String, usize>,
}

impl TableHandle {
    /// Bind a handle to a schema
    ///
    /// With `include_identity` the identity column receives record ids;
    /// otherwise it is left to the database and record ids are ignored.
    pub fn new(schema: TableSchema, include_identity: bool) -> Self {
        let identity = schema.identity().map(|c| c.name.clone());
        let insert_columns: Vec<ColumnSpec> = schema
            .columns
            .iter()
            .filter(|c| include_identity || Some(&c.name) != identity.as_ref())
            .cloned()
            .collect();
        let positions = insert_columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();

        Self {
            schema,
            include_identity,
            identity,
            insert_columns,
            positions,
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.schema.name
    }

    /// Columns named in the INSERT, in row order
    pub fn insert_columns(&self) -> &[ColumnSpec] {
        &self.insert_columns
    }

    /// Build a row from a sanitized record
    ///
    /// Fails with `UnknownField` when a field has no column. Values a
    /// datetime column cannot hold are logged and stored as null.
    /// `created_at` / `updated_at` default to `now`.
    pub fn build_row(&self, record: &Record, now: NaiveDateTime) -> Result<Row, ImportError> {
        let mut row: Row = vec![FieldValue::Null; self.insert_columns.len()];

        for (name, value) in record.iter() {
            let column_name = match (is_identity_name(name), &self.identity) {
                (true, Some(_)) if !self.include_identity => continue,
                (true, Some(identity)) => identity.as_str(),
                _ => name,
            };

            let Some(&position) = self.positions.get(column_name) else {
                return Err(ImportError::UnknownField {
                    table: self.table().to_string(),
                    field: name.to_string(),
                });
            };
            row[position] = self.typecast(&self.insert_columns[position], value);
        }

        for name in [CREATED_AT, UPDATED_AT] {
            if let Some(&position) = self.positions.get(name) {
                if row[position].is_null() {
                    row[position] = FieldValue::Timestamp(now);
                }
            }
        }

        Ok(row)
    }

    fn typecast(&self, column: &ColumnSpec, value: &FieldValue) -> FieldValue {
        if column.column_type != ColumnType::Datetime {
            return value.clone();
        }
        match value {
            FieldValue::Null | FieldValue::Timestamp(_) => value.clone(),
            FieldValue::String(s) => match parse_timestamp(s) {
                Some(ts) => FieldValue::Timestamp(ts),
                None => {
                    warn!(
                        table = self.table(),
                        column = %column.name,
                        value = %s,
                        "Unparsable timestamp, storing null"
                    );
                    FieldValue::Null
                }
            },
            other => {
                warn!(
                    table = self.table(),
                    column = %column.name,
                    value_type = other.type_name(),
                    "Value cannot be stored as a timestamp, storing null"
                );
                FieldValue::Null
            }
        }
    }

    /// Whether record ids are written to the identity column
    pub fn includes_identity(&self) -> bool {
        self.include_identity
    }

    /// Name of the table's identity column, if it has one
    pub fn identity_column(&self) -> Option<&str> {
        self.identity.as_deref()
    }
}

/// Table name to handle, rebuilt for every import call
#[derive(Debug, Default)]
pub struct TableRegistry {
    handles: HashMap<String, TableHandle>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind (or rebind) the handle for a schema's table
    pub fn bind(&mut self, schema: TableSchema, include_identity: bool) -> &TableHandle {
        let table = schema.name.clone();
        self.handles
            .insert(table.clone(), TableHandle::new(schema, include_identity));
        &self.handles[&table]
    }

    pub fn get(&self, table: &str) -> Option<&TableHandle> {
        self.handles.get(table)
    }
}
