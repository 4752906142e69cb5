//! Schema synchronization: make a table's columns cover incoming fields

use std::collections::HashSet;

use crate::config::InferenceMode;
use crate::error::ImportError;
use crate::inference::{ColumnSpec, infer_type};
use crate::record::{FieldValue, Record};

use super::TableSchema;
use super::catalog::SchemaCatalog;

/// Result of [`SchemaSynchronizer::ensure_schema`]
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Columns after synchronization
    pub schema: TableSchema,
    /// Whether the table was created
    pub created: bool,
    /// Columns added by `ADD COLUMN`, in order
    pub added: Vec<String>,
}

/// Creates and extends tables so every field has a column
#[derive(Debug, Clone, Default)]
pub struct SchemaSynchronizer {
    mode: InferenceMode,
    string_limit: Option<u32>,
}

impl SchemaSynchronizer {
    pub fn new(mode: InferenceMode, string_limit: Option<u32>) -> Self {
        Self { mode, string_limit }
    }

    fn column_for(&self, name: &str, value: &FieldValue) -> Option<ColumnSpec> {
        let column_type = infer_type(name, value)?;
        Some(ColumnSpec::new(name, column_type).with_limit(self.string_limit))
    }

    /// Columns for a new table, per the inference mode
    fn initial_columns(&self, records: &[Record]) -> Vec<ColumnSpec> {
        match self.mode {
            InferenceMode::FirstRecord => records
                .first()
                .map(|record| {
                    record
                        .iter()
                        .filter_map(|(name, value)| self.column_for(name, value))
                        .collect()
                })
                .unwrap_or_default(),
            InferenceMode::Union => {
                // First-seen order; the first non-null sample decides the type
                let mut order: Vec<&str> = Vec::new();
                let mut samples: Vec<&FieldValue> = Vec::new();
                for record in records {
                    for (name, value) in record.iter() {
                        match order.iter().position(|n| *n == name) {
                            Some(i) => {
                                if samples[i].is_null() {
                                    samples[i] = value;
                                }
                            }
                            None => {
                                order.push(name);
                                samples.push(value);
                            }
                        }
                    }
                }
                order
                    .into_iter()
                    .zip(samples)
                    .filter_map(|(name, value)| self.column_for(name, value))
                    .collect()
            }
        }
    }

    /// Guarantee the table exists and has a column for every field
    ///
    /// DDL already applied is not undone when a later statement fails.
    pub fn ensure_schema(
        &self,
        catalog: &mut SchemaCatalog<'_>,
        table: &str,
        records: &[Record],
    ) -> Result<SyncOutcome, ImportError> {
        if records.is_empty() {
            return Err(ImportError::Validation(
                "no records to synchronize".to_string(),
            ));
        }

        let mut created = false;
        if !catalog.table_exists(table)? {
            let columns = self.initial_columns(records);
            catalog.create_table(table, &columns)?;
            created = true;
        }

        let mut schema = catalog.schema(table)?;
        let mut added = Vec::new();
        let mut attempted: HashSet<String> = HashSet::new();

        for record in records {
            let mut changed = false;
            for (name, value) in record.iter() {
                if schema.contains(name) || attempted.contains(name) {
                    continue;
                }
                let Some(column) = self.column_for(name, value) else {
                    continue;
                };
                attempted.insert(name.to_string());
                if catalog.add_column(table, &column)? {
                    added.push(column.name.clone());
                }
                changed = true;
            }
            if changed {
                schema = catalog.schema(table)?;
            }
        }

        Ok(SyncOutcome {
            schema,
            created,
            added,
        })
    }
}
