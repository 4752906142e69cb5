//! Import orchestration
//!
//! [`Importer::import`] runs the whole pipeline for one call:
//!
//! 1. synchronize the schema (create the table, add missing columns)
//! 2. bind a [`TableHandle`] in a per-call [`TableRegistry`]
//! 3. sanitize each record and build its row; records with unknown fields
//!    are logged and skipped
//! 4. bulk-insert the rows in chunks of `batch_size`

mod batch;
mod registry;
mod sanitize;
mod stats;

pub use batch::{BatchImporter, BatchReport};
pub use registry::{Row, TableHandle, TableRegistry};
pub use sanitize::sanitize;
pub use stats::ImportStats;

use std::time::Instant;

use chrono::Local;
use serde_json::{Map, Value};
use tracing::{debug, info, info_span, warn};

use crate::backend::{self, Backend};
use crate::config::{ConnectionProfile, ImportOptions};
use crate::error::ImportError;
use crate::inference::{ColumnSpec, is_identity_name};
use crate::record::Record;
use crate::schema::{SchemaCatalog, SchemaSynchronizer};

/// Imports JSON records into tables, evolving their schema as needed
pub struct Importer {
    backend: Box<dyn Backend>,
    options: ImportOptions,
}

impl Importer {
    /// Connect to the database a profile describes
    pub fn connect(profile: &ConnectionProfile, options: ImportOptions) -> Result<Self, ImportError> {
        let backend = backend::connect(profile)?;
        Ok(Self::with_backend(backend, options))
    }

    /// Use an already opened backend
    pub fn with_backend(backend: Box<dyn Backend>, options: ImportOptions) -> Self {
        Self { backend, options }
    }

    /// In-memory DuckDB importer with default options
    #[cfg(feature = "duckdb-backend")]
    pub fn memory() -> Result<Self, ImportError> {
        let backend = backend::DuckDbBackend::memory()
            .map_err(|e| ImportError::backend("failed to open in-memory database", e))?;
        Ok(Self::with_backend(Box::new(backend), ImportOptions::default()))
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Import records into a table
    ///
    /// An empty table name or an empty record slice fails before the
    /// backend is touched. Schema and bulk insert failures abort the
    /// import; work already committed stays.
    pub fn import(&mut self, table: &str, records: &[Record]) -> Result<ImportStats, ImportError> {
        if table.trim().is_empty() {
            return Err(ImportError::Validation("table name is empty".to_string()));
        }
        if records.is_empty() {
            return Err(ImportError::Validation("no records to import".to_string()));
        }

        let span = info_span!("import", table, records = records.len());
        let _enter = span.enter();

        let start = Instant::now();
        let mut stats = ImportStats::new(table);
        stats.records_received = records.len();

        let synchronizer = SchemaSynchronizer::new(self.options.inference, self.options.string_limit);
        let outcome = {
            let mut catalog = SchemaCatalog::new(&mut *self.backend);
            synchronizer.ensure_schema(&mut catalog, table, records)?
        };
        stats.table_created = outcome.created;
        stats.columns_added = outcome.added;

        // Record ids are written only when every record carries one
        let with_ids = records.iter().filter(|r| identity_value_present(r)).count();
        let include_identity = with_ids == records.len();
        if with_ids > 0 && !include_identity {
            warn!(
                table,
                with_ids,
                without_ids = records.len() - with_ids,
                "Ignoring record ids because not every record has one"
            );
        }

        let mut registry = TableRegistry::new();
        let handle = registry.bind(outcome.schema, include_identity);
        let limits = handle.schema().limits_or(self.options.string_limit);
        let now = Local::now().naive_local();

        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let clean = sanitize(record, &limits);
            match handle.build_row(&clean, now) {
                Ok(row) => rows.push(row),
                Err(e) if e.is_recoverable() => {
                    warn!(table, record = index, error = %e, "Skipping record");
                    stats.records_skipped += 1;
                    stats.add_error(format!("record {index}: {e}"));
                }
                Err(e) => return Err(e),
            }
        }

        let report = BatchImporter::new(self.options.batch_size).import_batches(
            &mut *self.backend,
            table,
            handle.insert_columns(),
            &rows,
        )?;
        if include_identity && report.rows_inserted > 0 {
            if let Some(column) = handle.identity_column() {
                match self.backend.advance_identity(table, column) {
                    Ok(true) => debug!(table, column, "Advanced identity sequence"),
                    Ok(false) => warn!(
                        table,
                        column,
                        "Record ids were written but the identity sequence was not advanced; \
                         later imports without ids may reuse them"
                    ),
                    Err(e) => warn!(
                        table,
                        column,
                        error = %e,
                        "Failed to advance identity sequence"
                    ),
                }
            }
        }
        stats.records_imported = report.rows_inserted;
        stats.batches = report.batches;
        stats.duration = start.elapsed();

        info!(
            table,
            imported = stats.records_imported,
            skipped = stats.records_skipped,
            batches = stats.batches,
            duration = %stats.duration_string(),
            "Import complete"
        );

        Ok(stats)
    }

    /// Import a JSON value, which must be a non-empty array of objects
    pub fn import_value(&mut self, table: &str, value: &Value) -> Result<ImportStats, ImportError> {
        let Value::Array(items) = value else {
            return Err(ImportError::Validation(format!(
                "expected an array of objects, got {}",
                json_type_name(value)
            )));
        };

        let records = items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(Record::from_json_object(map.clone())),
                other => Err(ImportError::Validation(format!(
                    "element {i} is {}, expected an object",
                    json_type_name(other)
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.import(table, &records)
    }

    /// Run a query and return rows as JSON objects
    pub fn query(&mut self, sql: &str) -> Result<Vec<Map<String, Value>>, ImportError> {
        self.backend
            .query(sql)
            .map_err(|e| ImportError::backend("query failed", e))
    }

    /// Names of existing tables
    pub fn tables(&mut self) -> Result<Vec<String>, ImportError> {
        self.backend
            .tables()
            .map_err(|e| ImportError::backend("failed to list tables", e))
    }

    /// Columns of a table
    pub fn columns(&mut self, table: &str) -> Result<Vec<ColumnSpec>, ImportError> {
        SchemaCatalog::new(&mut *self.backend).columns(table)
    }
}

fn identity_value_present(record: &Record) -> bool {
    record
        .iter()
        .any(|(name, value)| is_identity_name(name) && !value.is_null())
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
