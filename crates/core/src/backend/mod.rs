//! Database backends
//!
//! A [`Backend`] executes DDL, runs pass-through queries, bulk-inserts rows
//! and reports the catalog (tables and their columns). Two implementations
//! exist behind feature flags:
//!
//! - `duckdb-backend` (default): embedded DuckDB, file or in-memory
//! - `postgres-backend`: PostgreSQL through `tokio-postgres`, driven on a
//!   private current-thread runtime

mod error;

#[cfg(feature = "duckdb-backend")]
mod duckdb_impl;
#[cfg(feature = "postgres-backend")]
mod postgres_impl;

pub use error::{BackendError, BackendErrorKind};

#[cfg(feature = "duckdb-backend")]
pub use duckdb_impl::DuckDbBackend;
#[cfg(feature = "postgres-backend")]
pub use postgres_impl::PostgresBackend;

use serde_json::{Map, Value};

use crate::config::{ConfigError, ConnectionProfile};
use crate::error::ImportError;
use crate::inference::{ColumnSpec, ColumnType};
use crate::record::FieldValue;

/// SQL flavour spoken by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    DuckDb,
    Postgres,
}

impl Dialect {
    /// Column type as it appears in DDL
    pub fn column_type_sql(&self, column: &ColumnSpec) -> String {
        match column.column_type {
            ColumnType::String => match column.limit {
                Some(limit) => format!("VARCHAR({limit})"),
                None => "VARCHAR".to_string(),
            },
            ColumnType::Integer => "BIGINT".to_string(),
            ColumnType::Float => match self {
                Dialect::DuckDb => "DOUBLE".to_string(),
                Dialect::Postgres => "DOUBLE PRECISION".to_string(),
            },
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Datetime => "TIMESTAMP".to_string(),
            ColumnType::Text => "TEXT".to_string(),
        }
    }
}

/// Capability the import engine needs from a database
pub trait Backend {
    /// SQL flavour used when rendering DDL
    fn dialect(&self) -> Dialect;

    /// Run one DDL statement
    fn execute_ddl(&mut self, sql: &str) -> Result<(), BackendError>;

    /// Run a query and return each row as a JSON object
    fn query(&mut self, sql: &str) -> Result<Vec<Map<String, Value>>, BackendError>;

    /// Insert rows in one transaction; each row holds one value per column
    fn bulk_insert(
        &mut self,
        table: &str,
        columns: &[ColumnSpec],
        rows: &[Vec<FieldValue>],
    ) -> Result<usize, BackendError>;

    /// Names of user tables
    fn tables(&mut self) -> Result<Vec<String>, BackendError>;

    /// Whether a table exists
    fn table_exists(&mut self, table: &str) -> Result<bool, BackendError> {
        Ok(self.tables()?.iter().any(|t| t == table))
    }

    /// Columns of a table in ordinal order
    fn columns(&mut self, table: &str) -> Result<Vec<ColumnSpec>, BackendError>;

    /// Move the identity sequence past ids that were inserted explicitly
    ///
    /// Returns `false` when the backend has no way to do so.
    fn advance_identity(&mut self, _table: &str, _column: &str) -> Result<bool, BackendError> {
        Ok(false)
    }
}

/// Open a backend for a connection profile
pub fn connect(profile: &ConnectionProfile) -> Result<Box<dyn Backend>, ImportError> {
    match profile {
        #[cfg(feature = "duckdb-backend")]
        ConnectionProfile::Duckdb { database } => {
            let backend = DuckDbBackend::open(database)
                .map_err(|e| ImportError::backend(format!("failed to open '{database}'"), e))?;
            Ok(Box::new(backend))
        }
        #[cfg(feature = "postgres-backend")]
        ConnectionProfile::Postgresql { .. } => {
            let backend = PostgresBackend::connect(profile).map_err(|e| {
                ImportError::backend("failed to connect to PostgreSQL".to_string(), e)
            })?;
            Ok(Box::new(backend))
        }
        #[allow(unreachable_patterns)]
        other => Err(ConfigError::UnsupportedAdapter(other.adapter_name().to_string()).into()),
    }
}
