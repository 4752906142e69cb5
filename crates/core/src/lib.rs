//! autotable core - schema-inferring import of JSON records into SQL tables
//!
//! Provides:
//! - Column type inference from sample values
//! - Schema synchronization (create table, add missing columns)
//! - Record sanitization against live column limits
//! - Batched bulk insertion with per-batch failure reporting
//! - Connection profiles loaded from YAML
//!
//! ## Example
//!
//! ```rust,ignore
//! use autotable_core::{ImportOptions, Importer};
//!
//! let mut importer = Importer::memory()?;
//! let value = serde_json::json!([
//!     {"name": "Alice", "age": 30},
//!     {"name": "Bob", "age": 25}
//! ]);
//! let stats = importer.import_value("users", &value)?;
//! assert_eq!(stats.records_imported, 2);
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod import;
pub mod inference;
pub mod input;
pub mod record;
pub mod schema;

pub use backend::{Backend, BackendError, BackendErrorKind, Dialect, connect};
pub use config::{
    ConfigError, ConnectionProfile, DEFAULT_BATCH_SIZE, DEFAULT_PROFILE, ImportOptions,
    ImportOptionsBuilder, InferenceMode, default_config_path, load_profile,
};
pub use error::ImportError;
pub use import::{
    BatchImporter, BatchReport, ImportStats, Importer, Row, TableHandle, TableRegistry, sanitize,
};
pub use inference::{ColumnSpec, ColumnType, infer_type, parse_timestamp};
pub use input::{parse_json, parse_key_values, parse_records, records_from_value};
pub use record::{FieldValue, Record};
pub use schema::{
    AddColumn, CREATED_AT, CreateTable, ID_COLUMN, SchemaCatalog, SchemaSynchronizer,
    SyncOutcome, TableSchema, UPDATED_AT, quote_ident,
};

#[cfg(feature = "duckdb-backend")]
pub use backend::DuckDbBackend;
#[cfg(feature = "postgres-backend")]
pub use backend::PostgresBackend;
