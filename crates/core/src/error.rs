//! Error types for import operations

use thiserror::Error;

use crate::backend::BackendError;
use crate::config::ConfigError;

/// Errors that can occur while importing records
#[derive(Error, Debug)]
pub enum ImportError {
    /// Malformed caller input (not a sequence, empty, non-object records)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Missing or invalid connection profile
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// DDL issuance failed
    #[error("Schema change on '{table}' failed: {source}")]
    Schema {
        table: String,
        statement: String,
        #[source]
        source: BackendError,
    },

    /// Connection, catalog, query or bulk-insert failure
    #[error("{context}: {source}")]
    Backend {
        context: String,
        #[source]
        source: BackendError,
    },

    /// A record field has no matching column after synchronization
    #[error("Unknown column '{field}' for table '{table}'")]
    UnknownField { table: String, field: String },
}

impl ImportError {
    /// Wrap a backend error with a short description of what was attempted
    pub fn backend(context: impl Into<String>, source: BackendError) -> Self {
        ImportError::Backend {
            context: context.into(),
            source,
        }
    }

    /// Whether the error only affects a single record
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ImportError::UnknownField { .. })
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ImportError::Validation(msg) => {
                format!(
                    "Invalid input: {msg}\n\n\
                    Hint: Provide a JSON object, a JSON array of objects, or JSONL."
                )
            }
            ImportError::Configuration(err) => err.user_message(),
            ImportError::Schema {
                table,
                statement,
                source,
            } => {
                format!(
                    "Could not change the schema of '{table}': {source}\nStatement: {statement}\n\n\
                    Hint: Check that the column names are valid for the database."
                )
            }
            _ => self.to_string(),
        }
    }
}
