//! Error type shared by all backends

use thiserror::Error;

/// Broad classification of a backend failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Could not open or reach the database
    Connection,
    /// A statement was rejected or failed while running
    Statement,
    /// `ADD COLUMN` for a column that already exists
    DuplicateColumn,
}

/// Error reported by a database backend
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Connection, message)
    }

    pub fn statement(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Statement, message)
    }

    pub fn duplicate_column(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::DuplicateColumn, message)
    }

    /// Whether the failure means "column already exists"
    pub fn is_duplicate_column(&self) -> bool {
        self.kind == BackendErrorKind::DuplicateColumn
    }
}

#[cfg(feature = "duckdb-backend")]
impl From<duckdb::Error> for BackendError {
    fn from(err: duckdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("Column with name") && message.contains("already exists") {
            BackendError::duplicate_column(message)
        } else {
            BackendError::statement(message)
        }
    }
}

#[cfg(feature = "postgres-backend")]
impl From<tokio_postgres::Error> for BackendError {
    fn from(err: tokio_postgres::Error) -> Self {
        use tokio_postgres::error::SqlState;

        if let Some(db_error) = err.as_db_error() {
            let message = db_error.message().to_string();
            if db_error.code() == &SqlState::DUPLICATE_COLUMN {
                return BackendError::duplicate_column(message);
            }
            return BackendError::statement(message);
        }
        if err.is_closed() {
            return BackendError::connection(err.to_string());
        }
        BackendError::statement(err.to_string())
    }
}
