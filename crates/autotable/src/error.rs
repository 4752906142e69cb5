//! CLI error type

use std::path::PathBuf;

use autotable_core::{ConfigError, ImportError};
use thiserror::Error;

/// Errors surfaced by the `autotable` binary
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("No SQL to run")]
    EmptyQuery,

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            CliError::Import(err) => err.user_message(),
            CliError::Config(err) => err.user_message(),
            CliError::ReadFile { path, source } => {
                format!(
                    "Failed to read {}: {source}\n\nHint: Check that the file exists and is readable.",
                    path.display()
                )
            }
            CliError::EmptyQuery => "No SQL to run.\n\n\
                Hint: Pass -q \"SELECT ...\", -f query.sql, or pipe SQL on stdin."
                .to_string(),
            _ => self.to_string(),
        }
    }
}
