//! Error types for configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving a connection profile or import options
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file does not exist
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// No profile with the requested name
    #[error("Profile '{name}' not found in {path}")]
    ProfileNotFound { name: String, path: PathBuf },

    /// Profile is missing required keys or has malformed values
    #[error("Invalid profile '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },

    /// Profile names an adapter this build cannot talk to
    #[error("Unsupported adapter '{0}'")]
    UnsupportedAdapter(String),

    /// Import option out of range
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

impl ConfigError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::FileNotFound(path) => {
                format!(
                    "Config file not found: {}\n\n\
                    Hint: Create ./.autotable.yml or ~/.autotable.yml, or pass --config <path>.",
                    path.display()
                )
            }
            ConfigError::ProfileNotFound { name, path } => {
                format!(
                    "Profile '{name}' not found in {}\n\n\
                    Hint: Add a top-level '{name}:' entry or choose another profile with -p.",
                    path.display()
                )
            }
            ConfigError::InvalidProfile { name, reason } => {
                format!(
                    "Invalid profile '{name}': {reason}\n\n\
                    Hint: Every profile needs an 'adapter' key (duckdb or postgresql)."
                )
            }
            ConfigError::UnsupportedAdapter(adapter) => {
                format!(
                    "Unsupported adapter '{adapter}'\n\n\
                    Hint: Supported adapters are duckdb and postgresql \
                    (postgresql requires the postgres-backend feature)."
                )
            }
            _ => self.to_string(),
        }
    }
}
