//! Connection profiles and profile file lookup

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Profile used when none is named
pub const DEFAULT_PROFILE: &str = "default";

/// File name searched in the working directory and then the home directory
pub const CONFIG_FILE_NAME: &str = ".autotable.yml";

/// Adapter names accepted in the `adapter` key
const KNOWN_ADAPTERS: &[&str] = &["duckdb", "postgresql", "postgres"];

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "adapter", rename_all = "lowercase")]
pub enum ConnectionProfile {
    /// Embedded DuckDB database
    Duckdb {
        /// Database file path, or `:memory:`
        #[serde(default = "default_duckdb_database")]
        database: String,
    },
    /// PostgreSQL server
    #[serde(alias = "postgres")]
    Postgresql {
        #[serde(default = "default_host")]
        host: String,
        #[serde(default = "default_port")]
        port: u16,
        database: String,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password: Option<String>,
        /// Connect timeout in seconds
        #[serde(default)]
        connect_timeout: Option<u64>,
    },
}

fn default_duckdb_database() -> String {
    ":memory:".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

impl ConnectionProfile {
    /// In-memory DuckDB profile
    pub fn duckdb_memory() -> Self {
        ConnectionProfile::Duckdb {
            database: default_duckdb_database(),
        }
    }

    /// Canonical adapter name
    pub fn adapter_name(&self) -> &'static str {
        match self {
            ConnectionProfile::Duckdb { .. } => "duckdb",
            ConnectionProfile::Postgresql { .. } => "postgresql",
        }
    }

    /// Copy of the profile with the password masked, for display
    pub fn redacted(&self) -> Self {
        let mut profile = self.clone();
        if let ConnectionProfile::Postgresql {
            password: Some(password),
            ..
        } = &mut profile
        {
            *password = "********".to_string();
        }
        profile
    }

    /// Parse one profile out of a YAML value, checking the adapter first
    pub fn from_yaml(name: &str, value: serde_yaml::Value) -> Result<Self, ConfigError> {
        let adapter = match value.get("adapter") {
            Some(serde_yaml::Value::String(adapter)) => adapter.to_lowercase(),
            Some(_) => {
                return Err(ConfigError::InvalidProfile {
                    name: name.to_string(),
                    reason: "'adapter' must be a string".to_string(),
                });
            }
            None => {
                return Err(ConfigError::InvalidProfile {
                    name: name.to_string(),
                    reason: "missing 'adapter'".to_string(),
                });
            }
        };
        if !KNOWN_ADAPTERS.contains(&adapter.as_str()) {
            return Err(ConfigError::UnsupportedAdapter(adapter));
        }
        let adapter = if adapter == "postgres" {
            "postgresql".to_string()
        } else {
            adapter
        };

        let mut value = value;
        if let serde_yaml::Value::Mapping(map) = &mut value {
            map.insert("adapter".into(), adapter.into());
        }
        serde_yaml::from_value(value).map_err(|e| ConfigError::InvalidProfile {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Resolve the default profiles file: `./.autotable.yml` if present,
/// otherwise `~/.autotable.yml`
pub fn default_config_path() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    match dirs::home_dir() {
        Some(home) => home.join(CONFIG_FILE_NAME),
        None => local,
    }
}

/// Parse a profiles document (profile name -> settings) and pick one
pub fn parse_profile(
    contents: &str,
    name: &str,
    path: &Path,
) -> Result<ConnectionProfile, ConfigError> {
    let profiles: BTreeMap<String, serde_yaml::Value> =
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let value = profiles
        .get(name)
        .cloned()
        .ok_or_else(|| ConfigError::ProfileNotFound {
            name: name.to_string(),
            path: path.to_path_buf(),
        })?;

    ConnectionProfile::from_yaml(name, value)
}

/// Load a named profile from a YAML profiles file
pub fn load_profile(path: &Path, name: &str) -> Result<ConnectionProfile, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_profile(&contents, name, path)
}
