//! Connection profiles and import options
//!
//! Profiles live in a YAML file keyed by profile name:
//!
//! ```yaml
//! default:
//!   adapter: duckdb
//!   database: ./data.duckdb
//! warehouse:
//!   adapter: postgresql
//!   host: localhost
//!   database: analytics
//!   username: loader
//! ```

mod error;
mod options;
mod profile;

pub use error::ConfigError;
pub use options::{DEFAULT_BATCH_SIZE, ImportOptions, ImportOptionsBuilder, InferenceMode};
pub use profile::{
    CONFIG_FILE_NAME, ConnectionProfile, DEFAULT_PROFILE, default_config_path, load_profile,
    parse_profile,
};
