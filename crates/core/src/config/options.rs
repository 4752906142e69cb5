//! Import options

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Default number of rows per bulk insert
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// How the columns of a new table are chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceMode {
    /// Columns come from the first record only; later fields are added
    /// one by one as they appear
    #[default]
    FirstRecord,
    /// Columns come from the union of all records' fields, each typed by
    /// its first non-null sample
    Union,
}

impl std::str::FromStr for InferenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" | "first_record" | "firstrecord" => Ok(InferenceMode::FirstRecord),
            "union" | "all" => Ok(InferenceMode::Union),
            _ => Err(format!(
                "Invalid inference mode: {}. Expected: first, union",
                s
            )),
        }
    }
}

/// Options for one importer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Rows per bulk insert
    pub batch_size: usize,
    /// Column selection for new tables
    pub inference: InferenceMode,
    /// VARCHAR length for newly created string columns; also the
    /// truncation length for string columns the catalog reports unbounded
    pub string_limit: Option<u32>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            inference: InferenceMode::FirstRecord,
            string_limit: None,
        }
    }
}

impl ImportOptions {
    /// Create a new builder for ImportOptions
    pub fn builder() -> ImportOptionsBuilder {
        ImportOptionsBuilder::default()
    }
}

/// Builder for ImportOptions
#[derive(Debug, Default)]
pub struct ImportOptionsBuilder {
    batch_size: Option<usize>,
    inference: Option<InferenceMode>,
    string_limit: Option<u32>,
}

impl ImportOptionsBuilder {
    /// Set the number of rows per bulk insert
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Set the inference mode for new tables
    pub fn inference(mut self, inference: InferenceMode) -> Self {
        self.inference = Some(inference);
        self
    }

    /// Set the VARCHAR length for new string columns
    pub fn string_limit(mut self, limit: u32) -> Self {
        self.string_limit = Some(limit);
        self
    }

    /// Build the ImportOptions
    pub fn build(self) -> Result<ImportOptions, ConfigError> {
        let batch_size = self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(ConfigError::InvalidOption(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.string_limit == Some(0) {
            return Err(ConfigError::InvalidOption(
                "string limit must be at least 1".to_string(),
            ));
        }

        Ok(ImportOptions {
            batch_size,
            inference: self.inference.unwrap_or_default(),
            string_limit: self.string_limit,
        })
    }
}
