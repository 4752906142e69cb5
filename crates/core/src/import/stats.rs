//! Import summary statistics

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Most error messages kept in [`ImportStats::errors`]
const MAX_ERRORS: usize = 100;

/// Statistics from one import call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    /// Target table
    pub table: String,
    /// Records handed to the importer
    pub records_received: usize,
    /// Rows written
    pub records_imported: usize,
    /// Records dropped (unknown fields)
    pub records_skipped: usize,
    /// Bulk inserts issued
    pub batches: usize,
    /// Whether the table was created by this call
    pub table_created: bool,
    /// Columns added by this call
    pub columns_added: Vec<String>,
    /// Number of per-record errors
    pub errors_count: usize,
    /// Per-record errors (limited to first 100)
    pub errors: Vec<String>,
    /// Wall time of the import
    #[serde(skip)]
    pub duration: Duration,
}

impl ImportStats {
    /// Create new empty stats for a table
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    /// Add an error (limited to 100)
    pub fn add_error(&mut self, error: String) {
        self.errors_count += 1;
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
    }

    /// Get records per second throughput
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.records_imported as f64 / secs
        }
    }

    /// Format duration as human-readable string
    pub fn duration_string(&self) -> String {
        let millis = self.duration.as_millis();
        let secs = self.duration.as_secs();
        if secs == 0 {
            format!("{}ms", millis)
        } else if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }
}
