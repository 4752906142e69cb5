//! Chunked bulk insertion

use tracing::{debug, error};

use crate::backend::Backend;
use crate::config::DEFAULT_BATCH_SIZE;
use crate::error::ImportError;
use crate::inference::ColumnSpec;

use super::registry::Row;

/// Longest first-row preview written to the log
const PREVIEW_LIMIT: usize = 200;

/// Outcome of a successful [`BatchImporter::import_batches`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub rows_inserted: usize,
    pub batches: usize,
}

/// Splits rows into fixed-size chunks, one bulk insert per chunk
#[derive(Debug, Clone, Copy)]
pub struct BatchImporter {
    batch_size: usize,
}

impl Default for BatchImporter {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl BatchImporter {
    /// A batch size of 0 is treated as 1
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Insert rows chunk by chunk, in order
    ///
    /// The first failing chunk stops the import; chunks before it stay
    /// committed.
    pub fn import_batches(
        &self,
        backend: &mut dyn Backend,
        table: &str,
        columns: &[ColumnSpec],
        rows: &[Row],
    ) -> Result<BatchReport, ImportError> {
        let total = rows.len().div_ceil(self.batch_size);
        let mut report = BatchReport::default();

        for (index, chunk) in rows.chunks(self.batch_size).enumerate() {
            let batch = index + 1;
            match backend.bulk_insert(table, columns, chunk) {
                Ok(inserted) => {
                    debug!(table, batch, rows = inserted, "Inserted batch");
                    report.rows_inserted += inserted;
                    report.batches += 1;
                }
                Err(source) => {
                    let first_row = preview(columns, &chunk[0]);
                    error!(
                        table,
                        batch,
                        rows = chunk.len(),
                        %first_row,
                        error = %source,
                        "Bulk insert failed"
                    );
                    return Err(ImportError::backend(
                        format!(
                            "bulk insert into '{table}' failed at batch {batch} of {total} ({} rows)",
                            chunk.len()
                        ),
                        source,
                    ));
                }
            }
        }

        Ok(report)
    }
}

/// `{"col": value, ...}` rendering of a row, cut at [`PREVIEW_LIMIT`] chars
fn preview(columns: &[ColumnSpec], row: &Row) -> String {
    let object: serde_json::Map<String, serde_json::Value> = columns
        .iter()
        .zip(row)
        .map(|(column, value)| (column.name.clone(), value.to_json()))
        .collect();
    let text = serde_json::Value::Object(object).to_string();
    match text.char_indices().nth(PREVIEW_LIMIT) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text,
    }
}
