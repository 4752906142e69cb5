//! Output formatting for CLI

use autotable_core::ImportStats;
use serde::Serialize;

use crate::error::CliError;

/// Print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<(), CliError> {
    println!("{}", render_json(value, pretty)?);
    Ok(())
}

fn render_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// Human-readable import summary, written to stderr
pub fn print_import_summary(stats: &ImportStats) {
    eprintln!("{}", import_summary(stats));
}

fn import_summary(stats: &ImportStats) -> String {
    let mut lines = vec![format!(
        "Imported {} of {} records into '{}' ({} batches, {}, {:.0} records/s)",
        stats.records_imported,
        stats.records_received,
        stats.table,
        stats.batches,
        stats.duration_string(),
        stats.throughput()
    )];
    if stats.table_created {
        lines.push(format!("  Created table '{}'", stats.table));
    }
    if !stats.columns_added.is_empty() {
        lines.push(format!("  Added columns: {}", stats.columns_added.join(", ")));
    }
    if stats.records_skipped > 0 {
        lines.push(format!("  Skipped {} records:", stats.records_skipped));
        for error in &stats.errors {
            lines.push(format!("    {error}"));
        }
        if stats.errors_count > stats.errors.len() {
            lines.push(format!(
                "    ... and {} more",
                stats.errors_count - stats.errors.len()
            ));
        }
    }
    lines.join("\n")
}
