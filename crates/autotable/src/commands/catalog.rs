//! `tables` and `columns` commands

use autotable_core::{ConnectionProfile, ImportOptions, Importer};

use crate::error::CliError;
use crate::output::print_json;

/// Arguments for the `columns` command
pub struct ColumnsArgs {
    pub table: String,
}

/// Handle the `tables` command
pub fn handle_tables(profile: &ConnectionProfile, pretty: bool) -> Result<(), CliError> {
    let mut importer = Importer::connect(profile, ImportOptions::default())?;
    print_json(&importer.tables()?, pretty)
}

/// Handle the `columns` command
pub fn handle_columns(
    profile: &ConnectionProfile,
    args: &ColumnsArgs,
    pretty: bool,
) -> Result<(), CliError> {
    let mut importer = Importer::connect(profile, ImportOptions::default())?;
    print_json(&importer.columns(&args.table)?, pretty)
}
