//! CLI command implementations

pub mod catalog;
pub mod import;
pub mod info;
pub mod query;

use std::io::Read;
use std::path::Path;

use crate::error::CliError;

/// Read a whole file into a string
pub(crate) fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Read all of standard input
pub(crate) fn read_stdin() -> Result<String, CliError> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(CliError::Stdin)?;
    Ok(buffer)
}
