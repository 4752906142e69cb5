//! `query` command

use std::path::PathBuf;

use autotable_core::{ConnectionProfile, ImportOptions, Importer};

use super::{read_file, read_stdin};
use crate::error::CliError;
use crate::output::print_json;

/// Arguments for the `query` command
pub struct QueryArgs {
    /// SQL given on the command line
    pub query: Option<String>,
    /// File holding the SQL
    pub file: Option<PathBuf>,
}

/// SQL from `-q`, else `-f`, else stdin
fn resolve_sql(args: &QueryArgs) -> Result<String, CliError> {
    let sql = match (&args.query, &args.file) {
        (Some(query), _) => query.clone(),
        (None, Some(file)) => read_file(file)?,
        (None, None) => read_stdin()?,
    };
    if sql.trim().is_empty() {
        return Err(CliError::EmptyQuery);
    }
    Ok(sql)
}

/// Handle the `query` command
pub fn handle_query(
    profile: &ConnectionProfile,
    args: &QueryArgs,
    pretty: bool,
) -> Result<(), CliError> {
    let sql = resolve_sql(args)?;
    let mut importer = Importer::connect(profile, ImportOptions::default())?;
    let rows = importer.query(&sql)?;
    print_json(&rows, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_inline_query_wins() {
        let args = QueryArgs {
            query: Some("SELECT 1".to_string()),
            file: Some(PathBuf::from("/does/not/exist.sql")),
        };
        assert_eq!(resolve_sql(&args).unwrap(), "SELECT 1");
    }

    #[test]
    fn test_query_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "SELECT 42 AS answer").unwrap();
        let args = QueryArgs {
            query: None,
            file: Some(file.path().to_path_buf()),
        };
        assert_eq!(resolve_sql(&args).unwrap(), "SELECT 42 AS answer");
    }

    #[test]
    fn test_missing_file_and_blank_query() {
        let args = QueryArgs {
            query: None,
            file: Some(PathBuf::from("/does/not/exist.sql")),
        };
        assert!(matches!(resolve_sql(&args), Err(CliError::ReadFile { .. })));

        let args = QueryArgs {
            query: Some("   ".to_string()),
            file: None,
        };
        assert!(matches!(resolve_sql(&args), Err(CliError::EmptyQuery)));
    }
}
