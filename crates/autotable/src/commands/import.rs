//! `import` command

use std::path::PathBuf;

use autotable_core::{
    ConnectionProfile, ImportOptions, Importer, InferenceMode, Record, parse_key_values,
    parse_records,
};

use super::{read_file, read_stdin};
use crate::error::CliError;
use crate::output::{print_import_summary, print_json};

/// Arguments for the `import` command
pub struct ImportArgs {
    /// Target table
    pub table: String,
    /// `key:value` pairs forming one record
    pub data: Vec<String>,
    /// JSON or JSONL file (stdin when absent)
    pub file: Option<PathBuf>,
    /// Rows per bulk insert
    pub batch_size: Option<usize>,
    /// Infer a new table from all records instead of the first
    pub infer_all: bool,
    /// VARCHAR length for new string columns
    pub string_limit: Option<u32>,
}

fn build_options(args: &ImportArgs) -> Result<ImportOptions, CliError> {
    let mut builder = ImportOptions::builder();
    if let Some(batch_size) = args.batch_size {
        builder = builder.batch_size(batch_size);
    }
    if args.infer_all {
        builder = builder.inference(InferenceMode::Union);
    }
    if let Some(limit) = args.string_limit {
        builder = builder.string_limit(limit);
    }
    Ok(builder.build()?)
}

/// Records from `--data`, else `--file`, else stdin
fn gather_records(args: &ImportArgs) -> Result<Vec<Record>, CliError> {
    if !args.data.is_empty() {
        return Ok(vec![parse_key_values(&args.data)?]);
    }
    let buffer = match &args.file {
        Some(file) => read_file(file)?,
        None => read_stdin()?,
    };
    Ok(parse_records(&buffer)?)
}

/// Handle the `import` command
pub fn handle_import(
    profile: &ConnectionProfile,
    args: &ImportArgs,
    pretty: bool,
) -> Result<(), CliError> {
    let options = build_options(args)?;
    let records = gather_records(args)?;

    let mut importer = Importer::connect(profile, options)?;
    let stats = importer.import(&args.table, &records)?;

    print_import_summary(&stats);
    print_json(&stats, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotable_core::FieldValue;
    use std::io::Write;

    fn args() -> ImportArgs {
        ImportArgs {
            table: "users".to_string(),
            data: Vec::new(),
            file: None,
            batch_size: None,
            infer_all: false,
            string_limit: None,
        }
    }

    #[test]
    fn test_build_options() {
        let options = build_options(&ImportArgs {
            batch_size: Some(50),
            infer_all: true,
            ..args()
        })
        .unwrap();
        assert_eq!(options.batch_size, 50);
        assert_eq!(options.inference, InferenceMode::Union);

        let err = build_options(&ImportArgs {
            batch_size: Some(0),
            ..args()
        });
        assert!(matches!(err, Err(CliError::Config(_))));
    }

    #[test]
    fn test_records_from_data_pairs() {
        let records = gather_records(&ImportArgs {
            data: vec!["name:Alice".to_string(), "age:30".to_string()],
            ..args()
        })
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name"), Some(&FieldValue::from("Alice")));
    }

    #[test]
    fn test_records_from_jsonl_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"name": "Alice"}}"#).unwrap();
        writeln!(file, r#"{{"name": "Bob"}}"#).unwrap();

        let records = gather_records(&ImportArgs {
            file: Some(file.path().to_path_buf()),
            ..args()
        })
        .unwrap();
        assert_eq!(records.len(), 2);
    }
}
