//! Orchestration tests against a recording backend
//!
//! Checks the properties that must hold regardless of the database:
//! validation before any backend call, batch failure isolation and
//! per-record recovery from unknown fields.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value, json};

use autotable_core::{
    Backend, BackendError, ColumnSpec, ColumnType, Dialect, FieldValue, ImportError,
    ImportOptions, Importer, Record,
};

/// Everything the fake backend saw
#[derive(Default)]
struct Calls {
    log: Vec<String>,
    inserts: Vec<usize>,
}

/// Backend with a fixed catalog; DDL is logged but changes nothing
struct RecordingBackend {
    calls: Rc<RefCell<Calls>>,
    columns: Option<Vec<ColumnSpec>>,
    fail_ddl: bool,
    fail_insert_on: Option<usize>,
}

impl RecordingBackend {
    fn new(calls: Rc<RefCell<Calls>>) -> Self {
        Self {
            calls,
            columns: Some(vec![
                ColumnSpec::new("id", ColumnType::Integer),
                ColumnSpec::new("name", ColumnType::String),
                ColumnSpec::new("created_at", ColumnType::Datetime),
                ColumnSpec::new("updated_at", ColumnType::Datetime),
            ]),
            fail_ddl: false,
            fail_insert_on: None,
        }
    }

    fn log(&self, entry: impl Into<String>) {
        self.calls.borrow_mut().log.push(entry.into());
    }
}

impl Backend for RecordingBackend {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn execute_ddl(&mut self, sql: &str) -> Result<(), BackendError> {
        self.log(format!("ddl {sql}"));
        if self.fail_ddl {
            return Err(BackendError::statement("permission denied"));
        }
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<Vec<Map<String, Value>>, BackendError> {
        self.log(format!("query {sql}"));
        Ok(Vec::new())
    }

    fn bulk_insert(
        &mut self,
        _table: &str,
        _columns: &[ColumnSpec],
        rows: &[Vec<FieldValue>],
    ) -> Result<usize, BackendError> {
        self.log("bulk_insert");
        let attempt = self.calls.borrow().inserts.len() + 1;
        if self.fail_insert_on == Some(attempt) {
            return Err(BackendError::statement("value too long"));
        }
        self.calls.borrow_mut().inserts.push(rows.len());
        Ok(rows.len())
    }

    fn tables(&mut self) -> Result<Vec<String>, BackendError> {
        self.log("tables");
        Ok(self.columns.iter().map(|_| "users".to_string()).collect())
    }

    fn table_exists(&mut self, table: &str) -> Result<bool, BackendError> {
        self.log(format!("table_exists {table}"));
        Ok(self.columns.is_some() && table == "users")
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnSpec>, BackendError> {
        self.log(format!("columns {table}"));
        Ok(self.columns.clone().unwrap_or_default())
    }

    fn advance_identity(&mut self, table: &str, column: &str) -> Result<bool, BackendError> {
        self.log(format!("advance_identity {table} {column}"));
        Ok(true)
    }
}

fn importer(backend: RecordingBackend, batch_size: usize) -> Importer {
    let options = ImportOptions::builder()
        .batch_size(batch_size)
        .build()
        .expect("Invalid options");
    Importer::with_backend(Box::new(backend), options)
}

fn names(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record::new().with("name", format!("user{i}")))
        .collect()
}

#[test]
fn test_validation_errors_make_no_backend_calls() {
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut importer = importer(RecordingBackend::new(calls.clone()), 10);

    let err = importer.import("users", &[]).unwrap_err();
    assert!(matches!(err, ImportError::Validation(_)));

    let err = importer
        .import_value("users", &json!("not a sequence"))
        .unwrap_err();
    assert!(matches!(err, ImportError::Validation(_)));

    let err = importer.import_value("users", &json!([])).unwrap_err();
    assert!(matches!(err, ImportError::Validation(_)));

    let err = importer
        .import_value("users", &json!([{"name": "a"}, 42]))
        .unwrap_err();
    assert!(matches!(err, ImportError::Validation(_)));

    let err = importer.import("  ", &names(1)).unwrap_err();
    assert!(matches!(err, ImportError::Validation(_)));

    assert!(calls.borrow().log.is_empty());
}

#[test]
fn test_failing_batch_aborts_remaining() {
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut backend = RecordingBackend::new(calls.clone());
    backend.fail_insert_on = Some(2);
    let mut importer = importer(backend, 2);

    let err = importer.import("users", &names(5)).unwrap_err();
    match err {
        ImportError::Backend { context, source } => {
            assert!(context.contains("batch 2 of 3"), "{context}");
            assert_eq!(source.message, "value too long");
        }
        other => panic!("Expected backend error, got {other:?}"),
    }

    let calls = calls.borrow();
    assert_eq!(calls.inserts, vec![2]);
    assert_eq!(
        calls.log.iter().filter(|e| *e == "bulk_insert").count(),
        2
    );
}

#[test]
fn test_unknown_field_skips_only_that_record() {
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut importer = importer(RecordingBackend::new(calls.clone()), 10);

    let records = vec![
        Record::new().with("name", "Alice"),
        Record::new().with("name", "Bob").with("nickname", "B"),
        Record::new().with("name", "Carol"),
    ];
    let stats = importer.import("users", &records).expect("Import failed");

    assert_eq!(stats.records_received, 3);
    assert_eq!(stats.records_imported, 2);
    assert_eq!(stats.records_skipped, 1);
    assert!(stats.errors[0].contains("nickname"), "{:?}", stats.errors);

    let calls = calls.borrow();
    let ddl: Vec<&String> = calls.log.iter().filter(|e| e.starts_with("ddl")).collect();
    assert_eq!(ddl.len(), 1);
    assert!(ddl[0].contains("ADD COLUMN \"nickname\" VARCHAR"));
}

#[test]
fn test_create_table_failure_is_schema_error() {
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut backend = RecordingBackend::new(calls.clone());
    backend.columns = None;
    backend.fail_ddl = true;
    let mut importer = importer(backend, 10);

    let err = importer.import("users", &names(1)).unwrap_err();
    match err {
        ImportError::Schema {
            table, statement, ..
        } => {
            assert_eq!(table, "users");
            assert!(statement.starts_with("CREATE TABLE \"users\""), "{statement}");
        }
        other => panic!("Expected schema error, got {other:?}"),
    }
    assert!(calls.borrow().inserts.is_empty());
}

#[test]
fn test_passthrough_operations() {
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut importer = importer(RecordingBackend::new(calls.clone()), 10);

    assert_eq!(importer.tables().unwrap(), vec!["users".to_string()]);
    assert_eq!(importer.columns("users").unwrap().len(), 4);
    assert!(importer.query("SELECT 1").unwrap().is_empty());
    assert_eq!(importer.options().batch_size, 10);

    assert_eq!(
        calls.borrow().log,
        vec!["tables", "columns users", "query SELECT 1"]
    );
}

#[test]
fn test_explicit_ids_advance_identity_sequence() {
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut importer = importer(RecordingBackend::new(calls.clone()), 10);

    let stats = importer
        .import_value("users", &json!([{"id": 7, "name": "a"}, {"Id": 9, "name": "b"}]))
        .expect("Import failed");
    assert_eq!(stats.records_imported, 2);
    assert_eq!(
        calls.borrow().log.last().map(String::as_str),
        Some("advance_identity users id")
    );

    calls.borrow_mut().log.clear();
    importer
        .import_value("users", &json!([{"id": 10, "name": "c"}, {"name": "d"}]))
        .expect("Import failed");
    assert!(
        !calls
            .borrow()
            .log
            .iter()
            .any(|e| e.starts_with("advance_identity"))
    );
}
