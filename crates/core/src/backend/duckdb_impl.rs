//! Embedded DuckDB backend

use chrono::{DateTime, NaiveDate};
use duckdb::types::{TimeUnit, Value as DuckValue};
use serde_json::{Map, Value};

use crate::inference::{ColumnSpec, ColumnType};
use crate::record::{FieldValue, TIMESTAMP_FORMAT};
use crate::schema::quote_ident;

use super::{Backend, BackendError, Dialect};

/// DuckDB database, on disk or in memory
pub struct DuckDbBackend {
    conn: duckdb::Connection,
    path: Option<String>,
}

impl DuckDbBackend {
    /// Open or create a database file; `:memory:` opens an in-memory one
    pub fn open(path: &str) -> Result<Self, BackendError> {
        if path == ":memory:" {
            return Self::memory();
        }
        let conn = duckdb::Connection::open(path)
            .map_err(|e| BackendError::connection(e.to_string()))?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database
    pub fn memory() -> Result<Self, BackendError> {
        let conn = duckdb::Connection::open_in_memory()
            .map_err(|e| BackendError::connection(e.to_string()))?;
        Ok(Self { conn, path: None })
    }

    /// Get the database path (if not in-memory)
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl Backend for DuckDbBackend {
    fn dialect(&self) -> Dialect {
        Dialect::DuckDb
    }

    fn execute_ddl(&mut self, sql: &str) -> Result<(), BackendError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<Vec<Map<String, Value>>, BackendError> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;

        // Column names are only available once the statement has run
        let column_count = rows.as_ref().map(|r| r.column_count()).unwrap_or(0);
        let column_names: Vec<String> = (0..column_count)
            .map(|i| {
                rows.as_ref()
                    .and_then(|r| r.column_name(i).ok())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("col{}", i))
            })
            .collect();

        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut obj = Map::new();
            for (i, name) in column_names.iter().enumerate() {
                let value: DuckValue = row.get(i)?;
                obj.insert(name.clone(), duck_value_to_json(value));
            }
            results.push(obj);
        }

        Ok(results)
    }

    fn bulk_insert(
        &mut self,
        table: &str,
        columns: &[ColumnSpec],
        rows: &[Vec<FieldValue>],
    ) -> Result<usize, BackendError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let column_list = columns
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            column_list,
            placeholders
        );

        // Dropping the transaction without commit rolls it back
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                stmt.execute(duckdb::params_from_iter(row.iter().map(field_to_duck)))?;
            }
        }
        tx.commit()?;

        Ok(rows.len())
    }

    fn tables(&mut self) -> Result<Vec<String>, BackendError> {
        let mut stmt = self.conn.prepare(
            "SELECT table_name FROM information_schema.tables
             WHERE table_schema = 'main' AND table_type = 'BASE TABLE'
             ORDER BY table_name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tables = Vec::new();
        for row in rows {
            tables.push(row?);
        }
        Ok(tables)
    }

    // Table names resolve case-insensitively in DuckDB, quoted or not
    fn table_exists(&mut self, table: &str) -> Result<bool, BackendError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables
             WHERE table_schema = 'main' AND lower(table_name) = lower(?)",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnSpec>, BackendError> {
        let mut stmt = self.conn.prepare(
            "SELECT column_name, data_type, character_maximum_length
             FROM information_schema.columns
             WHERE table_schema = 'main' AND lower(table_name) = lower(?)
             ORDER BY ordinal_position",
        )?;
        let rows = stmt.query_map([table], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<i64>>(2)?,
            ))
        })?;

        let mut columns = Vec::new();
        for row in rows {
            let (name, data_type, max_length) = row?;
            let limit = max_length.and_then(|n| u32::try_from(n).ok());
            columns.push(
                ColumnSpec::new(name, ColumnType::from_sql_type(&data_type))
                    .with_limit(limit)
                    .with_sql_type(data_type),
            );
        }
        Ok(columns)
    }
}

fn field_to_duck(value: &FieldValue) -> DuckValue {
    match value {
        FieldValue::Null => DuckValue::Null,
        FieldValue::Boolean(b) => DuckValue::Boolean(*b),
        FieldValue::Integer(n) => DuckValue::BigInt(*n),
        FieldValue::Float(f) => DuckValue::Double(*f),
        FieldValue::String(s) => DuckValue::Text(s.clone()),
        FieldValue::Timestamp(ts) => {
            DuckValue::Timestamp(TimeUnit::Microsecond, ts.and_utc().timestamp_micros())
        }
        FieldValue::Composite(v) => DuckValue::Text(v.to_string()),
    }
}

fn timestamp_to_json(unit: TimeUnit, raw: i64) -> Value {
    let micros = match unit {
        TimeUnit::Second => raw.saturating_mul(1_000_000),
        TimeUnit::Millisecond => raw.saturating_mul(1_000),
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    };
    match DateTime::from_timestamp_micros(micros) {
        Some(dt) => Value::String(dt.naive_utc().format(TIMESTAMP_FORMAT).to_string()),
        None => Value::Null,
    }
}

fn duck_value_to_json(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(n) => Value::Number(n.into()),
        DuckValue::SmallInt(n) => Value::Number(n.into()),
        DuckValue::Int(n) => Value::Number(n.into()),
        DuckValue::BigInt(n) => Value::Number(n.into()),
        DuckValue::UTinyInt(n) => Value::Number(n.into()),
        DuckValue::USmallInt(n) => Value::Number(n.into()),
        DuckValue::UInt(n) => Value::Number(n.into()),
        DuckValue::UBigInt(n) => Value::Number(n.into()),
        DuckValue::HugeInt(n) => match i64::try_from(n) {
            Ok(n) => Value::Number(n.into()),
            Err(_) => Value::String(n.to_string()),
        },
        DuckValue::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        DuckValue::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        DuckValue::Text(s) => Value::String(s),
        DuckValue::Timestamp(unit, raw) => timestamp_to_json(unit, raw),
        DuckValue::Date32(days) => NaiveDate::from_num_days_from_ce_opt(days + 719_163)
            .map(|d| Value::String(d.to_string()))
            .unwrap_or(Value::Null),
        other => Value::String(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_memory_backend_catalog() {
        let mut db = DuckDbBackend::memory().unwrap();
        assert!(db.path().is_none());
        db.execute_ddl("CREATE TABLE people (name VARCHAR, age BIGINT, seen TIMESTAMP)")
            .unwrap();

        assert!(db.table_exists("people").unwrap());
        assert!(db.table_exists("People").unwrap());
        assert!(!db.table_exists("missing").unwrap());
        assert_eq!(db.tables().unwrap(), vec!["people".to_string()]);

        let columns = db.columns("people").unwrap();
        let types: Vec<ColumnType> = columns.iter().map(|c| c.column_type).collect();
        assert_eq!(
            types,
            vec![ColumnType::String, ColumnType::Integer, ColumnType::Datetime]
        );
        assert_eq!(columns[0].sql_type.as_deref(), Some("VARCHAR"));
        assert_eq!(db.columns("PEOPLE").unwrap(), columns);
    }

    #[test]
    fn test_bulk_insert_and_query() {
        let mut db = DuckDbBackend::memory().unwrap();
        db.execute_ddl("CREATE TABLE t (name VARCHAR, n BIGINT, ok BOOLEAN, seen TIMESTAMP)")
            .unwrap();
        let columns = db.columns("t").unwrap();
        let seen =
            NaiveDateTime::parse_from_str("2024-12-25 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();

        let inserted = db
            .bulk_insert(
                "t",
                &columns,
                &[
                    vec!["a".into(), 1i64.into(), true.into(), seen.into()],
                    vec![FieldValue::Null, 2i64.into(), false.into(), FieldValue::Null],
                ],
            )
            .unwrap();
        assert_eq!(inserted, 2);

        let rows = db.query("SELECT * FROM t ORDER BY n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "a");
        assert_eq!(rows[0]["n"], 1);
        assert_eq!(rows[0]["ok"], true);
        assert_eq!(rows[0]["seen"], "2024-12-25 10:00:00");
        assert!(rows[1]["name"].is_null());
    }

    #[test]
    fn test_failed_insert_rolls_back() {
        let mut db = DuckDbBackend::memory().unwrap();
        db.execute_ddl("CREATE TABLE t (n BIGINT)").unwrap();
        let columns = db.columns("t").unwrap();

        let result = db.bulk_insert(
            "t",
            &columns,
            &[vec![1i64.into()], vec!["not a number".into()]],
        );
        assert!(result.is_err());

        let rows = db.query("SELECT COUNT(*) AS n FROM t").unwrap();
        assert_eq!(rows[0]["n"], 0);
    }

    #[test]
    fn test_duplicate_column_is_classified() {
        let mut db = DuckDbBackend::memory().unwrap();
        db.execute_ddl("CREATE TABLE t (a VARCHAR)").unwrap();
        let err = db
            .execute_ddl("ALTER TABLE t ADD COLUMN a VARCHAR")
            .unwrap_err();
        assert!(err.is_duplicate_column(), "{err}");
    }
}
