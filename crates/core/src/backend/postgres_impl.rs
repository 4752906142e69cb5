//! PostgreSQL backend
//!
//! The async `tokio-postgres` client is driven on a private current-thread
//! runtime so the backend exposes the same blocking interface as DuckDB.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tokio::runtime::Runtime;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, NoTls, Row};
use tracing::error;

use crate::config::ConnectionProfile;
use crate::inference::{ColumnSpec, ColumnType};
use crate::record::{FieldValue, TIMESTAMP_FORMAT};
use crate::schema::quote_ident;

use super::{Backend, BackendError, Dialect};

/// PostgreSQL connection with its own runtime
pub struct PostgresBackend {
    runtime: Runtime,
    client: Client,
}

impl PostgresBackend {
    /// Connect using a `postgresql` profile
    pub fn connect(profile: &ConnectionProfile) -> Result<Self, BackendError> {
        let ConnectionProfile::Postgresql {
            host,
            port,
            database,
            username,
            password,
            connect_timeout,
        } = profile
        else {
            return Err(BackendError::connection(format!(
                "profile uses the {} adapter",
                profile.adapter_name()
            )));
        };

        let mut config = tokio_postgres::Config::new();
        config.host(host).port(*port).dbname(database);
        if let Some(username) = username {
            config.user(username);
        }
        if let Some(password) = password {
            config.password(password);
        }
        if let Some(seconds) = connect_timeout {
            config.connect_timeout(Duration::from_secs(*seconds));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BackendError::connection(e.to_string()))?;

        let client = runtime.block_on(async {
            let (client, connection) = config
                .connect(NoTls)
                .await
                .map_err(|e| BackendError::connection(e.to_string()))?;

            // Spawn connection handler
            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    error!(error = %e, "PostgreSQL connection error");
                }
            });

            Ok::<_, BackendError>(client)
        })?;

        Ok(Self { runtime, client })
    }
}

impl Backend for PostgresBackend {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn execute_ddl(&mut self, sql: &str) -> Result<(), BackendError> {
        let client = &self.client;
        self.runtime.block_on(client.batch_execute(sql))?;
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<Vec<Map<String, Value>>, BackendError> {
        let client = &self.client;
        let rows = self.runtime.block_on(client.query(sql, &[]))?;
        Ok(rows.iter().map(row_to_json).collect())
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

        // Every value is sent as text and cast to the column's declared type
        let column_list = columns
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("${}::text::{}", i + 1, cast_type(c)))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            column_list,
            placeholders
        );

        let client = &mut self.client;
        let runtime = &self.runtime;
        runtime.block_on(async move {
            // Dropping the transaction without commit rolls it back
            let tx = client.transaction().await?;
            let stmt = tx.prepare(&sql).await?;
            for row in rows {
                let values: Vec<Option<String>> = row.iter().map(FieldValue::to_sql_text).collect();
                let params: Vec<&(dyn ToSql + Sync)> = values
                    .iter()
                    .map(|v| v as &(dyn ToSql + Sync))
                    .collect();
                tx.execute(&stmt, &params).await?;
            }
            tx.commit().await?;
            Ok::<_, BackendError>(())
        })?;

        Ok(rows.len())
    }

    fn tables(&mut self) -> Result<Vec<String>, BackendError> {
        let client = &self.client;
        let rows = self.runtime.block_on(client.query(
            "SELECT table_name::text FROM information_schema.tables
             WHERE table_schema = current_schema() AND table_type = 'BASE TABLE'
             ORDER BY table_name",
            &[],
        ))?;
        Ok(rows.iter().map(|r| r.get::<_, String>(0)).collect())
    }

    fn table_exists(&mut self, table: &str) -> Result<bool, BackendError> {
        let client = &self.client;
        let row = self.runtime.block_on(client.query_opt(
            "SELECT 1 FROM information_schema.tables
             WHERE table_schema = current_schema() AND table_name = $1",
            &[&table],
        ))?;
        Ok(row.is_some())
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnSpec>, BackendError> {
        let client = &self.client;
        let rows = self.runtime.block_on(client.query(
            "SELECT column_name::text, udt_name::text, character_maximum_length::int4
             FROM information_schema.columns
             WHERE table_schema = current_schema() AND table_name = $1
             ORDER BY ordinal_position",
            &[&table],
        ))?;

        Ok(rows
            .iter()
            .map(|row| {
                let name: String = row.get(0);
                let udt_name: String = row.get(1);
                let max_length: Option<i32> = row.get(2);
                ColumnSpec::new(name, ColumnType::from_sql_type(&udt_name))
                    .with_limit(max_length.and_then(|n| u32::try_from(n).ok()))
                    .with_sql_type(udt_name)
            })
            .collect())
    }

    fn advance_identity(&mut self, table: &str, column: &str) -> Result<bool, BackendError> {
        let sql = advance_identity_sql(table, column);
        let quoted_table = quote_ident(table);
        let client = &self.client;
        self.runtime
            .block_on(client.execute(&sql, &[&quoted_table, &column]))?;
        Ok(true)
    }
}

/// `setval` moving a serial column's sequence past its largest value
///
/// Takes the quoted table name as `$1` and the raw column name as `$2`.
fn advance_identity_sql(table: &str, column: &str) -> String {
    format!(
        "SELECT setval(pg_get_serial_sequence($1, $2), \
         COALESCE((SELECT MAX({}) FROM {}), 0) + 1, false)",
        quote_ident(column),
        quote_ident(table)
    )
}

/// Type used in the `$n::text::<type>` cast of an insert parameter
fn cast_type(column: &ColumnSpec) -> String {
    match &column.sql_type {
        Some(sql_type) => quote_ident(sql_type),
        None => Dialect::Postgres.column_type_sql(&ColumnSpec {
            limit: None,
            ..column.clone()
        }),
    }
}

fn number(f: f64) -> Value {
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn cell_to_json(row: &Row, i: usize, ty: &Type) -> Value {
    let value = match *ty {
        Type::BOOL => row.try_get::<_, Option<bool>>(i).map(|v| v.map(Value::Bool)),
        Type::INT2 => row
            .try_get::<_, Option<i16>>(i)
            .map(|v| v.map(|n| Value::Number(n.into()))),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(i)
            .map(|v| v.map(|n| Value::Number(n.into()))),
        Type::INT8 => row
            .try_get::<_, Option<i64>>(i)
            .map(|v| v.map(|n| Value::Number(n.into()))),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(i)
            .map(|v| v.map(|f| number(f as f64))),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(i).map(|v| v.map(number)),
        Type::TIMESTAMP => row.try_get::<_, Option<NaiveDateTime>>(i).map(|v| {
            v.map(|ts| Value::String(ts.format(TIMESTAMP_FORMAT).to_string()))
        }),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(i)
            .map(|v| v.map(|ts| Value::String(ts.to_rfc3339()))),
        Type::DATE => row
            .try_get::<_, Option<NaiveDate>>(i)
            .map(|v| v.map(|d| Value::String(d.to_string()))),
        Type::JSON | Type::JSONB => row.try_get::<_, Option<Value>>(i),
        _ => row.try_get::<_, Option<String>>(i).map(|v| v.map(Value::String)),
    };
    value.ok().flatten().unwrap_or(Value::Null)
}

fn row_to_json(row: &Row) -> Map<String, Value> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, column)| (column.name().to_string(), cell_to_json(row, i, column.type_())))
        .collect()
}
