//! Structured DDL builders rendered per dialect

use crate::backend::Dialect;
use crate::inference::{ColumnSpec, ColumnType};

use super::{CREATED_AT, ID_COLUMN, UPDATED_AT};

/// Quote an identifier with double quotes, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Name of the DuckDB sequence backing a table's identity column
///
/// Restricted to `[a-z0-9_]` so it can sit inside a string literal.
pub fn sequence_name(table: &str) -> String {
    let base: String = table
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{base}_{ID_COLUMN}_seq")
}

fn column_definition(dialect: Dialect, column: &ColumnSpec) -> String {
    format!(
        "{} {}",
        quote_ident(&column.name),
        dialect.column_type_sql(column)
    )
}

fn is_managed_column(name: &str) -> bool {
    name.eq_ignore_ascii_case(ID_COLUMN) || name == CREATED_AT || name == UPDATED_AT
}

/// `CREATE TABLE` with identity, the given columns and timestamps
#[derive(Debug, Clone)]
pub struct CreateTable<'a> {
    pub table: &'a str,
    pub columns: &'a [ColumnSpec],
}

impl<'a> CreateTable<'a> {
    pub fn new(table: &'a str, columns: &'a [ColumnSpec]) -> Self {
        Self { table, columns }
    }

    /// Statements to run in order
    ///
    /// Columns named `id`, `created_at` or `updated_at` in the input are
    /// ignored; the table always gets its own identity and trailing
    /// timestamp columns.
    pub fn statements(&self, dialect: Dialect) -> Vec<String> {
        let mut statements = Vec::new();
        let mut definitions = Vec::with_capacity(self.columns.len() + 3);

        match dialect {
            Dialect::DuckDb => {
                // No PRIMARY KEY: DuckDB rejects ADD COLUMN on indexed tables
                let sequence = sequence_name(self.table);
                statements.push(format!(
                    "CREATE SEQUENCE IF NOT EXISTS {}",
                    quote_ident(&sequence)
                ));
                definitions.push(format!(
                    "{} BIGINT DEFAULT nextval('{}')",
                    quote_ident(ID_COLUMN),
                    sequence
                ));
            }
            Dialect::Postgres => {
                definitions.push(format!("{} BIGSERIAL PRIMARY KEY", quote_ident(ID_COLUMN)));
            }
        }

        definitions.extend(
            self.columns
                .iter()
                .filter(|c| !is_managed_column(&c.name))
                .map(|c| column_definition(dialect, c)),
        );
        for name in [CREATED_AT, UPDATED_AT] {
            definitions.push(column_definition(
                dialect,
                &ColumnSpec::new(name, ColumnType::Datetime),
            ));
        }

        statements.push(format!(
            "CREATE TABLE {} ({})",
            quote_ident(self.table),
            definitions.join(", ")
        ));
        statements
    }
}

/// `ALTER TABLE ... ADD COLUMN` for exactly one column
#[derive(Debug, Clone)]
pub struct AddColumn<'a> {
    pub table: &'a str,
    pub column: &'a ColumnSpec,
}

impl<'a> AddColumn<'a> {
    pub fn new(table: &'a str, column: &'a ColumnSpec) -> Self {
        Self { table, column }
    }

    pub fn statement(&self, dialect: Dialect) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            quote_ident(self.table),
            column_definition(dialect, self.column)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("name", ColumnType::String),
            ColumnSpec::new("age", ColumnType::Integer),
            ColumnSpec::new("created_at", ColumnType::String),
        ]
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("users"), "\"users\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_sequence_name() {
        assert_eq!(sequence_name("users"), "users_id_seq");
        assert_eq!(sequence_name("My Table"), "my_table_id_seq");
        assert_eq!(sequence_name("o'brien"), "o_brien_id_seq");
    }

    #[test]
    fn test_create_table_duckdb() {
        let columns = columns();
        let statements = CreateTable::new("users", &columns).statements(Dialect::DuckDb);

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], "CREATE SEQUENCE IF NOT EXISTS \"users_id_seq\"");
        assert_eq!(
            statements[1],
            "CREATE TABLE \"users\" (\"id\" BIGINT DEFAULT nextval('users_id_seq'), \
             \"name\" VARCHAR, \"age\" BIGINT, \"created_at\" TIMESTAMP, \"updated_at\" TIMESTAMP)"
        );
    }

    #[test]
    fn test_create_table_postgres() {
        let columns = columns();
        let statements = CreateTable::new("users", &columns).statements(Dialect::Postgres);

        assert_eq!(
            statements,
            vec![
                "CREATE TABLE \"users\" (\"id\" BIGSERIAL PRIMARY KEY, \"name\" VARCHAR, \
                 \"age\" BIGINT, \"created_at\" TIMESTAMP, \"updated_at\" TIMESTAMP)"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_add_column() {
        let column = ColumnSpec::new("email", ColumnType::String).with_limit(Some(255));
        assert_eq!(
            AddColumn::new("users", &column).statement(Dialect::Postgres),
            "ALTER TABLE \"users\" ADD COLUMN \"email\" VARCHAR(255)"
        );
    }
}
