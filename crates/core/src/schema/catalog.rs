//! Schema catalog adapter over a backend

use tracing::{debug, error, info};

use crate::backend::Backend;
use crate::error::ImportError;
use crate::inference::ColumnSpec;

use super::ddl::{AddColumn, CreateTable};
use super::TableSchema;

/// Reads table metadata and issues additive DDL
pub struct SchemaCatalog<'a> {
    backend: &'a mut dyn Backend,
}

impl<'a> SchemaCatalog<'a> {
    pub fn new(backend: &'a mut dyn Backend) -> Self {
        Self { backend }
    }

    pub fn table_exists(&mut self, table: &str) -> Result<bool, ImportError> {
        self.backend
            .table_exists(table)
            .map_err(|e| ImportError::backend(format!("failed to look up table '{table}'"), e))
    }

    /// Current columns in ordinal order
    pub fn columns(&mut self, table: &str) -> Result<Vec<ColumnSpec>, ImportError> {
        self.backend.columns(table).map_err(|e| {
            ImportError::backend(format!("failed to read columns of '{table}'"), e)
        })
    }

    /// Current columns as a schema
    pub fn schema(&mut self, table: &str) -> Result<TableSchema, ImportError> {
        Ok(TableSchema::new(table, self.columns(table)?))
    }

    /// Create a table with identity, the given columns and timestamps
    pub fn create_table(&mut self, table: &str, columns: &[ColumnSpec]) -> Result<(), ImportError> {
        let dialect = self.backend.dialect();
        for statement in CreateTable::new(table, columns).statements(dialect) {
            debug!(table, %statement, "Executing DDL");
            if let Err(source) = self.backend.execute_ddl(&statement) {
                error!(table, %statement, error = %source, "CREATE TABLE failed");
                return Err(ImportError::Schema {
                    table: table.to_string(),
                    statement,
                    source,
                });
            }
        }
        info!(table, columns = columns.len(), "Created table");
        Ok(())
    }

    /// Add one column
    ///
    /// Returns `false` when the backend reports the column already exists.
    pub fn add_column(&mut self, table: &str, column: &ColumnSpec) -> Result<bool, ImportError> {
        let statement = AddColumn::new(table, column).statement(self.backend.dialect());
        debug!(table, %statement, "Executing DDL");

        match self.backend.execute_ddl(&statement) {
            Ok(()) => {
                info!(
                    table,
                    column = %column.name,
                    column_type = %column.column_type,
                    "Added column"
                );
                Ok(true)
            }
            Err(e) if e.is_duplicate_column() => {
                debug!(table, column = %column.name, "Column already exists");
                Ok(false)
            }
            Err(source) => {
                error!(table, %statement, error = %source, "ADD COLUMN failed");
                Err(ImportError::Schema {
                    table: table.to_string(),
                    statement,
                    source,
                })
            }
        }
    }
}
