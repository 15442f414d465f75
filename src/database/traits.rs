//! Data access trait definitions.

use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;

/// One result row: column name to value, in select-list order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Description of one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub field: String,
    /// Declared type, empty when the store has none
    pub data_type: String,
    /// Whether NULL is allowed
    pub nullable: bool,
    /// Whether the column is part of the primary key
    pub primary_key: bool,
}

impl ColumnDescriptor {
    /// Create a nullable, untyped, non-key column.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            data_type: String::new(),
            nullable: true,
            primary_key: false,
        }
    }
}

/// Schema introspection.
pub trait SchemaSource: Send + Sync {
    /// Names of all user tables.
    fn list_tables(&self) -> Result<Vec<String>, DatabaseError>;

    /// Columns of `table` in declaration order.
    fn describe_table(&self, table: &str) -> Result<Vec<ColumnDescriptor>, DatabaseError>;
}

/// Execution of read queries.
pub trait QueryExecutor: Send + Sync {
    /// Run `sql` and collect every row.
    fn execute(&self, sql: &str) -> Result<Vec<Row>, DatabaseError>;
}

/// A connected data store.
pub trait Database: SchemaSource + QueryExecutor {
    /// Release the connection. Later calls fail with [`DatabaseError::Closed`].
    fn close(&self) -> Result<(), DatabaseError>;

    /// Whether the connection is still open.
    fn is_open(&self) -> bool;
}
