//! Placeholder for a database that could not be opened.

use super::traits::{ColumnDescriptor, Database, QueryExecutor, Row, SchemaSource};
use crate::error::DatabaseError;

/// A database handle that never connected.
///
/// Every call fails with the original connection error, and the handle
/// reports itself closed so a chatbot built on it stays disconnected.
#[derive(Debug, Clone)]
pub struct UnavailableDatabase {
    reason: String,
}

impl UnavailableDatabase {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the database could not be opened.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn error(&self) -> DatabaseError {
        DatabaseError::Connection(self.reason.clone())
    }
}

impl SchemaSource for UnavailableDatabase {
    fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        Err(self.error())
    }

    fn describe_table(&self, _table: &str) -> Result<Vec<ColumnDescriptor>, DatabaseError> {
        Err(self.error())
    }
}

impl QueryExecutor for UnavailableDatabase {
    fn execute(&self, _sql: &str) -> Result<Vec<Row>, DatabaseError> {
        Err(self.error())
    }
}

impl Database for UnavailableDatabase {
    fn close(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn is_open(&self) -> bool {
        false
    }
}
