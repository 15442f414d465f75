//! SQLite backend.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::Value;

use super::traits::{ColumnDescriptor, Database, QueryExecutor, Row, SchemaSource};
use crate::error::DatabaseError;

/// A SQLite connection shared behind a mutex.
pub struct SqliteDatabase {
    conn: Mutex<Option<Connection>>,
}

impl std::fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDatabase")
            .field("open", &self.is_open())
            .finish()
    }
}

impl SqliteDatabase {
    /// Open the existing database file at `path` read-only.
    ///
    /// A missing file is a connection error; nothing is created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| DatabaseError::Connection(format!("{}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), "Opened SQLite database read-only");
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn =
            Connection::open_in_memory().map_err(|e| DatabaseError::Connection(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    /// Run a batch of statements, e.g. schema setup or fixtures.
    pub fn execute_batch(&self, sql: &str) -> Result<(), DatabaseError> {
        self.with_connection(|conn| Ok(conn.execute_batch(sql)?))
    }

    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        let guard = self.conn.lock();
        let conn = guard.as_ref().ok_or(DatabaseError::Closed)?;
        f(conn)
    }
}

impl SchemaSource for SqliteDatabase {
    fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
                 ORDER BY name",
            )?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    fn describe_table(&self, table: &str) -> Result<Vec<ColumnDescriptor>, DatabaseError> {
        self.with_connection(|conn| {
            let sql = format!("PRAGMA table_info({})", quote_identifier(table));
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| {
                Ok(ColumnDescriptor {
                    field: row.get(1)?,
                    data_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    nullable: row.get::<_, i64>(3)? == 0,
                    primary_key: row.get::<_, i64>(5)? > 0,
                })
            })?;
            let columns = rows.collect::<Result<Vec<_>, _>>()?;

            if columns.is_empty() {
                return Err(DatabaseError::Query(format!("no such table: {table}")));
            }
            Ok(columns)
        })
    }
}

impl QueryExecutor for SqliteDatabase {
    fn execute(&self, sql: &str) -> Result<Vec<Row>, DatabaseError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

            let mut rows = stmt.query([])?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                let mut record = Row::new();
                for (i, name) in names.iter().enumerate() {
                    record.insert(name.clone(), to_json(row.get_ref(i)?));
                }
                results.push(record);
            }
            Ok(results)
        })
    }
}

impl Database for SqliteDatabase {
    fn close(&self) -> Result<(), DatabaseError> {
        if let Some(conn) = self.conn.lock().take() {
            conn.close()
                .map_err(|(_, e)| DatabaseError::Connection(e.to_string()))?;
            tracing::info!("Database connection closed");
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.conn.lock().is_some()
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(bytes.iter().map(|b| format!("{b:02x}")).collect()),
    }
}
