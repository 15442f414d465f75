//! Data access for the chatbot.
//!
//! This module provides:
//! - `SchemaSource` / `QueryExecutor` / `Database`: the contract the chatbot
//!   needs from a data store
//! - `SqliteDatabase`: read-only SQLite backend
//! - `UnavailableDatabase`: stand-in for a store that could not be opened

mod sqlite;
mod traits;
mod unavailable;

pub use sqlite::SqliteDatabase;
pub use traits::*;
pub use unavailable::UnavailableDatabase;

use crate::error::DatabaseError;
use std::path::Path;
use std::sync::Arc;

/// Open the existing database at `path` for querying.
pub fn open_database(path: &Path) -> Result<Arc<dyn Database>, DatabaseError> {
    Ok(Arc::new(SqliteDatabase::open(path)?))
}

/// Open the database at `path`, or fall back to an [`UnavailableDatabase`]
/// that reports the failure on every call.
pub fn open_database_or_unavailable(path: &Path) -> Arc<dyn Database> {
    open_database(path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Could not open database");
        Arc::new(UnavailableDatabase::new(e.to_string()))
    })
}
