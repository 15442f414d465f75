//! Error types for Querybot.

use thiserror::Error;

/// Main error type for Querybot operations.
#[derive(Error, Debug)]
pub enum QuerybotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Chatbot is not connected to database")]
    NotConnected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors raised by the data-access collaborator.
///
/// The chatbot treats every variant as one failure class when executing
/// generated SQL; the distinction only matters for logs and for callers of
/// the schema source.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Connection is closed")]
    Closed,
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::Query(err.to_string())
    }
}

/// Reasons the query builder could not produce SQL for a request.
///
/// The display strings are user-facing and returned verbatim in chat responses.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Could not identify which table to query")]
    TableUnresolved,

    #[error("Could not identify which field to retrieve")]
    FieldUnresolved,

    #[error("Could not determine which field to filter")]
    FilterUnresolved,

    #[error("Could not extract numeric value")]
    ValueMissing,
}

/// Result type alias for Querybot operations.
pub type Result<T> = std::result::Result<T, QuerybotError>;
