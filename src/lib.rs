//! Querybot: natural language questions answered with SQL.
//!
//! Requests are normalized, classified into an intent, resolved against a
//! snapshot of the database schema with fuzzy name matching, and turned into
//! a single `SELECT` statement. The chatbot runs the statement and summarizes
//! the rows; the REST API and CLI expose it.

pub mod api;
pub mod chatbot;
pub mod config;
pub mod database;
pub mod error;
pub mod query;

pub use api::{create_router, serve, ApiState, RestApiConfig};
pub use chatbot::{format_response, ChatResponse, Chatbot, DebugInfo, Translation};
pub use config::Config;
pub use database::{
    ColumnDescriptor, Database, QueryExecutor, Row, SchemaSource, SqliteDatabase,
    UnavailableDatabase,
};
pub use error::{ConfigError, DatabaseError, GenerationError, QuerybotError, Result};
pub use query::{
    Comparison, EntityExtractor, EntitySet, Intent, IntentClassifier, IntentRule, QueryBuilder,
    SchemaIndex, StopwordList, TableSchema, TextPreprocessor, Utterance,
};
