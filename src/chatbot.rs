//! Chatbot orchestration.
//!
//! Sequences preprocessing, intent detection, entity extraction and SQL
//! generation, runs the statement and summarizes the rows. Every failure
//! inside a request becomes an unsuccessful [`ChatResponse`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::MatcherConfig;
use crate::database::{Database, Row};
use crate::error::{GenerationError, QuerybotError, Result};
use crate::query::{
    EntityExtractor, EntitySet, Intent, IntentClassifier, QueryBuilder, SchemaIndex,
    TextPreprocessor, Utterance, DEFAULT_MATCH_THRESHOLD,
};

// ============================================================================
// Responses
// ============================================================================

/// Pipeline state attached to a response for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    pub intent: Intent,
    pub entities: EntitySet,
    pub keywords: Vec<String>,
}

/// Result of processing one chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Whether the query ran
    pub success: bool,
    /// Human-readable summary or failure reason
    pub message: String,
    /// Result rows; `null` on failure
    pub data: Option<Vec<Row>>,
    /// Generated SQL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    /// Number of result rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

impl ChatResponse {
    /// A failed response carrying only a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            sql: None,
            count: None,
            debug: None,
        }
    }

    /// A successful response for `rows`.
    pub fn success(message: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            success: true,
            message: message.into(),
            count: Some(rows.len()),
            data: Some(rows),
            sql: None,
            debug: None,
        }
    }

    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }

    pub fn with_debug(mut self, debug: DebugInfo) -> Self {
        self.debug = Some(debug);
        self
    }
}

/// Outcome of translating a message without executing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub utterance: Utterance,
    pub intent: Intent,
    pub entities: EntitySet,
    pub sql: std::result::Result<String, GenerationError>,
}

impl Translation {
    fn debug_info(&self) -> DebugInfo {
        DebugInfo {
            intent: self.intent,
            entities: self.entities.clone(),
            keywords: self.utterance.keywords.clone(),
        }
    }
}

// ============================================================================
// Chatbot
// ============================================================================

/// Natural language front end to a database.
pub struct Chatbot {
    database: Arc<dyn Database>,
    preprocessor: TextPreprocessor,
    classifier: IntentClassifier,
    builder: QueryBuilder,
    schema: Option<SchemaIndex>,
    threshold: u8,
}

impl std::fmt::Debug for Chatbot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chatbot")
            .field("connected", &self.is_connected())
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl Chatbot {
    /// Create a chatbot with default matching settings.
    ///
    /// The chatbot answers nothing until [`Chatbot::initialize`] succeeds.
    pub fn new(database: Arc<dyn Database>) -> Self {
        Self {
            database,
            preprocessor: TextPreprocessor::new(),
            classifier: IntentClassifier::new(),
            builder: QueryBuilder::new(),
            schema: None,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    /// Create a chatbot with the given matching settings.
    pub fn with_config(database: Arc<dyn Database>, config: &MatcherConfig) -> Self {
        Self {
            preprocessor: TextPreprocessor::with_stopwords(config.stopwords),
            threshold: config.threshold,
            ..Self::new(database)
        }
    }

    /// Snapshot the database schema. Runs once; later calls are no-ops.
    pub fn initialize(&mut self) -> Result<()> {
        if self.schema.is_some() {
            return Ok(());
        }
        let schema = SchemaIndex::load(self.database.as_ref())?.with_threshold(self.threshold);
        self.schema = Some(schema);
        Ok(())
    }

    /// Whether the schema is loaded and the database is still open.
    pub fn is_connected(&self) -> bool {
        self.schema.is_some() && self.database.is_open()
    }

    /// The schema snapshot, once initialized.
    pub fn schema(&self) -> Option<&SchemaIndex> {
        self.schema.as_ref()
    }

    /// Table names, read live from the database.
    pub fn available_tables(&self) -> Result<Vec<String>> {
        Ok(self.database.list_tables()?)
    }

    /// Translate `text` to SQL without running it.
    pub fn translate(&self, text: &str) -> Result<Translation> {
        let schema = self.connected_schema()?;
        Ok(self.translate_with(schema, text))
    }

    /// Answer one chat message.
    pub fn process_message(&self, text: &str) -> ChatResponse {
        let Ok(schema) = self.connected_schema() else {
            return ChatResponse::failure(QuerybotError::NotConnected.to_string());
        };

        match panic::catch_unwind(AssertUnwindSafe(|| self.answer(schema, text))) {
            Ok(response) => response,
            Err(payload) => {
                let cause = panic_message(payload.as_ref());
                tracing::error!(error = %cause, "Unexpected failure while processing message");
                ChatResponse::failure(format!("Error: {cause}"))
            }
        }
    }

    /// Close the underlying database.
    pub fn close(&self) -> Result<()> {
        Ok(self.database.close()?)
    }

    fn connected_schema(&self) -> Result<&SchemaIndex> {
        match &self.schema {
            Some(schema) if self.database.is_open() => Ok(schema),
            _ => Err(QuerybotError::NotConnected),
        }
    }

    fn translate_with(&self, schema: &SchemaIndex, text: &str) -> Translation {
        let utterance = self.preprocessor.preprocess(text);
        let intent = self.classifier.detect_intent(text);
        let entities = EntityExtractor::new(schema).extract(text, &utterance.keywords);
        let sql = self.builder.generate(intent, &entities, text);

        tracing::debug!(
            %intent,
            entities = ?entities,
            keywords = ?utterance.keywords,
            sql = ?sql,
            "Translated message"
        );

        Translation {
            utterance,
            intent,
            entities,
            sql,
        }
    }

    fn answer(&self, schema: &SchemaIndex, text: &str) -> ChatResponse {
        let translation = self.translate_with(schema, text);
        let debug = translation.debug_info();

        let sql = match translation.sql {
            Ok(sql) => sql,
            Err(e) => return ChatResponse::failure(e.to_string()).with_debug(debug),
        };

        match self.database.execute(&sql) {
            Ok(rows) => {
                let message = format_response(&rows, translation.intent);
                ChatResponse::success(message, rows)
                    .with_sql(sql)
                    .with_debug(debug)
            }
            Err(e) => {
                tracing::error!(error = %e, sql = %sql, "Query execution failed");
                ChatResponse::failure("Error executing query")
                    .with_sql(sql)
                    .with_debug(debug)
            }
        }
    }
}

/// Summarize result rows for display.
pub fn format_response(rows: &[Row], intent: Intent) -> String {
    let Some(first) = rows.first() else {
        return "No results found for your query.".to_string();
    };

    if intent == Intent::Count {
        let count = first
            .get("count")
            .map_or_else(|| rows.len().to_string(), display_value);
        return format!("Found {count} records.");
    }

    if rows.len() == 1 && first.len() <= 3 {
        let fields = first
            .iter()
            .map(|(k, v)| format!("{k}: {}", display_value(v)))
            .collect::<Vec<_>>()
            .join(", ");
        return format!("Found 1 result: {fields}");
    }

    format!("Found {} results.", rows.len())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}
