//! SQL assembly from an intent and its entities.
//!
//! Identifiers and values are interpolated into the statement verbatim. The
//! values come from user text, so generated statements must only ever be run
//! against a read-only or otherwise expendable connection.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Comparison, EntitySet, Intent};
use crate::error::GenerationError;

/// Keyword hints for the field a `specific_field` request reads.
const FIELD_HINTS: &[(&str, &str)] = &[("price", "price"), ("salary", "salary"), ("email", "email")];

/// Keyword hints for the column a `filter_numeric` request filters on.
const FILTER_HINTS: &[(&str, &str)] = &[
    ("price", "price"),
    ("salary", "salary"),
    ("quantity", "stock_quantity"),
];

/// Builds `SELECT` statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Generate SQL for `intent`.
    ///
    /// `text` is the request as the user typed it; some branches read hints
    /// from it that the entity set does not carry.
    pub fn generate(
        &self,
        intent: Intent,
        entities: &EntitySet,
        text: &str,
    ) -> Result<String, GenerationError> {
        let table = entities
            .table
            .as_deref()
            .ok_or(GenerationError::TableUnresolved)?;

        match intent {
            Intent::SelectAll | Intent::Unknown => Ok(select_all(table, entities)),
            Intent::Count => Ok(count(table, entities)),
            Intent::SpecificField => specific_field(table, entities, text),
            Intent::FilterNumeric => filter_numeric(table, entities, text),
            Intent::FilterText => Ok(filter_text(table, entities)),
        }
    }
}

fn select_all(table: &str, entities: &EntitySet) -> String {
    let mut sql = format!("SELECT * FROM {table}");
    push_where(&mut sql, entities);
    sql
}

fn count(table: &str, entities: &EntitySet) -> String {
    let mut sql = format!("SELECT COUNT(*) as count FROM {table}");
    push_where(&mut sql, entities);
    sql
}

fn specific_field(
    table: &str,
    entities: &EntitySet,
    text: &str,
) -> Result<String, GenerationError> {
    let columns = if entities.columns.is_empty() {
        find_hint(FIELD_HINTS, text)
            .ok_or(GenerationError::FieldUnresolved)?
            .to_string()
    } else {
        entities.columns.join(", ")
    };

    let mut sql = format!("SELECT {columns} FROM {table}");
    if let Some(caps) = RECORD_NAME.captures(text) {
        sql.push_str(&format!(" WHERE name = '{}'", &caps[1]));
    }
    Ok(sql)
}

fn filter_numeric(
    table: &str,
    entities: &EntitySet,
    text: &str,
) -> Result<String, GenerationError> {
    if let Some((column, operator, value)) = entities.filter() {
        return Ok(format!("SELECT * FROM {table} WHERE {column} {operator} {value}"));
    }

    let column = find_hint(FILTER_HINTS, text).ok_or(GenerationError::FilterUnresolved)?;
    let value = entities
        .values
        .first()
        .ok_or(GenerationError::ValueMissing)?;
    let operator = infer_operator(text);

    Ok(format!("SELECT * FROM {table} WHERE {column} {operator} {value}"))
}

// Without a resolved filter this deliberately degrades to an unfiltered select.
fn filter_text(table: &str, entities: &EntitySet) -> String {
    match entities.filter() {
        Some((column, _, value)) => format!("SELECT * FROM {table} WHERE {column} = '{value}'"),
        None => format!("SELECT * FROM {table}"),
    }
}

fn push_where(sql: &mut String, entities: &EntitySet) {
    if let Some((column, operator, value)) = entities.filter() {
        sql.push_str(&format!(" WHERE {column} {operator} {}", sql_literal(value)));
    }
}

/// Render a value as a SQL literal: bare if numeric, single-quoted otherwise.
pub fn sql_literal(value: &str) -> String {
    if is_numeric(value) {
        value.to_string()
    } else {
        format!("'{value}'")
    }
}

/// Whether `value` parses as a floating point number.
pub fn is_numeric(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

fn find_hint(hints: &[(&str, &'static str)], text: &str) -> Option<&'static str> {
    let text_lower = text.to_lowercase();
    hints
        .iter()
        .find(|(keyword, _)| text_lower.contains(keyword))
        .map(|&(_, column)| column)
}

fn infer_operator(text: &str) -> Comparison {
    let text_lower = text.to_lowercase();
    if GREATER.is_match(&text_lower) {
        Comparison::Gt
    } else if LESS.is_match(&text_lower) {
        Comparison::Lt
    } else {
        Comparison::Eq
    }
}

// ============================================================================
// Regex Patterns
// ============================================================================

static RECORD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:of|for)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)").expect("Invalid regex")
});

static GREATER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"greater than|more than|above|>").expect("Invalid regex"));

static LESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"less than|below|under|<").expect("Invalid regex"));
