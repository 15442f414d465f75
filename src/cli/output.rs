//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use serde::Serialize;
use serde_json::Value;

use querybot::{ChatResponse, EntitySet, Intent, Row, Translation};

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize output: {e}"),
    }
}

/// Print a chat response.
pub fn print_chat_response(response: &ChatResponse, json: bool) {
    if json {
        print_json(response);
        return;
    }

    println!("{}", response.message);
    if let Some(sql) = &response.sql {
        println!("SQL: {sql}");
    }
    if let Some(rows) = &response.data {
        if !rows.is_empty() {
            println!();
            print_rows(rows);
        }
    }
}

#[derive(Serialize)]
struct TranslationReport<'a> {
    intent: Intent,
    keywords: &'a [String],
    entities: &'a EntitySet,
    #[serde(skip_serializing_if = "Option::is_none")]
    sql: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Print a dry-run translation.
pub fn print_translation(translation: &Translation, json: bool) {
    let report = TranslationReport {
        intent: translation.intent,
        keywords: &translation.utterance.keywords,
        entities: &translation.entities,
        sql: translation.sql.as_deref().ok(),
        error: translation.sql.as_ref().err().map(ToString::to_string),
    };

    if json {
        print_json(&report);
        return;
    }

    let entities = report.entities;
    println!("Intent:   {}", report.intent);
    println!("Keywords: {}", report.keywords.join(", "));
    println!("Table:    {}", entities.table.as_deref().unwrap_or("-"));
    if !entities.columns.is_empty() {
        println!("Columns:  {}", entities.columns.join(", "));
    }
    if let Some((column, operator, value)) = entities.filter() {
        println!("Filter:   {column} {operator} {value}");
    }
    if !entities.values.is_empty() {
        println!("Values:   {}", entities.values.join(", "));
    }
    match (&report.sql, &report.error) {
        (Some(sql), _) => println!("SQL:      {sql}"),
        (None, Some(error)) => println!("Error:    {error}"),
        (None, None) => {}
    }
}

/// Print the table list.
pub fn print_tables(tables: &[String], json: bool) {
    if json {
        print_json(tables);
        return;
    }

    if tables.is_empty() {
        println!("No tables found.");
        return;
    }
    for table in tables {
        println!("{table}");
    }
    println!("\nTotal: {} tables", tables.len());
}

const MAX_CELL_WIDTH: usize = 40;

fn print_rows(rows: &[Row]) {
    let Some(first) = rows.first() else {
        return;
    };
    let headers: Vec<&String> = first.keys().collect();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| row.get(h.as_str()).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(headers.iter().map(|h| h.as_str()).collect()));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &cells {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
    println!("\n({} rows)", rows.len());
}

fn cell(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    };
    if text.chars().count() > MAX_CELL_WIDTH {
        let truncated: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{truncated}...")
    } else {
        text
    }
}
