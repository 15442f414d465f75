//! Read-only snapshot of table and column names with fuzzy lookup.

use rapidfuzz::fuzz;
use serde::{Deserialize, Serialize};

use crate::database::SchemaSource;
use crate::error::DatabaseError;

/// Default minimum similarity score for a fuzzy match.
pub const DEFAULT_MATCH_THRESHOLD: u8 = 60;

/// One table of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Column names in the order the schema source returned them
    pub columns: Vec<String>,
}

impl TableSchema {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Table and column names of the connected database.
///
/// Built once, never mutated afterwards, and safe to share between threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIndex {
    tables: Vec<TableSchema>,
    threshold: u8,
}

impl SchemaIndex {
    /// Create an index from table definitions with the default threshold.
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self {
            tables,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    /// Replace the match threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Snapshot the schema exposed by `source`.
    ///
    /// Failing to list tables fails the snapshot. A table whose description
    /// cannot be read is kept with no columns.
    pub fn load<S: SchemaSource + ?Sized>(source: &S) -> Result<Self, DatabaseError> {
        let names = source.list_tables()?;
        let mut tables = Vec::with_capacity(names.len());

        for name in names {
            let columns = match source.describe_table(&name) {
                Ok(descriptors) => descriptors.into_iter().map(|c| c.field).collect(),
                Err(e) => {
                    tracing::warn!(table = %name, error = %e, "Could not describe table");
                    Vec::new()
                }
            };
            tables.push(TableSchema { name, columns });
        }

        tracing::info!(tables = tables.len(), "Loaded database schema");
        Ok(Self::new(tables))
    }

    /// Current match threshold.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// All tables, in schema source order.
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Table names, in schema source order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Columns of `table`, if the table is known.
    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.tables
            .iter()
            .find(|t| t.name == table)
            .map(|t| t.columns.as_slice())
    }

    /// Best fuzzy match for `keyword` among the table names.
    pub fn match_table(&self, keyword: &str) -> Option<&str> {
        match_name(keyword, self.table_names(), self.threshold)
    }

    /// Best fuzzy match for `keyword` among the columns of `table`.
    pub fn match_column(&self, table: &str, keyword: &str) -> Option<&str> {
        let columns = self.columns(table)?;
        match_name(keyword, columns.iter().map(String::as_str), self.threshold)
    }
}

/// Highest-scoring name in `pool` whose score reaches `threshold`.
///
/// Ties go to the name that comes first in `pool`.
pub fn match_name<'a, I>(candidate: &str, pool: I, threshold: u8) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, u8)> = None;
    for name in pool {
        let score = similarity(candidate, name);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((name, score));
        }
    }

    best.filter(|&(_, score)| score >= threshold)
        .map(|(name, _)| name)
}

/// Token-order-insensitive similarity of two names, 0 to 100.
///
/// Both names are reduced to sorted lowercase ASCII tokens, then compared with
/// the indel ratio `(len_a + len_b - indel) / (len_a + len_b)`, where `indel`
/// counts insertions and deletions only. Halves round to even.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a = sorted_tokens(a);
    let b = sorted_tokens(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let ratio = fuzz::ratio(a.chars(), b.chars());
    (ratio * 100.0).round_ties_even() as u8
}

fn sorted_tokens(name: &str) -> String {
    let processed: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    let mut tokens: Vec<&str> = processed.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
