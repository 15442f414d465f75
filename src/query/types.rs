//! Types for the natural language query pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Intent
// ============================================================================

/// Coarse query shape a user request maps to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// List rows of a table ("show all products")
    SelectAll,
    /// Count rows of a table ("how many employees")
    Count,
    /// Read one field of a record ("what is the salary of Jane Roe")
    SpecificField,
    /// Numeric comparison filter ("products under 500")
    FilterNumeric,
    /// Equality filter on a text column ("products where category = desk")
    FilterText,
    /// Nothing matched
    #[default]
    Unknown,
}

impl Intent {
    /// Wire name of the intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelectAll => "select_all",
            Self::Count => "count",
            Self::SpecificField => "specific_field",
            Self::FilterNumeric => "filter_numeric",
            Self::FilterText => "filter_text",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Comparison operator
// ============================================================================

/// SQL comparison operator of a filter condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[default]
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
}

impl Comparison {
    /// Map a comparator phrase ("under", "greater than", ">=") to an operator.
    ///
    /// Matching is case-insensitive; unrecognized phrases become `=`.
    pub fn normalize(phrase: &str) -> Self {
        match phrase.to_lowercase().as_str() {
            "under" | "less than" | "below" | "<" => Self::Lt,
            "over" | "greater than" | "above" | ">" => Self::Gt,
            ">=" => Self::Ge,
            "<=" => Self::Le,
            _ => Self::Eq,
        }
    }

    /// SQL spelling of the operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

// ============================================================================
// Utterance
// ============================================================================

/// A raw request plus its normalized forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Text as received
    pub original: String,
    /// Lowercased, punctuation-free, whitespace-collapsed text
    pub cleaned: String,
    /// Tokens of `cleaned` minus stopwords, in order, duplicates kept
    pub keywords: Vec<String>,
}

// ============================================================================
// Entity Set
// ============================================================================

/// Structured meaning extracted from one request.
///
/// `table` only ever holds a name from the schema index, and `columns` /
/// `filter_column` only hold columns of that table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    /// Resolved target table
    pub table: Option<String>,
    /// Columns matched from keywords, in keyword order
    pub columns: Vec<String>,
    /// Column of the filter condition
    pub filter_column: Option<String>,
    /// Value of the filter condition
    pub filter_value: Option<String>,
    /// Operator of the filter condition
    pub filter_operator: Comparison,
    /// Numeric literals in order of appearance, then quoted literals
    pub values: Vec<String>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn with_filter(
        mut self,
        column: impl Into<String>,
        operator: Comparison,
        value: impl Into<String>,
    ) -> Self {
        self.filter_column = Some(column.into());
        self.filter_operator = operator;
        self.filter_value = Some(value.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }

    /// The filter condition, when both its column and value are set.
    pub fn filter(&self) -> Option<(&str, Comparison, &str)> {
        match (&self.filter_column, &self.filter_value) {
            (Some(column), Some(value)) if !value.is_empty() => {
                Some((column.as_str(), self.filter_operator, value.as_str()))
            }
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
