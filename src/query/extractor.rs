//! Schema-aware entity extraction.
//!
//! Resolves the target table and matching columns from keywords, then pulls
//! literals and a single filter condition out of the raw text.

use std::cmp::Reverse;
use std::sync::LazyLock;

use regex::Regex;

use super::schema::SchemaIndex;
use super::types::{Comparison, EntitySet};

/// Extracts an [`EntitySet`] from a request against a schema snapshot.
#[derive(Debug, Clone, Copy)]
pub struct EntityExtractor<'a> {
    schema: &'a SchemaIndex,
}

impl<'a> EntityExtractor<'a> {
    pub fn new(schema: &'a SchemaIndex) -> Self {
        Self { schema }
    }

    /// Extract entities from `text` and its `keywords`.
    pub fn extract(&self, text: &str, keywords: &[String]) -> EntitySet {
        let mut entities = EntitySet::new();

        entities.table = self.resolve_table(keywords).map(str::to_string);
        if let Some(table) = entities.table.as_deref() {
            entities.columns = keywords
                .iter()
                .filter_map(|k| self.schema.match_column(table, k))
                .map(str::to_string)
                .collect();
        }

        entities.values = extract_values(text);
        self.extract_filter(text, &mut entities);
        entities
    }

    /// First keyword, longest first, that names a table.
    ///
    /// The sort is stable, so equally long keywords keep their order.
    pub fn resolve_table(&self, keywords: &[String]) -> Option<&'a str> {
        let mut by_length: Vec<&String> = keywords.iter().collect();
        by_length.sort_by_key(|k| Reverse(k.len()));
        by_length
            .into_iter()
            .find_map(|k| self.schema.match_table(k))
    }

    fn extract_filter(&self, text: &str, entities: &mut EntitySet) {
        let Some(table) = entities.table.clone() else {
            return;
        };
        let text_lower = text.to_lowercase();

        if let Some(caps) = NUMERIC_FILTER.captures(&text_lower) {
            if let Some(column) = self.schema.match_column(&table, &caps[1]) {
                entities.filter_column = Some(column.to_string());
                entities.filter_value = Some(caps[3].to_string());
                entities.filter_operator = Comparison::normalize(&caps[2]);
                return;
            }
        }

        if let Some(caps) = TEXT_FILTER.captures(&text_lower) {
            if let Some(column) = self.schema.match_column(&table, &caps[1]) {
                entities.filter_column = Some(column.to_string());
                entities.filter_value = Some(caps[2].to_string());
                entities.filter_operator = Comparison::Eq;
            }
        }
    }
}

/// Numeric literals in order of appearance, then quoted literals.
pub fn extract_values(text: &str) -> Vec<String> {
    let numbers = NUMBER.find_iter(text).map(|m| m.as_str().to_string());
    let quoted = QUOTED
        .captures_iter(text)
        .map(|caps| caps[1].to_string());
    numbers.chain(quoted).collect()
}

// ============================================================================
// Regex Patterns
// ============================================================================

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("Invalid regex"));

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']+(.*?)["']"#).expect("Invalid regex"));

static NUMERIC_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s+(under|over|less than|greater than|above|below|>|<|>=|<=)\s+(\d+)")
        .expect("Invalid regex")
});

static TEXT_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)\s*(?:=|is|equals?|are)\s+["']?(\w+)["']?"#).expect("Invalid regex")
});
