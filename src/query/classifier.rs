//! Query Intent Classifier.
//!
//! Maps a request to one [`Intent`] using an ordered table of regex rules.
//! Rules are scanned in table order and the first rule with any matching
//! pattern wins, so the order of the table is the tie-break between
//! overlapping rules.

use std::sync::LazyLock;

use regex::Regex;

use super::types::Intent;

// ============================================================================
// Intent Rules
// ============================================================================

/// An intent together with the patterns that trigger it.
#[derive(Debug, Clone)]
pub struct IntentRule {
    /// Intent returned when a pattern matches
    pub intent: Intent,
    /// Patterns, tried in order; matched anywhere in the lowercased text
    pub patterns: Vec<Regex>,
}

impl IntentRule {
    /// Compile a rule from pattern sources.
    pub fn new(intent: Intent, patterns: &[&str]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { intent, patterns })
    }

    /// Whether any pattern matches somewhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

/// The built-in rule table, in priority order.
pub fn default_rules() -> Vec<IntentRule> {
    DEFAULT_RULES.clone()
}

// ============================================================================
// Intent Classifier
// ============================================================================

/// Classifies natural language requests into intents.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier with the built-in rules.
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    /// Create a classifier with a custom rule table.
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// The rule table, in priority order.
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Append a rule with the lowest priority.
    pub fn push_rule(&mut self, rule: IntentRule) {
        self.rules.push(rule);
    }

    /// Detect the intent of `text`.
    pub fn detect_intent(&self, text: &str) -> Intent {
        let text_lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&text_lower))
            .map_or(Intent::Unknown, |rule| rule.intent)
    }
}

// ============================================================================
// Regex Patterns (using LazyLock for static initialization)
// ============================================================================

const SELECT_ALL_PATTERNS: &[&str] = &[
    r"show (all|me all|me|list)? ?(.*)",
    r"list (all)? ?(.*)",
    r"get (all)? ?(.*)",
    r"display (all)? ?(.*)",
    r"fetch (all)? ?(.*)",
];

const COUNT_PATTERNS: &[&str] = &[r"how many (.*)", r"count (.*)", r"number of (.*)"];

const SPECIFIC_FIELD_PATTERNS: &[&str] = &[
    r"what is (the)? ?(.*?) of (.*)",
    r"get (the)? ?(.*?) (of|for) (.*)",
    r"show (the)? ?(.*?) (of|for) (.*)",
    r"what.*?(.*?) (of|for) (.*)",
];

const FILTER_NUMERIC_PATTERNS: &[&str] = &[
    r"(.*?) (greater than|more than|above|>|>=|less than|below|under|<|<=) (\d+)",
    r"(.*?) (=|equals?|is) (\d+)",
    r"(.*?) under (\d+)",
    r"(.*?) over (\d+)",
];

const FILTER_TEXT_PATTERNS: &[&str] = &[
    r#"(.*?) (where|in) (.*?) (=|is|equals?|are) ["']?(.*?)["']?$"#,
    r"(.*?) where (.*?) = (.*)",
    r"(.*?) in (.*?) category (.*)",
];

static DEFAULT_RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    [
        (Intent::SelectAll, SELECT_ALL_PATTERNS),
        (Intent::Count, COUNT_PATTERNS),
        (Intent::SpecificField, SPECIFIC_FIELD_PATTERNS),
        (Intent::FilterNumeric, FILTER_NUMERIC_PATTERNS),
        (Intent::FilterText, FILTER_TEXT_PATTERNS),
    ]
    .into_iter()
    .map(|(intent, patterns)| IntentRule::new(intent, patterns).expect("Invalid regex"))
    .collect()
});

// ============================================================================
// Tests
// ============================================================================
