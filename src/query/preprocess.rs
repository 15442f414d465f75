//! Text normalization: cleaning, tokenizing and stopword removal.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::types::Utterance;

/// Which stopword list keyword extraction filters against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwordList {
    /// The NLTK English stopword list
    #[default]
    Standard,
    /// Small built-in fallback list
    Minimal,
}

impl StopwordList {
    /// Words in this list.
    pub fn words(&self) -> &'static [&'static str] {
        match self {
            Self::Standard => STANDARD_STOPWORDS,
            Self::Minimal => MINIMAL_STOPWORDS,
        }
    }
}

/// Turns raw request text into cleaned text and keywords.
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    stopwords: HashSet<&'static str>,
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextPreprocessor {
    /// Create a preprocessor using the standard stopword list.
    pub fn new() -> Self {
        Self::with_stopwords(StopwordList::Standard)
    }

    /// Create a preprocessor using the given stopword list.
    pub fn with_stopwords(list: StopwordList) -> Self {
        Self {
            stopwords: list.words().iter().copied().collect(),
        }
    }

    /// Lowercase, drop everything outside `[a-z0-9\s]`, collapse whitespace.
    pub fn clean(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = NON_ALPHANUMERIC.replace_all(&lowered, "");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Split text into word tokens.
    ///
    /// Cleaned text only contains ASCII alphanumerics and single spaces, so
    /// whitespace splitting is a complete word tokenizer for it.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    /// Drop stopwords, keeping order and duplicates.
    pub fn remove_stopwords(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|token| !self.stopwords.contains(token.as_str()))
            .collect()
    }

    /// Keywords of `text`: clean, tokenize, remove stopwords.
    pub fn keywords(&self, text: &str) -> Vec<String> {
        let cleaned = self.clean(text);
        self.remove_stopwords(self.tokenize(&cleaned))
    }

    /// Full preprocessing pipeline.
    pub fn preprocess(&self, text: &str) -> Utterance {
        let cleaned = self.clean(text);
        let keywords = self.remove_stopwords(self.tokenize(&cleaned));
        Utterance {
            original: text.to_string(),
            cleaned,
            keywords,
        }
    }
}

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("Invalid regex"));

const MINIMAL_STOPWORDS: &[&str] = &["the", "a", "an", "in", "on", "at", "is", "are", "was", "were"];

const STANDARD_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];
