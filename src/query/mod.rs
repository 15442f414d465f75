//! Natural language to SQL translation.
//!
//! This module provides:
//! - Text normalization and keyword extraction
//! - Intent classification with an ordered regex rule table
//! - Schema snapshot with fuzzy table and column lookup
//! - Entity and filter extraction
//! - SQL generation per intent

pub mod builder;
pub mod classifier;
pub mod extractor;
pub mod preprocess;
pub mod schema;
pub mod types;

pub use builder::*;
pub use classifier::*;
pub use extractor::*;
pub use preprocess::*;
pub use schema::*;
pub use types::*;
