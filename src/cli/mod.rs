//! CLI module for the Querybot command-line interface.
//!
//! This module provides command handlers that run the chatbot against the
//! configured database and print the results.

mod commands;
mod output;

pub use commands::*;
