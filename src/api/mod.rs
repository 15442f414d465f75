//! REST API module for Querybot.
//!
//! Exposes the chatbot over HTTP so web front ends can send chat messages
//! and inspect the connected database.

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
