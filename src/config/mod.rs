//! Configuration loading for Querybot.

mod settings;

pub use settings::*;
