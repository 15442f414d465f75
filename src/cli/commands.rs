//! CLI command handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use querybot::{database::open_database, Chatbot, Config};

use super::output;

/// Open the configured database and load its schema.
pub fn connect(config: &Config) -> Result<Chatbot> {
    let path = config.database_path();
    let database = open_database(&path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;

    let mut chatbot = Chatbot::with_config(database, &config.matcher);
    chatbot
        .initialize()
        .context("Failed to load database schema")?;
    Ok(chatbot)
}

/// Run the ask command.
pub fn run_ask(config: &Config, message: &str, json_output: bool) -> Result<()> {
    let chatbot = connect(config)?;
    let response = chatbot.process_message(message);
    output::print_chat_response(&response, json_output);
    chatbot.close()?;
    Ok(())
}

/// Run the translate command.
pub fn run_translate(config: &Config, message: &str, json_output: bool) -> Result<()> {
    let chatbot = connect(config)?;
    let translation = chatbot.translate(message)?;
    output::print_translation(&translation, json_output);
    chatbot.close()?;
    Ok(())
}

/// Run the tables command.
pub fn run_tables(config: &Config, json_output: bool) -> Result<()> {
    let database = open_database(&config.database_path())?;
    let chatbot = Chatbot::new(Arc::clone(&database));
    let tables = chatbot.available_tables()?;
    output::print_tables(&tables, json_output);
    database.close()?;
    Ok(())
}
