//! End-to-end pipeline tests.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use querybot::config::MatcherConfig;
use querybot::database::{open_database, open_database_or_unavailable};
use querybot::{Chatbot, Comparison, Database, DatabaseError, Intent, StopwordList};

use crate::common::{company_chatbot, company_database, COMPANY_SQL};

#[test]
fn test_show_all_employees() {
    let chatbot = company_chatbot();
    let response = chatbot.process_message("Show me all employees");

    assert!(response.success);
    assert_eq!(response.sql.as_deref(), Some("SELECT * FROM employees"));
    assert_eq!(response.message, "Found 3 results.");
    assert_eq!(response.count, Some(3));

    let debug = response.debug.unwrap();
    assert_eq!(debug.intent, Intent::SelectAll);
    assert_eq!(debug.entities.table.as_deref(), Some("employees"));
}

#[test]
fn test_count_employees() {
    let chatbot = company_chatbot();
    let response = chatbot.process_message("How many employees");

    assert!(response.success);
    assert_eq!(
        response.sql.as_deref(),
        Some("SELECT COUNT(*) as count FROM employees")
    );
    assert_eq!(response.message, "Found 3 records.");
    assert_eq!(response.data.unwrap()[0]["count"], json!(3));
    assert_eq!(response.debug.unwrap().intent, Intent::Count);
}

#[test]
fn test_numeric_filter_on_list() {
    let chatbot = company_chatbot();
    let translation = chatbot
        .translate("List products with price less than 500")
        .unwrap();

    assert_eq!(translation.entities.table.as_deref(), Some("products"));
    assert_eq!(
        translation.entities.filter(),
        Some(("price", Comparison::Lt, "500"))
    );
    assert_eq!(
        translation.sql.as_deref(),
        Ok("SELECT * FROM products WHERE price < 500")
    );

    let response = chatbot.process_message("List products with price less than 500");
    assert!(response.success);
    assert_eq!(response.count, Some(3));
}

#[test]
fn test_text_filter() {
    let chatbot = company_chatbot();
    let response = chatbot.process_message("products where category = furniture");

    assert!(response.success);
    assert_eq!(
        response.sql.as_deref(),
        Some("SELECT * FROM products WHERE category = 'furniture'")
    );
    assert_eq!(response.debug.unwrap().intent, Intent::FilterText);
    assert_eq!(response.count, Some(3));
}

#[test]
fn test_unknown_table() {
    let chatbot = company_chatbot();
    let response = chatbot.process_message("show me all widgets");

    assert!(!response.success);
    assert_eq!(response.message, "Could not identify which table to query");
    assert!(response.data.is_none());
    assert!(response.sql.is_none());
}

#[test]
fn test_filter_numeric_intent() {
    let chatbot = company_chatbot();
    let response = chatbot.process_message("products with price above 100");

    assert!(response.success);
    assert_eq!(response.debug.as_ref().unwrap().intent, Intent::FilterNumeric);
    assert_eq!(
        response.sql.as_deref(),
        Some("SELECT * FROM products WHERE price > 100")
    );
    assert_eq!(response.count, Some(3));
}

#[test]
fn test_specific_field_for_named_record() {
    let chatbot = company_chatbot();
    let response = chatbot.process_message("What is the salary of Alice Smith in employees");

    assert!(response.success);
    assert_eq!(
        response.sql.as_deref(),
        Some("SELECT salary FROM employees WHERE name = 'Alice Smith'")
    );
    assert_eq!(response.message, "Found 1 result: salary: 85000");
}

#[test]
fn test_count_with_text_filter() {
    let chatbot = company_chatbot();
    let response = chatbot.process_message("how many employees where department is sales");

    assert!(response.success);
    assert_eq!(
        response.sql.as_deref(),
        Some("SELECT COUNT(*) as count FROM employees WHERE department = 'sales'")
    );
    assert_eq!(response.message, "Found 2 records.");
}

#[test]
fn test_no_results_message() {
    let chatbot = company_chatbot();
    let response = chatbot.process_message("products with price above 5000");

    assert!(response.success);
    assert_eq!(response.message, "No results found for your query.");
    assert_eq!(response.count, Some(0));
}

#[test]
fn test_execution_failure_after_schema_change() {
    let db = company_database();
    let mut chatbot = Chatbot::new(db.clone());
    chatbot.initialize().unwrap();

    // the snapshot still lists the dropped table
    db.execute_batch("DROP TABLE products").unwrap();
    let response = chatbot.process_message("Show me all products");

    assert!(!response.success);
    assert_eq!(response.message, "Error executing query");
    assert_eq!(response.sql.as_deref(), Some("SELECT * FROM products"));
    assert_eq!(chatbot.available_tables().unwrap(), vec!["employees"]);
}

#[test]
fn test_minimal_stopwords() {
    let config = MatcherConfig {
        stopwords: StopwordList::Minimal,
        ..MatcherConfig::default()
    };
    let mut chatbot = Chatbot::with_config(company_database(), &config);
    chatbot.initialize().unwrap();

    let translation = chatbot.translate("Show me all employees").unwrap();
    assert_eq!(
        translation.utterance.keywords,
        vec!["show", "me", "all", "employees"]
    );
    assert_eq!(translation.sql.as_deref(), Ok("SELECT * FROM employees"));
}

#[test]
fn test_on_disk_database() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("company.db");
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch(COMPANY_SQL)
        .unwrap();

    let db = open_database(&path).unwrap();
    let mut chatbot = Chatbot::new(Arc::clone(&db));
    chatbot.initialize().unwrap();

    let schema = chatbot.schema().unwrap();
    assert_eq!(
        schema.table_names().collect::<Vec<_>>(),
        vec!["employees", "products"]
    );
    assert_eq!(
        schema.columns("products").unwrap(),
        ["id", "name", "price", "category"]
    );

    let response = chatbot.process_message("count products");
    assert_eq!(response.message, "Found 4 records.");

    chatbot.close().unwrap();
    assert!(!db.is_open());
    assert!(!chatbot.is_connected());
}

#[test]
fn test_missing_database_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data/cmopany.db");

    assert!(matches!(
        open_database(&path),
        Err(DatabaseError::Connection(_))
    ));
    assert!(!path.exists());

    let mut chatbot = Chatbot::new(open_database_or_unavailable(&path));
    assert!(chatbot.initialize().is_err());
    assert!(!chatbot.is_connected());
    assert_eq!(
        chatbot.process_message("count products").message,
        "Chatbot is not connected to database"
    );
}

#[test]
fn test_filter_numeric_inclusive_operators() {
    let chatbot = company_chatbot();

    let response = chatbot.process_message("products with price >= 250");
    assert!(response.success);
    assert_eq!(
        response.sql.as_deref(),
        Some("SELECT * FROM products WHERE price >= 250")
    );
    assert_eq!(response.count, Some(2));

    let response = chatbot.process_message("products with price <= 120");
    assert!(response.success);
    assert_eq!(
        response.sql.as_deref(),
        Some("SELECT * FROM products WHERE price <= 120")
    );
    assert_eq!(response.count, Some(2));
}

#[test]
fn test_filter_text_quoted_value() {
    let chatbot = company_chatbot();

    for message in [
        r#"products where category is "furniture""#,
        "products where category = 'furniture'",
    ] {
        let response = chatbot.process_message(message);
        assert!(response.success, "{message}");
        assert_eq!(
            response.sql.as_deref(),
            Some("SELECT * FROM products WHERE category = 'furniture'"),
            "{message}"
        );
        assert_eq!(response.count, Some(3));
    }
}
