//! Shared fixtures.

use std::sync::Arc;

use querybot::{Chatbot, SqliteDatabase};

pub const COMPANY_SQL: &str = "
    CREATE TABLE employees (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        salary INTEGER,
        department TEXT
    );
    CREATE TABLE products (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        price INTEGER,
        category TEXT
    );
    INSERT INTO employees VALUES (1, 'Alice Smith', 85000, 'sales');
    INSERT INTO employees VALUES (2, 'Bob Jones', 62000, 'engineering');
    INSERT INTO employees VALUES (3, 'Carol White', 71000, 'sales');
    INSERT INTO products VALUES (1, 'Desk', 250, 'furniture');
    INSERT INTO products VALUES (2, 'Chair', 120, 'furniture');
    INSERT INTO products VALUES (3, 'Lamp', 45, 'lighting');
    INSERT INTO products VALUES (4, 'Sofa', 900, 'furniture');
";

/// In-memory database with the company fixture loaded.
pub fn company_database() -> Arc<SqliteDatabase> {
    let db = SqliteDatabase::open_in_memory().unwrap();
    db.execute_batch(COMPANY_SQL).unwrap();
    Arc::new(db)
}

/// Initialized chatbot over the company fixture.
pub fn company_chatbot() -> Chatbot {
    let mut chatbot = Chatbot::new(company_database());
    chatbot.initialize().unwrap();
    chatbot
}
