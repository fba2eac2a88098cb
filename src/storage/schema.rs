//! Database schema definition

use rusqlite::Connection;

/// SQL schema for the category store
///
/// `name` carries the uniqueness constraint that makes the conditional
/// insert atomic; `id` exists for ordering only.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT
);
"#;

/// Creates the schema if it does not exist yet
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
