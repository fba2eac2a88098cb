//! SQLite-backed category store
//!
//! Each worker owns its own `CategoryStore`; connections are never shared
//! across threads or processes. WAL mode plus a busy timeout let many
//! connections write to the same file concurrently.

use crate::storage::schema::initialize_schema;
use crate::storage::{CategoryRecord, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// A single connection to the category store
pub struct CategoryStore {
    conn: Connection,
}

impl CategoryStore {
    /// Opens (and if necessary creates) the store at `path`
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory store (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Conditional insert keyed on `name`
    ///
    /// A conflicting name leaves the table unchanged and reports `false`;
    /// it is never an error and never a duplicate row.
    pub fn insert_ignore(&self, name: &str, description: &str) -> StorageResult<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO categories (name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        Ok(changed > 0)
    }

    /// Total number of stored categories
    pub fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Looks up one category by its unique name
    pub fn get_by_name(&self, name: &str) -> StorageResult<Option<CategoryRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, name, description FROM categories WHERE name = ?1",
                params![name],
                |row| {
                    Ok(CategoryRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// All categories in insertion order
    pub fn list(&self) -> StorageResult<Vec<CategoryRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description FROM categories ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(CategoryRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let store = CategoryStore::open_in_memory().expect("store opens");

        assert!(store.insert_ignore("Section A", "First section").unwrap());
        let record = store.get_by_name("Section A").unwrap().expect("row exists");
        assert_eq!(record.name, "Section A");
        assert_eq!(record.description.as_deref(), Some("First section"));
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let store = CategoryStore::open_in_memory().expect("store opens");

        assert!(store.insert_ignore("Section A", "original").unwrap());
        assert!(!store.insert_ignore("Section A", "replacement").unwrap());

        assert_eq!(store.count().unwrap(), 1);
        let record = store.get_by_name("Section A").unwrap().expect("row exists");
        assert_eq!(record.description.as_deref(), Some("original"));
    }

    #[test]
    fn test_missing_name_is_none() {
        let store = CategoryStore::open_in_memory().expect("store opens");
        assert!(store.get_by_name("nothing").unwrap().is_none());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let store = CategoryStore::open_in_memory().expect("store opens");
        store.insert_ignore("b", "second letter").unwrap();
        store.insert_ignore("a", "first letter").unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_concurrent_inserts_of_same_name() {
        use std::sync::Arc;

        let dir = tempfile::tempdir().expect("temp dir");
        let path = Arc::new(dir.path().join("store.db"));

        // Ensure the schema exists before the writers race.
        CategoryStore::open(&path).expect("store opens");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = Arc::clone(&path);
                std::thread::spawn(move || {
                    let store = CategoryStore::open(&path).expect("store opens");
                    store
                        .insert_ignore("shared", &format!("writer {}", i))
                        .expect("insert succeeds")
                })
            })
            .collect();

        let inserted: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Exactly one writer wins; everyone else no-ops without error.
        assert_eq!(inserted.iter().filter(|&&won| won).count(), 1);

        let store = CategoryStore::open(&path).expect("store opens");
        assert_eq!(store.count().unwrap(), 1);
    }
}
