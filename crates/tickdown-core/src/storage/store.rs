//! Remaining-time persistence.
//!
//! The engine writes the last known remaining seconds after every redraw
//! and reads it back once at initialize. The channel is deliberately lossy:
//! any storage failure downgrades to "no prior state" and the engine keeps
//! running in memory. Values cross the trait as decimal strings; anything
//! that does not parse as a non-negative number reads back as absent.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection};

use super::data_dir;

/// Key-value channel holding one decimal string per timer identifier.
pub trait StateStore {
    /// Last persisted remaining seconds for `id`, if a sane value exists.
    /// Missing, non-numeric, and negative entries all read as `None`.
    fn load(&self, id: &str) -> Option<f64>;

    /// Persist the current remaining seconds for `id`.
    fn save(&self, id: &str, remaining_secs: f64);

    /// Drop any entry for `id`.
    fn clear(&self, id: &str);
}

fn parse_remaining(value: &str) -> Option<f64> {
    let secs: f64 = value.trim().parse().ok()?;
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}

/// SQLite-backed store at `~/.config/tickdown/tickdown.db`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store in the data directory, creating the database file
    /// and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::open_at(data_dir()?.join("tickdown.db"))?)
    }

    /// Open the store at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl StateStore for SqliteStore {
    fn load(&self, id: &str) -> Option<f64> {
        match self.kv_get(id) {
            Ok(Some(value)) => parse_remaining(&value),
            _ => None,
        }
    }

    fn save(&self, id: &str, remaining_secs: f64) {
        let _ = self.kv_set(id, &remaining_secs.to_string());
    }

    fn clear(&self, id: &str) {
        let _ = self.kv_delete(id);
    }
}

/// In-memory store for tests and storage-less hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, id: &str) -> Option<f64> {
        self.entries
            .borrow()
            .get(id)
            .and_then(|value| parse_remaining(value))
    }

    fn save(&self, id: &str, remaining_secs: f64) {
        self.entries
            .borrow_mut()
            .insert(id.to_owned(), remaining_secs.to_string());
    }

    fn clear(&self, id: &str) {
        self.entries.borrow_mut().remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_round_trip() {
        let store = SqliteStore::open_memory().unwrap();
        assert_eq!(store.load("t1"), None);

        store.save("t1", 45.5);
        assert_eq!(store.load("t1"), Some(45.5));

        store.save("t1", 12.0);
        assert_eq!(store.load("t1"), Some(12.0));

        store.clear("t1");
        assert_eq!(store.load("t1"), None);
    }

    #[test]
    fn sqlite_keys_are_independent() {
        let store = SqliteStore::open_memory().unwrap();
        store.save("a", 1.0);
        store.save("b", 2.0);
        store.clear("a");
        assert_eq!(store.load("a"), None);
        assert_eq!(store.load("b"), Some(2.0));
    }

    #[test]
    fn corrupt_values_read_as_absent() {
        let store = SqliteStore::open_memory().unwrap();
        store.kv_set("bad", "not a number").unwrap();
        assert_eq!(store.load("bad"), None);

        store.kv_set("neg", "-3.5").unwrap();
        assert_eq!(store.load("neg"), None);

        store.kv_set("inf", "inf").unwrap();
        assert_eq!(store.load("inf"), None);
    }

    #[test]
    fn open_at_creates_the_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickdown.db");

        {
            let store = SqliteStore::open_at(&path).unwrap();
            store.save("persisted", 7.0);
        }

        let reopened = SqliteStore::open_at(&path).unwrap();
        assert_eq!(reopened.load("persisted"), Some(7.0));
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        store.save("t", 3.25);
        assert_eq!(store.load("t"), Some(3.25));
        store.clear("t");
        assert_eq!(store.load("t"), None);
    }
}
