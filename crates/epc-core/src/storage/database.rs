//! SQLite-backed key-value store.
//!
//! A single `kv` table holds every engine record as JSON text. Batched
//! writes and removals run inside one transaction.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, KeyValueStore};
use crate::error::StorageError;

/// SQLite database for engine state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/epc.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self, StorageError> {
        let dir = data_dir().map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Self::open_path(&dir.join("epc.db"))
    }

    /// Open the database at an explicit path.
    pub fn open_path(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn multi_set(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)")?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("DELETE FROM kv WHERE key = ?1")?;
            for key in keys {
                stmt.execute(params![key])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.get("test").unwrap().is_none());
        db.set("test", "hello").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "hello");
        db.set("test", "again").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn batched_write_and_remove() {
        let db = Database::open_memory().unwrap();
        db.multi_set(&[
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ])
        .unwrap();
        let got = db.multi_get(&["a", "b"]).unwrap();
        assert_eq!(got[1].1.as_deref(), Some("2"));

        db.multi_remove(&["a", "b", "missing"]).unwrap();
        assert!(db.get("a").unwrap().is_none());
        assert!(db.get("b").unwrap().is_none());
    }

    #[test]
    fn reopen_from_disk_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epc.db");
        {
            let db = Database::open_path(&path).unwrap();
            db.set("k", "v").unwrap();
        }
        let db = Database::open_path(&path).unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("v"));
    }
}
