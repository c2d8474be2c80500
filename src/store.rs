// Key-value persistence backed by SQLite

use crate::error::{Result, RollError};
use crate::models::now_ms;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CURRENT_VERSION: u32 = 1;

/// Minimal persistence contract: whole values stored under string keys
pub trait KeyValue {
    /// Fetch the value for `key`, `None` when it was never set or was removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Persistent key-value store living in a `.taskroll` directory
pub struct Store {
    base_path: PathBuf,
    db: Connection,
}

impl Store {
    /// Open or create a store at the given path
    ///
    /// The store will be created in a `.taskroll` subdirectory of the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().join(".taskroll");

        fs::create_dir_all(&base_path).map_err(|source| RollError::Write {
            path: base_path.clone(),
            source,
        })?;

        let db = Connection::open(base_path.join("taskroll.db"))?;

        let store = Self { base_path, db };
        store.create_schema()?;
        store.create_gitignore()?;
        store.write_version()?;

        debug!(path = ?store.base_path, "Store opened");
        Ok(store)
    }

    /// Get the base path of this store
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn create_schema(&self) -> Result<()> {
        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn create_gitignore(&self) -> Result<()> {
        let gitignore_path = self.base_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(&gitignore_path, "taskroll.db\ntaskroll.db-shm\ntaskroll.db-wal\n").map_err(
                |source| RollError::Write {
                    path: gitignore_path.clone(),
                    source,
                },
            )?;
        }
        Ok(())
    }

    fn write_version(&self) -> Result<()> {
        let version_path = self.base_path.join(".version");
        if !version_path.exists() {
            fs::write(&version_path, CURRENT_VERSION.to_string()).map_err(|source| RollError::Write {
                path: version_path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl KeyValue for Store {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        debug!(key, bytes = value.len(), "kv set");

        self.db.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, now_ms()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        debug!(key, "kv remove");

        self.db.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// In-process store, handy for embedding and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.values.remove(key);
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(RollError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.len() > 256 {
        return Err(RollError::InvalidKey(format!("key too long: {} chars (max 256)", key.len())));
    }
    Ok(())
}
