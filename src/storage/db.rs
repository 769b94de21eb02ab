//! SQLite storage backend
//!
//! Manages the `~/.learnquest/progress.db` database.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use super::{RecordKey, StorageBackend};

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Database wrapper, cheap to clone
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Open or create the progress database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open progress db: {}", path.display()))?;

        // WAL lets a second session read while another writes
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory db")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Get a reference to the connection
    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("Progress DB lock poisoned")
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        conn.execute("INSERT OR IGNORE INTO schema_version VALUES (?1)", [SCHEMA_VERSION])?;
        Ok(())
    }
}

impl StorageBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn get(&self, user_id: &str, key: RecordKey) -> Result<Option<String>> {
        let conn = self.conn();
        let value = conn
            .query_row(
                "SELECT value FROM records WHERE user_id = ?1 AND key = ?2",
                (user_id, key.as_str()),
                |r| r.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read record {}", key))?;
        Ok(value)
    }

    fn set(&self, user_id: &str, key: RecordKey, value: &str) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        let conn = self.conn();
        conn.execute(
            r#"
            INSERT INTO records (user_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, key) DO UPDATE SET
                value = ?3, updated_at = ?4
            "#,
            (user_id, key.as_str(), value, now),
        )
        .with_context(|| format!("Failed to write record {}", key))?;
        Ok(())
    }

    fn remove(&self, user_id: &str, key: RecordKey) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "DELETE FROM records WHERE user_id = ?1 AND key = ?2",
            (user_id, key.as_str()),
        )?;
        Ok(())
    }
}

/// SQL schema for the progress database
const SCHEMA_SQL: &str = r#"
-- One JSON document per (user, logical record)
CREATE TABLE IF NOT EXISTS records (
    user_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, key)
);
CREATE INDEX IF NOT EXISTS idx_records_user ON records(user_id);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
"#;
