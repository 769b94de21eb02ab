//! Shared test utilities for progression integration tests

use chrono::{DateTime, Local, TimeZone, Utc};
use learnquest::storage::{Persistence, SqliteBackend};
use tempfile::TempDir;

/// A SQLite-backed data directory that outlives individual sessions
pub struct TestStore {
    pub dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Fresh persistence handle for `user`, as a new process would open it
    pub fn persistence(&self, user: &str) -> Persistence {
        let backend = SqliteBackend::open(&self.dir.path().join("progress.db"))
            .expect("Failed to open progress db");
        Persistence::new(Box::new(backend), user)
    }
}

/// Noon local time on the given March 2024 day, as UTC
pub fn day(n: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(2024, 3, n, 12, 0, 0)
        .single()
        .expect("unambiguous local time")
        .with_timezone(&Utc)
}
