//! In-memory storage backend
//!
//! Clones share the same map, so a test can drop a session and open a new
//! one against the same data.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use super::{RecordKey, StorageBackend};

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: Arc<Mutex<HashMap<(String, RecordKey), String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all users
    pub fn len(&self) -> usize {
        self.records.lock().expect("lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, user_id: &str, key: RecordKey) -> Result<Option<String>> {
        let records = self.records.lock().expect("lock");
        Ok(records.get(&(user_id.to_string(), key)).cloned())
    }

    fn set(&self, user_id: &str, key: RecordKey, value: &str) -> Result<()> {
        let mut records = self.records.lock().expect("lock");
        records.insert((user_id.to_string(), key), value.to_string());
        Ok(())
    }

    fn remove(&self, user_id: &str, key: RecordKey) -> Result<()> {
        let mut records = self.records.lock().expect("lock");
        records.remove(&(user_id.to_string(), key));
        Ok(())
    }
}
