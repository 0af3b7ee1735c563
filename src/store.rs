use crate::db;
use crate::model::StateRecord;
use anyhow::Context;
use rusqlite::Connection;
use tracing::{debug, warn};

pub const DEFAULT_STORAGE_KEY: &str = "slc_state_v1";

/// Durable string key-value storage holding the serialized record.
pub trait KvStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KvStorage for SqliteStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        db::kv_get(&self.conn, key)
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        db::kv_set(&self.conn, key, value)
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        db::kv_remove(&self.conn, key)
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KvStorage for MemoryStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Persistent store for the one record. Read failures never escape `load`.
pub struct Store {
    storage: Box<dyn KvStorage>,
    key: String,
}

impl Store {
    pub fn new(storage: Box<dyn KvStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored record merged over defaults, or plain defaults when storage is
    /// empty, unreadable, or holds something that is not JSON.
    pub fn load(&self) -> StateRecord {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no stored state, using defaults");
                return StateRecord::default();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read stored state, using defaults");
                return StateRecord::default();
            }
        };
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(v) => StateRecord::merged_over_defaults(&v),
            Err(e) => {
                warn!(key = %self.key, error = %e, "stored state is not valid JSON, using defaults");
                StateRecord::default()
            }
        }
    }

    pub fn save(&mut self, record: &StateRecord) -> anyhow::Result<()> {
        let raw = serde_json::to_string(record).context("failed to serialize state")?;
        self.storage
            .set(&self.key, &raw)
            .with_context(|| format!("failed to write state under {}", self.key))
    }

    pub fn clear(&mut self) -> anyhow::Result<()> {
        self.storage
            .remove(&self.key)
            .with_context(|| format!("failed to remove state under {}", self.key))
    }

    #[cfg(test)]
    pub fn raw(&self) -> anyhow::Result<Option<String>> {
        self.storage.get(&self.key)
    }
}
