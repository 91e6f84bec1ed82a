//! Append-only event log storage.
//!
//! The whole log lives under a single well-known key in a key-value
//! persistence collaborator, as one JSON array of events. `append` is a
//! read-modify-write cycle: two writers racing on the same backing store can
//! lose one append (last-write-wins on the persisted collection). That is an
//! accepted, documented weakness of this design, not a guarantee to build
//! on.

use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::event::Event;

/// Storage key holding the entire event collection.
pub const STORAGE_KEY: &str = "tml_logs_v1";

/// Storage errors.
#[derive(Debug)]
pub enum StoreError {
    Io(String),
    Serialize(String),
    Parse(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {e}"),
            StoreError::Serialize(e) => write!(f, "Serialize error: {e}"),
            StoreError::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Key-value persistence collaborator.
///
/// Values are `serde_json::Value` so backends stay format-agnostic; the log
/// store neither knows nor cares how a backend physically persists them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory backend for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-per-key JSON backend rooted at a directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&path).map_err(|e| StoreError::Io(e.to_string()))?;
        let value =
            serde_json::from_str(&content).map_err(|e| StoreError::Parse(e.to_string()))?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io(e.to_string()))?;
        let content =
            serde_json::to_string(&value).map_err(|e| StoreError::Serialize(e.to_string()))?;
        std::fs::write(self.key_path(key), content).map_err(|e| StoreError::Io(e.to_string()))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_file(path).map_err(|e| StoreError::Io(e.to_string()))
    }
}

/// The append-only event log.
pub struct EventLogStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> EventLogStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Get all events, oldest first.
    ///
    /// Callers wanting newest-first reverse it themselves.
    pub fn get_all(&self) -> Result<Vec<Event>, StoreError> {
        match self.backend.get(STORAGE_KEY)? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| StoreError::Parse(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Append one event to the end of the log.
    ///
    /// No uniqueness constraint; duplicates are allowed. On failure the
    /// persisted collection is left as it was.
    pub fn append(&mut self, event: Event) -> Result<(), StoreError> {
        let mut events = self.get_all()?;
        let kind = event.kind.clone();
        events.push(event);
        let count = events.len();
        let value =
            serde_json::to_value(events).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.backend.set(STORAGE_KEY, value)?;
        tracing::debug!(count, %kind, "appended event");
        Ok(())
    }

    /// Number of stored events.
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.get_all()?.len())
    }

    /// Remove the whole collection. A no-op when nothing is stored.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.backend.remove(STORAGE_KEY)?;
        tracing::debug!("event log cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(kind: &str) -> Event {
        Event::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(), kind)
    }

    #[test]
    fn test_append_then_get_all_round_trips() {
        let mut store = EventLogStore::new(MemoryStore::new());

        let first = event("click");
        let mut second = event("input");
        second.value = Some("abc".to_string());

        store.append(first.clone()).unwrap();
        store.append(second.clone()).unwrap();

        let events = store.get_all().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], first);
        assert_eq!(events[1], second);
    }

    #[test]
    fn test_duplicates_are_allowed() {
        let mut store = EventLogStore::new(MemoryStore::new());
        store.append(event("click")).unwrap();
        store.append(event("click")).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_clear_empties_the_log() {
        let mut store = EventLogStore::new(MemoryStore::new());
        store.append(event("click")).unwrap();
        store.clear().unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_clear_with_nothing_stored_succeeds() {
        let mut store = EventLogStore::new(MemoryStore::new());
        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_file_backend_persists_across_instances() {
        let dir = std::env::temp_dir().join(format!(
            "taskmine-logger-store-test-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);

        {
            let mut store = EventLogStore::new(JsonFileStore::new(dir.clone()));
            store.append(event("click")).unwrap();
            store.append(event("tab_created")).unwrap();
        }

        let store = EventLogStore::new(JsonFileStore::new(dir.clone()));
        let events = store.get_all().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, "tab_created");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
