//! Persisted, case-insensitive set of searched city names.
//!
//! The whole list is stored as one JSON array of display names under
//! [`HISTORY_KEY`] and rewritten on every change.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::HISTORY_KEY;

/// String key-value storage backing the history.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        // Write-then-rename so readers never observe a half-written file
        let path = self.path_for(key);
        let tmp = tmp_path(&path);
        std::fs::write(&tmp, value).with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// In-memory storage for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub display_name: String,
    pub normalized_key: String,
}

impl HistoryEntry {
    /// Returns `None` for blank names.
    pub fn new(display_name: &str) -> Option<Self> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return None;
        }
        Some(Self {
            display_name: display_name.to_string(),
            normalized_key: normalize_key(display_name),
        })
    }
}

pub fn normalize_key(display_name: &str) -> String {
    display_name.trim().to_lowercase()
}

pub struct HistoryStore {
    storage: Arc<dyn KeyValueStore>,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl HistoryStore {
    /// Opens the store, loading whatever the storage already holds.
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let store = Self {
            storage,
            entries: Mutex::new(Vec::new()),
        };
        let loaded = store.load_persisted();
        tracing::info!("Loaded {} saved cities", loaded.len());
        *store.entries.lock() = loaded;
        store
    }

    /// Reads the persisted list. Missing or unreadable data yields an empty list.
    pub fn load_persisted(&self) -> Vec<HistoryEntry> {
        let raw = match self.storage.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read saved cities: {:#}", e);
                return Vec::new();
            }
        };

        let names: Vec<String> = match serde_json::from_str(&raw) {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Ignoring malformed saved cities: {}", e);
                return Vec::new();
            }
        };

        let mut entries: Vec<HistoryEntry> = Vec::with_capacity(names.len());
        for entry in names.iter().filter_map(|name| HistoryEntry::new(name)) {
            if !entries.iter().any(|e| e.normalized_key == entry.normalized_key) {
                entries.push(entry);
            }
        }
        entries
    }

    /// Writes the current list to storage.
    pub fn persist(&self) -> Result<()> {
        let entries = self.entries.lock();
        self.write(&entries)
    }

    fn write(&self, entries: &[HistoryEntry]) -> Result<()> {
        let names: Vec<&str> = entries.iter().map(|e| e.display_name.as_str()).collect();
        let json = serde_json::to_string(&names)?;
        self.storage.set(HISTORY_KEY, &json)
    }

    /// Inserts `display_name` unless an entry with the same key exists.
    /// Returns whether it was newly inserted.
    pub fn add(&self, display_name: &str) -> Result<bool> {
        let Some(entry) = HistoryEntry::new(display_name) else {
            return Ok(false);
        };

        let mut entries = self.entries.lock();
        if entries.iter().any(|e| e.normalized_key == entry.normalized_key) {
            return Ok(false);
        }

        entries.push(entry);
        if let Err(e) = self.write(&entries) {
            entries.pop();
            return Err(e);
        }
        Ok(true)
    }

    /// Removes the entry matching `display_name` case-insensitively.
    pub fn remove(&self, display_name: &str) -> Result<bool> {
        let key = normalize_key(display_name);

        let mut entries = self.entries.lock();
        let Some(index) = entries.iter().position(|e| e.normalized_key == key) else {
            return Ok(false);
        };

        let removed = entries.remove(index);
        if let Err(e) = self.write(&entries) {
            entries.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    pub fn contains(&self, display_name: &str) -> bool {
        let key = normalize_key(display_name);
        self.entries.lock().iter().any(|e| e.normalized_key == key)
    }

    /// Entries in insertion order.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.lock().clone()
    }
}
