// SYNOID Shorts History Cache
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Small key -> recent-values histories shared across runs (recently used
// assets, recently used CTA lines). Every mutation is persisted before the
// caller continues. No locking: one run per cache directory.

pub mod recency;

pub use recency::RecencyWindow;

use crate::error::Result;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

pub trait HistoryStore: Send + Sync {
    /// Values stored under `key`, oldest first. Missing keys are empty.
    fn load(&self, key: &str) -> Result<Vec<String>>;

    fn store(&self, key: &str, values: &[String]) -> Result<()>;

    /// Read the window under `key`, bounded to `capacity`.
    fn window(&self, key: &str, capacity: usize) -> Result<RecencyWindow> {
        Ok(RecencyWindow::from_values(capacity, self.load(key)?))
    }

    /// Read-modify-write: append `value` and persist the bounded window.
    fn append(&self, key: &str, value: &str, capacity: usize) -> Result<RecencyWindow> {
        let mut window = self.window(key, capacity)?;
        window.push(value);
        self.store(key, &window.to_vec())?;
        Ok(window)
    }
}

/// JSON file backed store: `{ "<key>": ["v1", "v2", ...], ... }`.
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            fs::write(&path, "{}")?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.read_all()?.remove(key).unwrap_or_default())
    }

    fn store(&self, key: &str, values: &[String]) -> Result<()> {
        let mut payload = self.read_all()?;
        payload.insert(key.to_string(), values.to_vec());
        let json = serde_json::to_string_pretty(&payload)?;
        fs::write(&self.path, json)?;
        debug!("[CACHE] {:?} <- {} ({} values)", self.path, key, values.len());
        Ok(())
    }
}

/// In-process store for tests and dry runs.
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self, key: &str) -> Result<Vec<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned().unwrap_or_default())
    }

    fn store(&self, key: &str, values: &[String]) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), values.to_vec());
        Ok(())
    }
}
