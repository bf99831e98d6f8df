//! Durable key-value storage backends for persisted workflows.
//!
//! The store writes one serialized record per key. `FileStore` keeps each key
//! in its own JSON file; `MemoryStore` keeps them in-process and can enforce a
//! byte quota to exercise the write-failure path.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::{ylog_debug, Error, Result};

/// Minimal key-value contract the workflow store persists through.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Validate a storage key so it can double as a file stem.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidKey(key.to_string()))
    }
}

/// One `<key>.json` file per key inside a directory.
///
/// Writes go through a temp file and a rename; the previous contents are kept
/// as `<key>.json.bak`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            ylog_debug!("FileStore::get key={} (absent)", key);
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;

        if !self.dir.exists() {
            ylog_debug!("Creating storage directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir)?;
        }

        if path.exists() {
            fs::copy(&path, path.with_extension("json.bak"))?;
        }

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;
        ylog_debug!("FileStore::set key={} bytes={}", key, value.len());
        Ok(())
    }
}

/// In-process storage, optionally capped at `quota` bytes across all keys.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }

    /// Seed a raw value, bypassing the quota.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn used_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(limit) = self.quota {
            let size = self.used_excluding(key) + key.len() + value.len();
            if size > limit {
                return Err(Error::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    limit,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
