//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Temporary storage directories backed by `FileStore`
//! - A shared in-memory store that stays inspectable after the
//!   `WorkflowStore` takes ownership of it
//! - Seeding workflows with titled steps

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use yit::storage::{FileStore, KeyValueStore, MemoryStore};
use yit::workflow::{StepPatch, WorkflowStore};
use yit::Result;

/// Storage key used by most tests.
pub const KEY: &str = "yit-workflow";

/// A temporary data directory holding persisted workflows.
pub struct TestHome {
    /// Kept alive so the directory survives for the duration of the test.
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestHome {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().to_path_buf();
        Self { temp_dir, path }
    }

    /// Open a store the way the binary does: a `FileStore` over this directory.
    pub fn open(&self, key: &str) -> WorkflowStore {
        WorkflowStore::open(Box::new(FileStore::new(&self.path)), key)
    }

    pub fn file(&self, key: &str) -> PathBuf {
        self.path.join(format!("{key}.json"))
    }

    pub fn write_raw(&self, key: &str, content: &str) {
        fs::write(self.file(key), content).expect("Failed to write raw record");
    }

    pub fn read_raw(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.file(key)).ok()
    }
}

/// In-memory storage shared between the test and the store under test.
#[derive(Clone, Default)]
pub struct SharedMemory(pub Arc<Mutex<MemoryStore>>);

impl SharedMemory {
    pub fn with_quota(quota: usize) -> Self {
        Self(Arc::new(Mutex::new(MemoryStore::with_quota(quota))))
    }

    pub fn set_quota(&self, quota: Option<usize>) {
        self.0.lock().unwrap().set_quota(quota);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().raw(key).map(str::to_string)
    }

    pub fn open(&self, key: &str) -> WorkflowStore {
        WorkflowStore::open(Box::new(self.clone()), key)
    }
}

impl KeyValueStore for SharedMemory {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.0.lock().unwrap().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.0.lock().unwrap().set(key, value)
    }
}

/// Append one step per title, each with a matching prompt, then point at
/// the first step.
pub fn seed(store: &mut WorkflowStore, titles: &[&str]) {
    for title in titles {
        store.create_step_with(
            StepPatch::default()
                .title(*title)
                .instructions(format!("Prompt for {title}")),
        );
    }
    if !titles.is_empty() {
        store.select(0usize);
    }
}

/// Titles of the steps in order.
pub fn titles(store: &WorkflowStore) -> Vec<String> {
    store
        .workflow()
        .steps()
        .iter()
        .map(|s| s.title.clone())
        .collect()
}
