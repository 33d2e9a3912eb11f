//! Storage module
//!
//! Adapters for the key-value persistence collaborator plus the persister
//! that loads and saves the state store through them.
//!
//! # Components
//!
//! - `file_store` - One JSON file per key under a data directory
//! - `memory_store` - Volatile store with switchable write failures
//! - `persister` - Startup load and fire-and-forget saves

pub mod file_store;
pub mod memory_store;
pub mod persister;

pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
pub use persister::{LoadReport, PersistenceAlert, Persister};

use std::path::PathBuf;
use tracing::warn;

/// Default directory for the file-backed store
pub const DEFAULT_DATA_DIR: &str = "./splitter-data";

/// Configuration for the file-backed store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding `persons.json` and `groups.json`
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl StorageConfig {
    /// Create a StorageConfig, falling back to the default for an empty path
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        if data_dir.as_os_str().is_empty() {
            warn!(
                default = DEFAULT_DATA_DIR,
                "Empty data directory, using default"
            );
            return Self::default();
        }
        Self { data_dir }
    }

    /// Open the file-backed store described by this configuration
    pub fn open_store(&self) -> FileKeyValueStore {
        FileKeyValueStore::new(&self.data_dir)
    }
}
