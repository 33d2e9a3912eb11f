//! In-memory key-value store
//!
//! Holds values in a mutex-guarded map. Writes can be switched to fail on
//! demand, which makes the persistence-divergence path observable in tests
//! and in embedding applications that want a volatile store.

use crate::core::traits::KeyValueStore;
use crate::types::SplitError;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Volatile key-value store
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `value` under `key`
    pub fn with_value(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.into());
        }
        store
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current raw value under `key`
    pub fn value(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, SplitError>> {
        async move {
            let entries = self
                .entries
                .lock()
                .map_err(|_| SplitError::storage(key, "store lock poisoned"))?;
            Ok(entries.get(key).cloned())
        }
        .boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: Vec<u8>) -> BoxFuture<'a, Result<(), SplitError>> {
        async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(SplitError::storage(key, "write rejected"));
            }
            let mut entries = self
                .entries
                .lock()
                .map_err(|_| SplitError::storage(key, "store lock poisoned"))?;
            entries.insert(key.to_string(), value);
            Ok(())
        }
        .boxed()
    }
}
