//! Load and best-effort save of the state store
//!
//! The persister sits between the in-memory [`StateStore`] and a
//! [`KeyValueStore`]. It reads both collections once at startup and, after
//! every mutation, writes the full collection back in a background task.
//!
//! # Write Semantics
//!
//! Writes are fire-and-forget relative to the in-memory update:
//! 1. The caller mutates the state store (optimistic update)
//! 2. The caller schedules a write of the full collection
//! 3. The write runs on the tokio runtime; on failure a warning is logged and
//!    a [`PersistenceAlert`] is queued
//!
//! In-memory state is never rolled back, so durable and in-memory state can
//! diverge until the next successful write of the same key.
//!
//! Writes to the same key are chained: each new write waits for the previous
//! one, so an older snapshot can never overwrite a newer one.
//!
//! Scheduling outside a tokio runtime cannot start a write; it is reported as
//! a failed save instead.

use crate::core::state_store::StateStore;
use crate::core::traits::{KeyValueStore, GROUPS_KEY, PERSONS_KEY};
use crate::types::{Group, Person, SplitError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A persistence failure surfaced to the user as a transient alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceAlert {
    /// Key whose write failed
    pub key: String,
    /// Human-readable failure description
    pub message: String,
}

impl std::fmt::Display for PersistenceAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to save {}: {}", self.key, self.message)
    }
}

/// Which collections were hydrated by [`Persister::load`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of persons taken from storage
    pub persons: usize,
    /// Number of groups taken from storage
    pub groups: usize,
}

/// Reads and writes the `persons` and `groups` collections
pub struct Persister {
    store: Arc<dyn KeyValueStore>,
    /// Most recent write per key
    pending: HashMap<&'static str, JoinHandle<()>>,
    alerts_tx: mpsc::UnboundedSender<PersistenceAlert>,
    alerts_rx: mpsc::UnboundedReceiver<PersistenceAlert>,
}

impl Persister {
    /// Create a persister over the given store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (alerts_tx, alerts_rx) = mpsc::unbounded_channel();
        Persister {
            store,
            pending: HashMap::new(),
            alerts_tx,
            alerts_rx,
        }
    }

    /// Hydrate empty collections of `state` from storage
    ///
    /// A collection that already holds data in memory is neither read nor
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if a key cannot be read or its JSON cannot be decoded.
    pub async fn load(&self, state: &mut StateStore) -> Result<LoadReport, SplitError> {
        let mut report = LoadReport::default();

        if state.persons().is_empty() {
            if let Some(persons) = self.read_collection::<Person>(PERSONS_KEY).await? {
                report.persons = persons.len();
                state.load_persons(persons);
            }
        }

        if state.groups().is_empty() {
            if let Some(groups) = self.read_collection::<Group>(GROUPS_KEY).await? {
                report.groups = groups.len();
                state.load_groups(groups);
            }
        }

        info!(
            persons = report.persons,
            groups = report.groups,
            "loaded state from storage"
        );
        Ok(report)
    }

    async fn read_collection<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<Vec<T>>, SplitError> {
        let Some(bytes) = self.store.get(key).await? else {
            debug!(key, "nothing stored");
            return Ok(None);
        };

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            warn!(key, error = %e, "stored data is not valid JSON");
            SplitError::serialization(key, &e)
        })
    }

    /// Schedule a write of the full persons collection
    pub fn schedule_persons(&mut self, persons: &[Person]) {
        self.schedule(PERSONS_KEY, persons);
    }

    /// Schedule a write of the full groups collection
    pub fn schedule_groups(&mut self, groups: &[Group]) {
        self.schedule(GROUPS_KEY, groups);
    }

    fn schedule<T: Serialize>(&mut self, key: &'static str, items: &[T]) {
        let bytes = match serde_json::to_vec(items) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key, error = %e, "failed to encode collection");
                self.alert(key, SplitError::serialization(key, &e).to_string());
                return;
            }
        };

        let Ok(runtime) = Handle::try_current() else {
            warn!(key, "no async runtime, collection not saved");
            self.alert(
                key,
                SplitError::storage(key, "no async runtime to run the write").to_string(),
            );
            return;
        };

        let store = Arc::clone(&self.store);
        let alerts = self.alerts_tx.clone();
        let previous = self.pending.remove(key);

        let handle = runtime.spawn(async move {
            if let Some(previous) = previous {
                if let Err(e) = previous.await {
                    warn!(key, error = %e, "previous write task did not complete");
                }
            }

            let len = bytes.len();
            match store.set(key, bytes).await {
                Ok(()) => debug!(key, bytes = len, "saved collection"),
                Err(e) => {
                    warn!(key, error = %e, "failed to save collection");
                    // The receiver lives as long as the persister; a closed
                    // channel only means nobody is listening anymore.
                    let _ = alerts.send(PersistenceAlert {
                        key: key.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        });

        self.pending.insert(key, handle);
    }

    fn alert(&self, key: &str, message: String) {
        let _ = self.alerts_tx.send(PersistenceAlert {
            key: key.to_string(),
            message,
        });
    }

    /// Number of scheduled writes that have not finished yet
    pub fn pending_writes(&self) -> usize {
        self.pending.values().filter(|h| !h.is_finished()).count()
    }

    /// Wait for every scheduled write, then return all queued alerts
    pub async fn flush(&mut self) -> Vec<PersistenceAlert> {
        for (key, handle) in self.pending.drain() {
            if let Err(e) = handle.await {
                warn!(key, error = %e, "write task did not complete");
            }
        }
        self.drain_alerts()
    }

    /// Take the alerts queued so far without waiting for pending writes
    pub fn drain_alerts(&mut self) -> Vec<PersistenceAlert> {
        let mut alerts = Vec::new();
        while let Ok(alert) = self.alerts_rx.try_recv() {
            alerts.push(alert);
        }
        alerts
    }
}
