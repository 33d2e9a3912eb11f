//! Core traits for the persistence collaborator
//!
//! This module defines the key-value store abstraction the core reads from at
//! startup and writes to after each mutation. Implementations can be backed by
//! files or held in memory, and are used interchangeably through this trait.

use crate::types::SplitError;
use futures::future::BoxFuture;

/// Logical key holding the JSON array of all persons
pub const PERSONS_KEY: &str = "persons";

/// Logical key holding the JSON array of all groups
pub const GROUPS_KEY: &str = "groups";

/// Trait for an asynchronous key-value byte store
///
/// Values are opaque bytes; the core stores JSON arrays under
/// [`PERSONS_KEY`] and [`GROUPS_KEY`]. Writes always replace the whole value.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, SplitError>>;

    /// Replace the value stored under `key`
    fn set<'a>(&'a self, key: &'a str, value: Vec<u8>) -> BoxFuture<'a, Result<(), SplitError>>;
}
