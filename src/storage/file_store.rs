//! File-backed key-value store
//!
//! Each key maps to `<data_dir>/<key>.json`. Writes go to a temporary sibling
//! file first and are then renamed into place, so a crashed write never leaves
//! a truncated value behind. A missing file reads as "nothing stored".

use crate::core::traits::KeyValueStore;
use crate::types::SplitError;
use futures::future::{BoxFuture, FutureExt};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value store keeping one JSON file per key under a directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `root`
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileKeyValueStore { root: root.into() }
    }

    /// Directory holding the value files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    ///
    /// Keys must be plain names; anything that could escape the data
    /// directory is rejected.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, SplitError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(SplitError::storage(key, "invalid key name"));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, SplitError>> {
        async move {
            let path = self.path_for(key)?;
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(SplitError::storage(key, e)),
            }
        }
        .boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: Vec<u8>) -> BoxFuture<'a, Result<(), SplitError>> {
        async move {
            let path = self.path_for(key)?;
            let tmp = self.root.join(format!(".{}.json.tmp", key));

            tokio::fs::create_dir_all(&self.root)
                .await
                .map_err(|e| SplitError::storage(key, e))?;
            tokio::fs::write(&tmp, &value)
                .await
                .map_err(|e| SplitError::storage(key, e))?;
            tokio::fs::rename(&tmp, &path)
                .await
                .map_err(|e| SplitError::storage(key, e))?;
            Ok(())
        }
        .boxed()
    }
}
