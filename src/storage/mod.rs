//! Key-value storage tiers.
//!
//! Two tiers hold locale preferences and the sitemap cache:
//!
//! | Tier      | Adapter        | Lifetime                      |
//! |-----------|----------------|-------------------------------|
//! | session   | [`MemoryStore`] | one process (one visit session) |
//! | durable   | [`FileStore`]   | across runs, one JSON file per key |
//!
//! All reads and writes made by the rest of the crate go through
//! [`read_json`] / [`write_json`] / [`remove`], which never fail: a storage
//! error or malformed payload reads as "absent" and a failed write is only
//! reported at debug level.

mod file;
mod memory;

use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::debug;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage access errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid storage key `{0}`")]
    InvalidKey(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key-value store (the shape of browser session/local storage).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value. Errors and malformed payloads read as `None`.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            debug!("storage"; "read `{}` failed: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("storage"; "ignoring malformed `{}`: {}", key, e);
            None
        }
    }
}

/// Encode and write a JSON value, best-effort.
pub fn write_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("storage"; "encode `{}` failed: {}", key, e);
            return;
        }
    };

    if let Err(e) = store.set(key, &raw) {
        debug!("storage"; "write `{}` failed: {}", key, e);
    }
}

/// Remove a key, best-effort.
pub fn remove(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        debug!("storage"; "remove `{}` failed: {}", key, e);
    }
}

/// A store whose every operation fails. Stands in for disabled storage.
#[cfg(test)]
pub struct UnavailableStore;

#[cfg(test)]
impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disabled".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disabled".into()))
    }
}
