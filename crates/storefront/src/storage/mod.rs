//! Durable key/value storage for persisted session state.
//!
//! The cart lives in a single named slot of a [`KeyValueStore`]. Values are
//! opaque strings; callers own the encoding. A slot is always written
//! wholesale, never merged.
//!
//! # Backends
//!
//! - [`MemoryStore`] - In-process `HashMap`, for tests and throwaway sessions
//! - [`FileStore`] - One JSON file per key under a root directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key {0:?}: use ASCII letters, digits, '-', '_' or '.'")]
    InvalidKey(String),

    /// Reading, writing or removing the slot failed.
    #[error("storage I/O error for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// A string-valued key/value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key is invalid or the backend fails.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key is invalid or the backend fails.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key is invalid or the backend fails.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Check that a key is safe to use as a file stem.
///
/// Keys are limited to ASCII alphanumerics, `-`, `_` and `.`, must be
/// non-empty and must not start with `.`.
///
/// # Errors
///
/// Returns `StorageError::InvalidKey` if the key breaks those rules.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
