//! Storage backend trait and shared types.
//!
//! The [`Storage`] trait is the only way the variant logic touches persisted
//! files. Keys are `/`-separated relative paths such as `images/photo.png`;
//! how they map to bytes on disk (or elsewhere) and to public URLs is up to the
//! implementation.
//!
//! The production implementation is [`LocalStorage`], a directory on the local
//! filesystem served under a public URL prefix.

mod local;

pub use local::LocalStorage;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Not found in storage: {0}")]
    NotFound(String),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
    #[error("Storage IO error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for storage backends.
///
/// Writes overwrite unconditionally. Two callers producing the same key write
/// the same bytes, so a lost race costs duplicate work, never corruption.
pub trait Storage {
    /// Whether a file is stored under `key`.
    fn exists(&self, key: &str) -> bool;

    /// Read the whole file stored under `key`.
    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Store `bytes` under `key`, replacing any previous content.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Remove the file stored under `key`. Missing files are
    /// [`StorageError::NotFound`].
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Publicly resolvable URL for `key`.
    fn url(&self, key: &str) -> String;
}

/// Join a public base URL and a storage key with exactly one `/` between them.
pub fn join_url(base: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}
