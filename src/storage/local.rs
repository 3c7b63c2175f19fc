//! Filesystem storage rooted at a directory.
//!
//! Key `images/photo.png` lives at `{root}/images/photo.png` and is served at
//! `{public_url}/images/photo.png`. Parent directories are created on write.

use super::{Storage, StorageError, join_url};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Local directory exposed under a public URL prefix.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for `key`.
    ///
    /// Only plain relative keys are accepted: absolute paths and `..` segments
    /// would escape the root.
    pub fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !plain {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

fn io_error(key: &str, source: io::Error) -> StorageError {
    if source.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound(key.to_string())
    } else {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl Storage for LocalStorage {
    fn exists(&self, key: &str) -> bool {
        self.path(key).is_ok_and(|path| path.is_file())
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path(key)?;
        std::fs::read(&path).map_err(|e| io_error(key, e))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                key: key.to_string(),
                source,
            })?;
        }
        std::fs::write(&path, bytes).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        std::fs::remove_file(&path).map_err(|e| io_error(key, e))
    }

    fn url(&self, key: &str) -> String {
        join_url(&self.public_url, key)
    }
}
