//! Resume file storage
//!
//! Files are addressed by the path returned from [`FileStore::save`]; that
//! path is what gets recorded on the user row.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),

    /// Key or path that would escape the storage root
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `bytes` under a flat `key`, overwriting, and return its path
    async fn save(&self, bytes: &[u8], key: &str) -> StorageResult<String>;

    async fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Remove the file; a missing file is not an error
    async fn delete(&self, path: &str) -> StorageResult<()>;

    async fn exists(&self, path: &str) -> StorageResult<bool>;
}

/// Files on local disk under a single root directory
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for_key(&self, key: &str) -> StorageResult<PathBuf> {
        let mut components = Path::new(key).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(key)),
            _ => Err(StorageError::InvalidKey(key.to_string())),
        }
    }

    /// Only paths directly inside the root are served
    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        let candidate = Path::new(path);
        match (candidate.parent(), candidate.file_name()) {
            (Some(parent), Some(name)) if parent == self.root => {
                self.path_for_key(&name.to_string_lossy())
            }
            _ => Err(StorageError::InvalidKey(path.to_string())),
        }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, bytes: &[u8], key: &str) -> StorageResult<String> {
        let target = self.path_for_key(key)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&target, bytes).await?;
        debug!(path = %target.display(), size = bytes.len(), "Stored file");
        Ok(target.to_string_lossy().into_owned())
    }

    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let target = self.resolve(path)?;
        match tokio::fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(path.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let target = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&target).await?)
    }
}
