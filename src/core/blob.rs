//! Binary file storage for profile photos
//!
//! A blob is written completely or not at all: [`LocalBlobStore`] writes to a
//! temporary file and renames it into place, so a key returned by `save`
//! always names a complete file.

use async_trait::async_trait;
use axum::body::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use super::error::{ShelfResult, StorageError};

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `data` under a key derived from `name`, returning the stored key
    async fn save(&self, name: &str, data: Bytes) -> ShelfResult<String>;

    /// Remove a stored blob. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> ShelfResult<()>;
}

/// Reduce a client-supplied file name to a safe single path component
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

fn blob_error(err: impl std::fmt::Display) -> StorageError {
    StorageError::Blob {
        message: err.to_string(),
    }
}

/// Blob store rooted in a local directory
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn save(&self, name: &str, data: Bytes) -> ShelfResult<String> {
        let key = format!("photos/{}-{}", Uuid::new_v4(), sanitize_file_name(name));
        let path = self.path_for(&key);
        let partial = path.with_extension("partial");

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(blob_error)?;
        }

        if let Err(err) = tokio::fs::write(&partial, &data).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(blob_error(err).into());
        }
        if let Err(err) = tokio::fs::rename(&partial, &path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(blob_error(err).into());
        }

        tracing::debug!(key = %key, bytes = data.len(), "stored blob");
        Ok(key)
    }

    async fn delete(&self, key: &str) -> ShelfResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(blob_error(err).into()),
        }
    }
}

/// Blob store kept in memory, for tests and development
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.blobs.read().ok()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn save(&self, name: &str, data: Bytes) -> ShelfResult<String> {
        let key = format!("photos/{}-{}", Uuid::new_v4(), sanitize_file_name(name));
        self.blobs
            .write()
            .map_err(|_| StorageError::LockPoisoned {
                backend: "in-memory blob",
                kind: "write",
            })?
            .insert(key.clone(), data);
        Ok(key)
    }

    async fn delete(&self, key: &str) -> ShelfResult<()> {
        self.blobs
            .write()
            .map_err(|_| StorageError::LockPoisoned {
                backend: "in-memory blob",
                kind: "write",
            })?
            .remove(key);
        Ok(())
    }
}
