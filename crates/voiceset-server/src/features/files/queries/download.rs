//! Download blob query
//!
//! Resolves a stored key to its bytes plus the MIME type derived from the
//! key's extension. Keys that fail validation are reported as not-found
//! rather than echoing what was wrong with them.

use serde::{Deserialize, Serialize};

use crate::storage::{content_type, BlobError, BlobStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadBlobQuery {
    pub key: String,
}

/// Resolved blob bytes and serving metadata
#[derive(Debug)]
pub struct DownloadBlobResponse {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadBlobError {
    #[error("File key is required and cannot be empty")]
    KeyRequired,
    #[error("File '{0}' not found")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(BlobError),
}

impl DownloadBlobQuery {
    pub fn validate(&self) -> Result<(), DownloadBlobError> {
        if self.key.trim().is_empty() {
            return Err(DownloadBlobError::KeyRequired);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(storage))]
pub async fn handle(
    storage: BlobStore,
    query: DownloadBlobQuery,
) -> Result<DownloadBlobResponse, DownloadBlobError> {
    query.validate()?;

    let bytes = storage.get(&query.key).await.map_err(|e| match e {
        BlobError::NotFound(key) => DownloadBlobError::NotFound(key),
        BlobError::InvalidKey(key) => DownloadBlobError::NotFound(key),
        other => DownloadBlobError::Storage(other),
    })?;

    Ok(DownloadBlobResponse {
        content_type: content_type(&query.key),
        file_name: query.key.clone(),
        bytes,
    })
}
