//! Filesystem blob store for uploaded audio.
//!
//! Blobs are addressed by opaque keys the store issues at write time:
//! a fresh UUID plus a sanitized extension taken from the (untrusted)
//! original filename. The original name itself is never used as a storage
//! key; callers persist it separately as metadata.
//!
//! A legacy directory from the earlier public-serving layout may still hold
//! blobs, so reads and deletes try every known location in order. Deletes
//! are idempotent: a missing file at any location is success.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use voiceset_common::checksum::sha256_hex;

use crate::config::StorageSettings;

/// Longest accepted blob key; a UUID plus a short extension stays well under this.
const MAX_KEY_LENGTH: usize = 128;

/// Longest extension carried over from an original filename.
const MAX_EXTENSION_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum BlobError {
    /// Key is empty, too long, or contains path characters
    #[error("Blob key '{0}' is not valid")]
    InvalidKey(String),

    /// Key resolved to no file in any known location
    #[error("Blob '{0}' not found")]
    NotFound(String),

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of persisting a blob
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub key: String,
    pub checksum: String,
    pub size: i64,
}

/// Filesystem-backed blob store
#[derive(Clone)]
pub struct BlobStore {
    root: PathBuf,
    legacy_roots: Vec<PathBuf>,
}

impl BlobStore {
    /// Create the store, ensuring the primary directory exists.
    ///
    /// Legacy directories are read/delete targets only and are not created.
    pub async fn new(settings: &StorageSettings) -> Result<Self, BlobError> {
        tokio::fs::create_dir_all(&settings.upload_dir).await?;

        info!(root = %settings.upload_dir.display(), "Blob store initialized");

        Ok(Self {
            root: settings.upload_dir.clone(),
            legacy_roots: settings.legacy_upload_dir.iter().cloned().collect(),
        })
    }

    /// Persist `content` under a freshly allocated key and return it.
    ///
    /// The write is atomic with respect to readers: bytes land in a
    /// temporary file which is renamed into place.
    #[instrument(skip(self, content))]
    pub async fn put(
        &self,
        content: &[u8],
        original_file_name: Option<&str>,
    ) -> Result<StoredBlob, BlobError> {
        let key = allocate_key(original_file_name);

        let final_path = self.root.join(&key);
        let tmp_path = self.root.join(format!("{key}.part"));

        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &final_path).await?;

        let size = content.len() as i64;
        debug!(key = %key, size, "Stored blob");

        Ok(StoredBlob {
            key,
            checksum: sha256_hex(content),
            size,
        })
    }

    /// Read a blob's bytes, trying the primary location, then legacy ones.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Result<Vec<u8>, BlobError> {
        validate_key(key)?;

        for path in self.locations(key) {
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    debug!(key = %key, path = %path.display(), "Read blob");
                    return Ok(bytes);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(BlobError::Io(e)),
            }
        }

        Err(BlobError::NotFound(key.to_string()))
    }

    /// Check whether a blob exists at any known location.
    #[instrument(skip(self))]
    pub async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        validate_key(key)?;

        for path in self.locations(key) {
            if tokio::fs::try_exists(&path).await? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Remove a blob from every known location, idempotently.
    ///
    /// Absence at a location is success. Unexpected per-location errors are
    /// logged and tolerated; only when every location errors does the call
    /// fail, so a retry after a partial delete is a no-op rather than an
    /// error.
    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<(), BlobError> {
        validate_key(key)?;

        let mut attempts = 0usize;
        let mut failures = 0usize;
        let mut last_error: Option<std::io::Error> = None;

        for path in self.locations(key) {
            attempts += 1;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(key = %key, path = %path.display(), "Deleted blob"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(key = %key, path = %path.display(), error = %e, "Blob delete failed at location");
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if failures == attempts => Err(BlobError::Io(e)),
            _ => Ok(()),
        }
    }

    /// All paths that may hold this key, primary root first.
    fn locations<'a>(&'a self, key: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        std::iter::once(&self.root)
            .chain(self.legacy_roots.iter())
            .map(move |root| root.join(key))
    }
}

/// Allocate a fresh collision-resistant key: `{uuid}{extension}`.
///
/// The extension comes from the caller-supplied filename but is restricted
/// to a short alphanumeric suffix; anything else is dropped.
pub fn allocate_key(original_file_name: Option<&str>) -> String {
    let id = Uuid::new_v4();
    match original_file_name.and_then(sanitized_extension) {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

fn sanitized_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > MAX_EXTENSION_LENGTH {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Reject keys that could escape the storage roots.
fn validate_key(key: &str) -> Result<(), BlobError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(BlobError::InvalidKey(key.to_string()))
    }
}

/// MIME type for a stored key, derived from its extension.
///
/// Used only when serving bytes back; storage itself is type-agnostic.
pub fn content_type(key: &str) -> &'static str {
    let ext = Path::new(key)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}
