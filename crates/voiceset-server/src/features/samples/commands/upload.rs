//! Upload sample command
//!
//! Persists the audio bytes first, then the row referencing them. If the row
//! insert fails the fresh blob is orphaned; that risk is accepted rather
//! than wrapping two stores in a fake transaction. The dataset is checked
//! before the blob write so a bad dataset id costs nothing on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::features::samples::audio_path;
use crate::features::shared::error_helpers::map_foreign_key_violation;
use crate::features::shared::validation::{validate_transcript, TranscriptValidationError};
use crate::storage::{BlobError, BlobStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSampleCommand {
    /// Set from the path by the route handler.
    #[serde(skip)]
    pub dataset_id: Uuid,
    pub transcript: String,
    #[serde(skip)]
    pub content: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    /// Set from the session by the route handler.
    #[serde(skip)]
    pub uploader_id: Option<Uuid>,
}

/// Response from uploading a sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSampleResponse {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub transcript: String,
    pub audio_key: String,
    pub audio_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<Uuid>,
    pub checksum: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadSampleError {
    #[error("Transcript validation failed: {0}")]
    TranscriptValidation(#[from] TranscriptValidationError),
    #[error("Audio file is required and cannot be empty")]
    FileRequired,
    #[error("Dataset with ID '{0}' not found")]
    DatasetNotFound(Uuid),
    #[error("Storage error: {0}")]
    Storage(#[from] BlobError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UploadSampleCommand {
    pub fn validate(&self) -> Result<(), UploadSampleError> {
        validate_transcript(&self.transcript)?;
        if self.content.is_empty() {
            return Err(UploadSampleError::FileRequired);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, storage, command), fields(dataset_id = %command.dataset_id))]
pub async fn handle(
    pool: SqlitePool,
    storage: BlobStore,
    command: UploadSampleCommand,
) -> Result<UploadSampleResponse, UploadSampleError> {
    command.validate()?;

    let dataset_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM datasets WHERE id = ?)")
            .bind(command.dataset_id)
            .fetch_one(&pool)
            .await?;

    if !dataset_exists {
        return Err(UploadSampleError::DatasetNotFound(command.dataset_id));
    }

    let stored = storage
        .put(&command.content, command.original_file_name.as_deref())
        .await?;

    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO voice_samples \
         (id, transcript, audio_key, dataset_id, uploaded_by, original_file_name, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&command.transcript)
    .bind(&stored.key)
    .bind(command.dataset_id)
    .bind(command.uploader_id)
    .bind(&command.original_file_name)
    .bind(now)
    .execute(&pool)
    .await
    .map_err(|e| {
        // dataset vanished between the check and the insert; the blob written
        // above is now orphaned, which the delete flows tolerate
        map_foreign_key_violation(
            e,
            UploadSampleError::DatasetNotFound(command.dataset_id),
            UploadSampleError::Database,
        )
    })?;

    tracing::info!(sample_id = %id, audio_key = %stored.key, size = stored.size, "Sample uploaded");

    Ok(UploadSampleResponse {
        id,
        dataset_id: command.dataset_id,
        transcript: command.transcript,
        audio_path: audio_path(&stored.key),
        audio_key: stored.key,
        original_file_name: command.original_file_name,
        uploaded_by: command.uploader_id,
        checksum: stored.checksum,
        size: stored.size,
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageSettings;
    use crate::features::shared::test_helpers::{TestDataset, TestUser};

    async fn temp_store(dir: &tempfile::TempDir) -> BlobStore {
        BlobStore::new(&StorageSettings {
            upload_dir: dir.path().to_path_buf(),
            legacy_upload_dir: None,
        })
        .await
        .expect("blob store")
    }

    fn command(dataset_id: Uuid) -> UploadSampleCommand {
        UploadSampleCommand {
            dataset_id,
            transcript: "hello".to_string(),
            content: b"RIFFdata".to_vec(),
            original_file_name: Some("take1.wav".to_string()),
            uploader_id: None,
        }
    }

    #[test]
    fn test_validation_blank_transcript() {
        let mut cmd = command(Uuid::new_v4());
        cmd.transcript = "  ".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(UploadSampleError::TranscriptValidation(_))
        ));
    }

    #[test]
    fn test_validation_empty_file() {
        let mut cmd = command(Uuid::new_v4());
        cmd.content.clear();
        assert!(matches!(cmd.validate(), Err(UploadSampleError::FileRequired)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_stores_blob_and_row(pool: SqlitePool) -> sqlx::Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = temp_store(&dir).await;
        let user = TestUser::new("uploader@example.com").insert(&pool).await?;
        let dataset = TestDataset::new("Voices A").insert(&pool).await?;

        let mut cmd = command(dataset.id);
        cmd.uploader_id = Some(user.id);

        let response = handle(pool.clone(), storage.clone(), cmd).await.expect("upload");
        assert_eq!(response.transcript, "hello");
        assert!(response.audio_key.ends_with(".wav"));
        assert_eq!(response.audio_path, format!("/api/files/{}", response.audio_key));
        assert_eq!(response.uploaded_by, Some(user.id));
        assert_eq!(response.size, 8);

        // the blob resolves and the row references it
        assert_eq!(storage.get(&response.audio_key).await.expect("blob"), b"RIFFdata");
        let stored_key: String =
            sqlx::query_scalar("SELECT audio_key FROM voice_samples WHERE id = ?")
                .bind(response.id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(stored_key, response.audio_key);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_unknown_dataset_writes_nothing(pool: SqlitePool) -> sqlx::Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = temp_store(&dir).await;

        let result = handle(pool.clone(), storage, command(Uuid::new_v4())).await;
        assert!(matches!(result, Err(UploadSampleError::DatasetNotFound(_))));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM voice_samples")
            .fetch_one(&pool)
            .await?;
        assert_eq!(rows, 0);
        // no blob was written either
        assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_rejects_blank_transcript_without_side_effects(
        pool: SqlitePool,
    ) -> sqlx::Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = temp_store(&dir).await;
        let dataset = TestDataset::new("Voices A").insert(&pool).await?;

        let mut cmd = command(dataset.id);
        cmd.transcript = String::new();
        let result = handle(pool.clone(), storage, cmd).await;
        assert!(matches!(
            result,
            Err(UploadSampleError::TranscriptValidation(_))
        ));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM voice_samples")
            .fetch_one(&pool)
            .await?;
        assert_eq!(rows, 0);
        assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
        Ok(())
    }
}
