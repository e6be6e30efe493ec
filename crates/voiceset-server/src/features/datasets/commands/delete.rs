//! Delete dataset command
//!
//! Removal order matters: sample blobs are deleted (best-effort) before the
//! dataset row, so a failure mid-way leaves the database rows intact and a
//! retried delete simply no-ops on the already-missing blobs. The row delete
//! itself cascades to the dependent voice_samples rows.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::storage::BlobStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDatasetCommand {
    pub id: Uuid,
}

/// Response from deleting a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDatasetResponse {
    pub id: Uuid,
    pub samples_removed: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteDatasetError {
    #[error("Dataset with ID '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, storage))]
pub async fn handle(
    pool: SqlitePool,
    storage: BlobStore,
    command: DeleteDatasetCommand,
) -> Result<DeleteDatasetResponse, DeleteDatasetError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM datasets WHERE id = ?)")
        .bind(command.id)
        .fetch_one(&pool)
        .await?;

    if !exists {
        return Err(DeleteDatasetError::NotFound(command.id));
    }

    let audio_keys: Vec<String> =
        sqlx::query_scalar("SELECT audio_key FROM voice_samples WHERE dataset_id = ?")
            .bind(command.id)
            .fetch_all(&pool)
            .await?;

    for key in &audio_keys {
        if let Err(e) = storage.delete(key).await {
            tracing::warn!(key = %key, error = %e, "Blob cleanup failed during dataset delete");
        }
    }

    let result = sqlx::query("DELETE FROM datasets WHERE id = ?")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteDatasetError::NotFound(command.id));
    }

    Ok(DeleteDatasetResponse {
        id: command.id,
        samples_removed: audio_keys.len() as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageSettings;
    use crate::features::shared::test_helpers::{TestDataset, TestSample};
    use crate::storage::BlobError;

    async fn temp_store(dir: &tempfile::TempDir) -> BlobStore {
        BlobStore::new(&StorageSettings {
            upload_dir: dir.path().to_path_buf(),
            legacy_upload_dir: None,
        })
        .await
        .expect("blob store")
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_cascades_rows_and_blobs(pool: SqlitePool) -> sqlx::Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = temp_store(&dir).await;

        let dataset = TestDataset::new("Voices A").insert(&pool).await?;
        let blob_a = storage.put(b"aaaa", Some("a.wav")).await.expect("put a");
        let blob_b = storage.put(b"bbbb", Some("b.wav")).await.expect("put b");
        TestSample::new(dataset.id, "first", &blob_a.key).insert(&pool).await?;
        TestSample::new(dataset.id, "second", &blob_b.key).insert(&pool).await?;

        let response = handle(pool.clone(), storage.clone(), DeleteDatasetCommand {
            id: dataset.id,
        })
        .await
        .expect("delete");
        assert_eq!(response.samples_removed, 2);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM voice_samples WHERE dataset_id = ?")
            .bind(dataset.id)
            .fetch_one(&pool)
            .await?;
        assert_eq!(rows, 0);

        assert!(matches!(
            storage.get(&blob_a.key).await.unwrap_err(),
            BlobError::NotFound(_)
        ));
        assert!(matches!(
            storage.get(&blob_b.key).await.unwrap_err(),
            BlobError::NotFound(_)
        ));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_tolerates_already_missing_blobs(pool: SqlitePool) -> sqlx::Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = temp_store(&dir).await;

        let dataset = TestDataset::new("Voices A").insert(&pool).await?;
        // the row points at a blob that was never written
        TestSample::new(dataset.id, "ghost", "00000000-0000-0000-0000-000000000000.mp3")
            .insert(&pool)
            .await?;

        let response = handle(pool.clone(), storage, DeleteDatasetCommand { id: dataset.id })
            .await
            .expect("delete");
        assert_eq!(response.samples_removed, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_not_found_has_no_side_effects(pool: SqlitePool) -> sqlx::Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = temp_store(&dir).await;

        let dataset = TestDataset::new("Untouched").insert(&pool).await?;
        let blob = storage.put(b"keep", Some("keep.mp3")).await.expect("put");
        TestSample::new(dataset.id, "kept", &blob.key).insert(&pool).await?;

        let result = handle(pool.clone(), storage.clone(), DeleteDatasetCommand {
            id: Uuid::new_v4(),
        })
        .await;
        assert!(matches!(result, Err(DeleteDatasetError::NotFound(_))));

        // the unrelated dataset and its blob are untouched
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM voice_samples")
            .fetch_one(&pool)
            .await?;
        assert_eq!(rows, 1);
        assert_eq!(storage.get(&blob.key).await.expect("blob intact"), b"keep");
        Ok(())
    }
}
