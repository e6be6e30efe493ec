//! Delete sample command
//!
//! Blob first, row second: the blob delete is idempotent, so a retry after
//! a crash between the two steps converges instead of erroring.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::storage::BlobStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSampleCommand {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteSampleError {
    #[error("Sample with ID '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, storage))]
pub async fn handle(
    pool: SqlitePool,
    storage: BlobStore,
    command: DeleteSampleCommand,
) -> Result<(), DeleteSampleError> {
    let audio_key: String =
        sqlx::query_scalar("SELECT audio_key FROM voice_samples WHERE id = ?")
            .bind(command.id)
            .fetch_optional(&pool)
            .await?
            .ok_or(DeleteSampleError::NotFound(command.id))?;

    if let Err(e) = storage.delete(&audio_key).await {
        tracing::warn!(key = %audio_key, error = %e, "Blob cleanup failed during sample delete");
    }

    let result = sqlx::query("DELETE FROM voice_samples WHERE id = ?")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteSampleError::NotFound(command.id));
    }

    tracing::info!(sample_id = %command.id, audio_key = %audio_key, "Sample deleted");

    Ok(())
}
