//! Get sample query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::features::samples::audio_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSampleQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSampleResponse {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub transcript: String,
    pub audio_key: String,
    pub audio_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetSampleError {
    #[error("Sample with ID '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct SampleRow {
    id: Uuid,
    dataset_id: Uuid,
    transcript: String,
    audio_key: String,
    uploaded_by: Option<Uuid>,
    original_file_name: Option<String>,
    created_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    query: GetSampleQuery,
) -> Result<GetSampleResponse, GetSampleError> {
    let row = sqlx::query_as::<_, SampleRow>(
        "SELECT id, dataset_id, transcript, audio_key, uploaded_by, original_file_name, created_at \
         FROM voice_samples WHERE id = ?",
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetSampleError::NotFound(query.id))?;

    Ok(GetSampleResponse {
        id: row.id,
        dataset_id: row.dataset_id,
        transcript: row.transcript,
        audio_path: audio_path(&row.audio_key),
        audio_key: row.audio_key,
        original_file_name: row.original_file_name,
        uploaded_by: row.uploaded_by,
        created_at: row.created_at,
    })
}
