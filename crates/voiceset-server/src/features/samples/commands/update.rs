//! Update sample command
//!
//! Replaces the transcript, the audio, or both; a request supplying neither
//! is rejected rather than treated as a no-op. When audio is replaced the
//! old blob is deleted before the new one is written, so a sample never has
//! two live blobs. A failed old-blob delete is logged and tolerated: the
//! worst case is a row briefly pointing at a missing blob, which readers
//! already treat as not-found rather than fatal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::features::samples::audio_path;
use crate::features::shared::validation::{validate_transcript, TranscriptValidationError};
use crate::storage::{BlobError, BlobStore};

/// Replacement audio supplied with an update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAudio {
    #[serde(skip)]
    pub content: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSampleCommand {
    /// Set from the path by the route handler.
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip)]
    pub new_audio: Option<NewAudio>,
}

/// Response from updating a sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSampleResponse {
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
pub enum UpdateSampleError {
    #[error("At least one of transcript or file must be provided")]
    NoFieldsToUpdate,
    #[error("Transcript validation failed: {0}")]
    TranscriptValidation(#[from] TranscriptValidationError),
    #[error("Replacement audio file cannot be empty")]
    FileEmpty,
    #[error("Sample with ID '{0}' not found")]
    NotFound(Uuid),
    #[error("Storage error: {0}")]
    Storage(#[from] BlobError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdateSampleCommand {
    pub fn validate(&self) -> Result<(), UpdateSampleError> {
        if self.transcript.is_none() && self.new_audio.is_none() {
            return Err(UpdateSampleError::NoFieldsToUpdate);
        }
        if let Some(ref transcript) = self.transcript {
            validate_transcript(transcript)?;
        }
        if let Some(ref audio) = self.new_audio {
            if audio.content.is_empty() {
                return Err(UpdateSampleError::FileEmpty);
            }
        }
        Ok(())
    }
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

#[tracing::instrument(skip(pool, storage, command), fields(id = %command.id))]
pub async fn handle(
    pool: SqlitePool,
    storage: BlobStore,
    command: UpdateSampleCommand,
) -> Result<UpdateSampleResponse, UpdateSampleError> {
    command.validate()?;

    let current = sqlx::query_as::<_, SampleRow>(
        "SELECT id, dataset_id, transcript, audio_key, uploaded_by, original_file_name, created_at \
         FROM voice_samples WHERE id = ?",
    )
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateSampleError::NotFound(command.id))?;

    let (audio_key, original_file_name) = match command.new_audio {
        Some(audio) => {
            // old blob goes first so the sample never has two live blobs
            if let Err(e) = storage.delete(&current.audio_key).await {
                tracing::warn!(key = %current.audio_key, error = %e, "Old blob delete failed during replacement");
            }
            let stored = storage
                .put(&audio.content, audio.original_file_name.as_deref())
                .await?;
            (stored.key, audio.original_file_name)
        }
        None => (current.audio_key, current.original_file_name),
    };

    let transcript = command.transcript.unwrap_or(current.transcript);

    sqlx::query(
        "UPDATE voice_samples SET transcript = ?, audio_key = ?, original_file_name = ? \
         WHERE id = ?",
    )
    .bind(&transcript)
    .bind(&audio_key)
    .bind(&original_file_name)
    .bind(command.id)
    .execute(&pool)
    .await?;

    Ok(UpdateSampleResponse {
        id: current.id,
        dataset_id: current.dataset_id,
        transcript,
        audio_path: audio_path(&audio_key),
        audio_key,
        original_file_name,
        uploaded_by: current.uploaded_by,
        created_at: current.created_at,
    })
}
