//! Create dataset command
//!
//! Inserts a new dataset owned by the authenticated user. Timestamps and
//! the identifier are assigned here, never taken from the request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::features::datasets::NAME_MAX_LENGTH;
use crate::features::shared::validation::{validate_name, NameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDatasetCommand {
    /// Defaulted so an absent field fails validation (400), not parsing.
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Set from the session by the route handler, not the request body.
    #[serde(skip)]
    pub owner_id: Option<Uuid>,
}

/// Response from creating a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDatasetResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateDatasetError {
    #[error("Name validation failed: {0}")]
    NameValidation(#[from] NameValidationError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateDatasetCommand {
    pub fn validate(&self) -> Result<(), CreateDatasetError> {
        validate_name(&self.name, NAME_MAX_LENGTH)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: SqlitePool,
    command: CreateDatasetCommand,
) -> Result<CreateDatasetResponse, CreateDatasetError> {
    command.validate()?;

    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO datasets (id, name, description, owner_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&command.name)
    .bind(&command.description)
    .bind(command.owner_id)
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await?;

    Ok(CreateDatasetResponse {
        id,
        name: command.name,
        description: command.description,
        owner_id: command.owner_id,
        created_at: now,
        updated_at: now,
    })
}
