//! Update dataset command
//!
//! Renames a dataset and replaces its description. `updated_at` is bumped on
//! every successful update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::features::datasets::NAME_MAX_LENGTH;
use crate::features::shared::validation::{validate_name, NameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDatasetCommand {
    /// Set from the path by the route handler.
    #[serde(skip)]
    pub id: Uuid,
    /// Defaulted so an absent field fails validation (400), not parsing.
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response from updating a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDatasetResponse {
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
pub enum UpdateDatasetError {
    #[error("Name validation failed: {0}")]
    NameValidation(#[from] NameValidationError),
    #[error("Dataset with ID '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdateDatasetCommand {
    pub fn validate(&self) -> Result<(), UpdateDatasetError> {
        validate_name(&self.name, NAME_MAX_LENGTH)?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DatasetRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    owner_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool, command), fields(id = %command.id))]
pub async fn handle(
    pool: SqlitePool,
    command: UpdateDatasetCommand,
) -> Result<UpdateDatasetResponse, UpdateDatasetError> {
    command.validate()?;

    let now = Utc::now();

    let row = sqlx::query_as::<_, DatasetRow>(
        "UPDATE datasets SET name = ?, description = ?, updated_at = ? \
         WHERE id = ? \
         RETURNING id, name, description, owner_id, created_at, updated_at",
    )
    .bind(&command.name)
    .bind(&command.description)
    .bind(now)
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateDatasetError::NotFound(command.id))?;

    Ok(UpdateDatasetResponse {
        id: row.id,
        name: row.name,
        description: row.description,
        owner_id: row.owner_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestDataset;

    #[test]
    fn test_validation_blank_name() {
        let cmd = UpdateDatasetCommand {
            id: Uuid::new_v4(),
            name: String::new(),
            description: None,
        };
        assert!(matches!(cmd.validate(), Err(UpdateDatasetError::NameValidation(_))));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_updates_and_bumps_timestamp(pool: SqlitePool) -> sqlx::Result<()> {
        let dataset = TestDataset::new("Old Name")
            .with_description("old")
            .insert(&pool)
            .await?;

        let cmd = UpdateDatasetCommand {
            id: dataset.id,
            name: "New Name".to_string(),
            description: Some("new".to_string()),
        };
        let response = handle(pool.clone(), cmd).await.expect("update");
        assert_eq!(response.name, "New Name");
        assert_eq!(response.description.as_deref(), Some("new"));
        assert!(response.updated_at >= dataset.created_at);
        assert_eq!(response.created_at, dataset.created_at);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_clears_description_when_omitted(pool: SqlitePool) -> sqlx::Result<()> {
        let dataset = TestDataset::new("Named")
            .with_description("will be cleared")
            .insert(&pool)
            .await?;

        let cmd = UpdateDatasetCommand {
            id: dataset.id,
            name: "Named".to_string(),
            description: None,
        };
        let response = handle(pool.clone(), cmd).await.expect("update");
        assert_eq!(response.description, None);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let cmd = UpdateDatasetCommand {
            id: Uuid::new_v4(),
            name: "Whatever".to_string(),
            description: None,
        };
        let result = handle(pool.clone(), cmd).await;
        assert!(matches!(result, Err(UpdateDatasetError::NotFound(_))));
        Ok(())
    }
}
