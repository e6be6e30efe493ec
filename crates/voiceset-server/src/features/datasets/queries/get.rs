//! Get dataset query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDatasetQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDatasetResponse {
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
pub enum GetDatasetError {
    #[error("Dataset with ID '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
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

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    query: GetDatasetQuery,
) -> Result<GetDatasetResponse, GetDatasetError> {
    let row = sqlx::query_as::<_, DatasetRow>(
        "SELECT id, name, description, owner_id, created_at, updated_at \
         FROM datasets WHERE id = ?",
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetDatasetError::NotFound(query.id))?;

    Ok(GetDatasetResponse {
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

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_returns_dataset(pool: SqlitePool) -> sqlx::Result<()> {
        let dataset = TestDataset::new("Voices A")
            .with_description("Studio takes")
            .insert(&pool)
            .await?;

        let response = handle(pool.clone(), GetDatasetQuery { id: dataset.id })
            .await
            .expect("get");
        assert_eq!(response.id, dataset.id);
        assert_eq!(response.name, "Voices A");
        assert_eq!(response.description.as_deref(), Some("Studio takes"));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let result = handle(pool.clone(), GetDatasetQuery { id: Uuid::new_v4() }).await;
        assert!(matches!(result, Err(GetDatasetError::NotFound(_))));
        Ok(())
    }
}
