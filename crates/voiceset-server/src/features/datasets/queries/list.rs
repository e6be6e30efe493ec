//! List datasets query
//!
//! Returns every dataset, newest first. The listing is restartable: each
//! call re-queries current state. Slicing for display is a presentation
//! concern; this layer does not paginate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDatasetsQuery {}

/// A single dataset in the list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetListItem {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    pub sample_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListDatasetsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct DatasetListRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    owner_id: Option<Uuid>,
    sample_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    _query: ListDatasetsQuery,
) -> Result<Vec<DatasetListItem>, ListDatasetsError> {
    let rows = sqlx::query_as::<_, DatasetListRow>(
        "SELECT d.id, d.name, d.description, d.owner_id, \
                (SELECT COUNT(*) FROM voice_samples vs WHERE vs.dataset_id = d.id) AS sample_count, \
                d.created_at, d.updated_at \
         FROM datasets d \
         ORDER BY d.created_at DESC, d.id DESC",
    )
    .fetch_all(&pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| DatasetListItem {
            id: r.id,
            name: r.name,
            description: r.description,
            owner_id: r.owner_id,
            sample_count: r.sample_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestDataset, TestSample};
    use chrono::Duration;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_orders_newest_first(pool: SqlitePool) -> sqlx::Result<()> {
        let mut older = TestDataset::new("Older");
        older.created_at = Utc::now() - Duration::seconds(60);
        let older = older.insert(&pool).await?;
        let newer = TestDataset::new("Newer").insert(&pool).await?;

        let items = handle(pool.clone(), ListDatasetsQuery::default())
            .await
            .expect("list");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, newer.id);
        assert_eq!(items[1].id, older.id);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_counts_samples(pool: SqlitePool) -> sqlx::Result<()> {
        let dataset = TestDataset::new("With Samples").insert(&pool).await?;
        TestSample::new(dataset.id, "one", "k1.mp3").insert(&pool).await?;
        TestSample::new(dataset.id, "two", "k2.mp3").insert(&pool).await?;
        let empty = TestDataset::new("Empty").insert(&pool).await?;

        let items = handle(pool.clone(), ListDatasetsQuery::default())
            .await
            .expect("list");
        let with_samples = items.iter().find(|i| i.id == dataset.id).expect("row");
        let without = items.iter().find(|i| i.id == empty.id).expect("row");
        assert_eq!(with_samples.sample_count, 2);
        assert_eq!(without.sample_count, 0);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_empty(pool: SqlitePool) -> sqlx::Result<()> {
        let items = handle(pool.clone(), ListDatasetsQuery::default())
            .await
            .expect("list");
        assert!(items.is_empty());
        Ok(())
    }
}
