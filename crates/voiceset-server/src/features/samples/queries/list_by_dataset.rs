//! List samples query
//!
//! Newest-first slice of a dataset's samples. The caller pages with
//! offset/limit; a full slice sets `has_more` as the usual approximation of
//! "another page probably exists" without counting the whole table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::features::samples::audio_path;
use crate::features::shared::pagination::{Page, PageParams};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSamplesQuery {
    /// Set from the path by the route handler.
    #[serde(skip)]
    pub dataset_id: Uuid,
    #[serde(flatten)]
    pub page: PageParams,
}

/// A single sample in the list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleListItem {
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
pub enum ListSamplesError {
    #[error("{0}")]
    InvalidPagination(&'static str),
    #[error("Dataset with ID '{0}' not found")]
    DatasetNotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListSamplesQuery {
    pub fn validate(&self) -> Result<(), ListSamplesError> {
        self.page.validate().map_err(ListSamplesError::InvalidPagination)
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

#[tracing::instrument(skip(pool, query), fields(dataset_id = %query.dataset_id))]
pub async fn handle(
    pool: SqlitePool,
    query: ListSamplesQuery,
) -> Result<Page<SampleListItem>, ListSamplesError> {
    query.validate()?;

    let dataset_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM datasets WHERE id = ?)")
            .bind(query.dataset_id)
            .fetch_one(&pool)
            .await?;

    if !dataset_exists {
        return Err(ListSamplesError::DatasetNotFound(query.dataset_id));
    }

    let rows = sqlx::query_as::<_, SampleRow>(
        "SELECT id, dataset_id, transcript, audio_key, uploaded_by, original_file_name, created_at \
         FROM voice_samples \
         WHERE dataset_id = ? \
         ORDER BY created_at DESC, id DESC \
         LIMIT ? OFFSET ?",
    )
    .bind(query.dataset_id)
    .bind(query.page.limit())
    .bind(query.page.offset())
    .fetch_all(&pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|r| SampleListItem {
            id: r.id,
            dataset_id: r.dataset_id,
            transcript: r.transcript,
            audio_path: audio_path(&r.audio_key),
            audio_key: r.audio_key,
            original_file_name: r.original_file_name,
            uploaded_by: r.uploaded_by,
            created_at: r.created_at,
        })
        .collect();

    Ok(Page::new(items, &query.page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestDataset, TestSample};

    #[test]
    fn test_validation_rejects_bad_params() {
        let query = ListSamplesQuery {
            dataset_id: Uuid::new_v4(),
            page: PageParams::new(Some(-1), None),
        };
        assert!(matches!(
            query.validate(),
            Err(ListSamplesError::InvalidPagination(_))
        ));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_newest_first(pool: SqlitePool) -> sqlx::Result<()> {
        let dataset = TestDataset::new("Voices A").insert(&pool).await?;
        TestSample::new(dataset.id, "oldest", "a.mp3")
            .created_seconds_ago(30)
            .insert(&pool)
            .await?;
        TestSample::new(dataset.id, "middle", "b.mp3")
            .created_seconds_ago(20)
            .insert(&pool)
            .await?;
        TestSample::new(dataset.id, "newest", "c.mp3")
            .created_seconds_ago(10)
            .insert(&pool)
            .await?;

        let query = ListSamplesQuery {
            dataset_id: dataset.id,
            page: PageParams::default(),
        };
        let page = handle(pool.clone(), query).await.expect("list");
        let transcripts: Vec<_> = page.items.iter().map(|i| i.transcript.as_str()).collect();
        assert_eq!(transcripts, ["newest", "middle", "oldest"]);
        assert!(!page.has_more);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_pagination_slices_are_disjoint(pool: SqlitePool) -> sqlx::Result<()> {
        let dataset = TestDataset::new("Voices A").insert(&pool).await?;
        for i in 0..25 {
            TestSample::new(dataset.id, &format!("take {i}"), &format!("k{i}.mp3"))
                .created_seconds_ago(100 - i)
                .insert(&pool)
                .await?;
        }

        let first = handle(pool.clone(), ListSamplesQuery {
            dataset_id: dataset.id,
            page: PageParams::new(Some(0), Some(10)),
        })
        .await
        .expect("first page");
        let second = handle(pool.clone(), ListSamplesQuery {
            dataset_id: dataset.id,
            page: PageParams::new(Some(10), Some(10)),
        })
        .await
        .expect("second page");
        let third = handle(pool.clone(), ListSamplesQuery {
            dataset_id: dataset.id,
            page: PageParams::new(Some(20), Some(10)),
        })
        .await
        .expect("third page");

        assert_eq!(first.items.len(), 10);
        assert!(first.has_more);
        assert_eq!(second.items.len(), 10);
        assert!(second.has_more);
        assert_eq!(third.items.len(), 5);
        assert!(!third.has_more);

        // contiguous, no overlaps or gaps across the fixed set
        let mut seen: Vec<Uuid> = Vec::new();
        for page in [&first, &second, &third] {
            for item in &page.items {
                assert!(!seen.contains(&item.id));
                seen.push(item.id);
            }
        }
        assert_eq!(seen.len(), 25);

        let expected: Vec<_> = (0..25).rev().map(|i| format!("take {i}")).collect();
        let actual: Vec<_> = [&first, &second, &third]
            .iter()
            .flat_map(|p| p.items.iter().map(|i| i.transcript.clone()))
            .collect();
        assert_eq!(actual, expected);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_only_returns_requested_dataset(pool: SqlitePool) -> sqlx::Result<()> {
        let mine = TestDataset::new("Mine").insert(&pool).await?;
        let other = TestDataset::new("Other").insert(&pool).await?;
        TestSample::new(mine.id, "mine", "m.mp3").insert(&pool).await?;
        TestSample::new(other.id, "other", "o.mp3").insert(&pool).await?;

        let page = handle(pool.clone(), ListSamplesQuery {
            dataset_id: mine.id,
            page: PageParams::default(),
        })
        .await
        .expect("list");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].transcript, "mine");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_unknown_dataset(pool: SqlitePool) -> sqlx::Result<()> {
        let query = ListSamplesQuery {
            dataset_id: Uuid::new_v4(),
            page: PageParams::default(),
        };
        let result = handle(pool.clone(), query).await;
        assert!(matches!(result, Err(ListSamplesError::DatasetNotFound(_))));
        Ok(())
    }
}
