//! Test fixtures for database tests
//!
//! Builder-style helpers that insert rows directly, keeping `#[sqlx::test]`
//! setup short.
//!
//! ```rust,ignore
//! let user = TestUser::new("admin@example.com").insert(&pool).await?;
//! let dataset = TestDataset::new("Voices A").with_owner(user.id).insert(&pool).await?;
//! let sample = TestSample::new(dataset.id, "hello", "key.mp3").insert(&pool).await?;
//! ```

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Builder for test user rows
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

impl TestUser {
    pub fn new(email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "salt$not-a-real-digest".to_string(),
        }
    }

    pub fn with_password_hash(mut self, hash: &str) -> Self {
        self.password_hash = hash.to_string();
        self
    }

    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<Self> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(self.id)
        .bind(&self.email)
        .bind(&self.password_hash)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(self)
    }
}

/// Builder for test dataset rows
#[derive(Debug, Clone)]
pub struct TestDataset {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TestDataset {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            owner_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<Self> {
        sqlx::query(
            "INSERT INTO datasets (id, name, description, owner_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.description)
        .bind(self.owner_id)
        .bind(self.created_at)
        .bind(self.created_at)
        .execute(pool)
        .await?;
        Ok(self)
    }
}

/// Builder for test voice-sample rows
#[derive(Debug, Clone)]
pub struct TestSample {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub transcript: String,
    pub audio_key: String,
    pub uploaded_by: Option<Uuid>,
    pub original_file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TestSample {
    pub fn new(dataset_id: Uuid, transcript: &str, audio_key: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            dataset_id,
            transcript: transcript.to_string(),
            audio_key: audio_key.to_string(),
            uploaded_by: None,
            original_file_name: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_uploader(mut self, user_id: Uuid) -> Self {
        self.uploaded_by = Some(user_id);
        self
    }

    pub fn with_original_file_name(mut self, name: &str) -> Self {
        self.original_file_name = Some(name.to_string());
        self
    }

    /// Shift `created_at` for deterministic newest-first ordering in tests.
    pub fn created_seconds_ago(mut self, seconds: i64) -> Self {
        self.created_at = Utc::now() - Duration::seconds(seconds);
        self
    }

    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<Self> {
        sqlx::query(
            "INSERT INTO voice_samples \
             (id, transcript, audio_key, dataset_id, uploaded_by, original_file_name, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(self.id)
        .bind(&self.transcript)
        .bind(&self.audio_key)
        .bind(self.dataset_id)
        .bind(self.uploaded_by)
        .bind(&self.original_file_name)
        .bind(self.created_at)
        .execute(pool)
        .await?;
        Ok(self)
    }
}
