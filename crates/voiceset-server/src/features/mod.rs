//! Feature modules implementing the voiceset API
//!
//! Each feature is a vertical slice with its own commands (writes), queries
//! (reads), and routes:
//!
//! - **auth**: credential login/logout and the session boundary
//! - **datasets**: CRUD over datasets, including the cascading delete that
//!   also removes dependent sample rows and their audio blobs
//! - **samples**: voice-sample upload/update/delete and per-dataset listing
//! - **files**: authenticated serving of stored audio blobs
//!
//! Route handlers call the slice's `handle` functions directly; every write
//! and read has a per-operation error enum mapped to HTTP at the boundary.

pub mod auth;
pub mod datasets;
pub mod files;
pub mod samples;
pub mod shared;

use axum::extract::FromRef;
use axum::Router;
use sqlx::SqlitePool;

use crate::config::AuthConfig;
use crate::storage::BlobStore;

/// Shared state for all feature routes
///
/// Constructed once at startup and cloned into each router; there are no
/// hidden singletons behind it.
#[derive(Clone)]
pub struct FeatureState {
    /// SQLite connection pool
    pub db: SqlitePool,
    /// Filesystem blob store for audio uploads
    pub storage: BlobStore,
    /// Session settings used when issuing tokens
    pub auth: AuthConfig,
}

impl FromRef<FeatureState> for SqlitePool {
    fn from_ref(state: &FeatureState) -> Self {
        state.db.clone()
    }
}

impl FromRef<FeatureState> for BlobStore {
    fn from_ref(state: &FeatureState) -> Self {
        state.storage.clone()
    }
}

/// Creates the API router with all feature routes mounted
///
/// Dataset-scoped sample routes (`/datasets/{id}/samples`) live in the
/// samples slice but are merged under the dataset prefix.
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest(
            "/datasets",
            datasets::dataset_routes().merge(samples::dataset_sample_routes()),
        )
        .nest("/auth", auth::auth_routes())
        .nest("/samples", samples::sample_routes())
        .nest("/files", files::file_routes())
        .with_state(state)
}
