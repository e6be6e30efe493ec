//! Voice-sample feature: upload, transcript/audio replacement, deletion and
//! per-dataset listing.
//!
//! Every sample row carries an opaque `audio_key` issued by the blob store.
//! The multi-step blob+row sequences here are not cross-store transactions;
//! ordering and idempotent blob deletes keep the stores from diverging for
//! long (see the individual commands).

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{dataset_sample_routes, sample_routes};

/// Public retrieval path for a stored blob key.
///
/// Stored rows keep only the key; the URL is derived at response time.
pub(crate) fn audio_path(key: &str) -> String {
    format!("/api/files/{key}")
}
