//! Dataset feature: CRUD over dataset records.
//!
//! Deleting a dataset is the one compound operation here: sample blobs are
//! removed best-effort first, then the row delete cascades to the dependent
//! sample rows.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::dataset_routes;

/// Longest accepted dataset name.
pub const NAME_MAX_LENGTH: usize = 255;
