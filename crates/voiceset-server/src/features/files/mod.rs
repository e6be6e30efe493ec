//! File feature: authenticated retrieval of stored audio blobs.

pub mod queries;
pub mod routes;

pub use routes::file_routes;
