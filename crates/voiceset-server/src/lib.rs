//! Voiceset Server Library
//!
//! HTTP server for managing voice-sample datasets.
//!
//! # Overview
//!
//! Authenticated users create datasets and upload voice samples (audio bytes
//! plus a transcript) into them. The server keeps two stores consistent:
//!
//! - **Storage Layer**: SQLite via SQLx, owning users, sessions, datasets and
//!   voice-sample rows with referential integrity (sample rows cascade when a
//!   dataset is deleted)
//! - **Blob Store**: a filesystem directory owning the uploaded audio bytes,
//!   addressed by opaque keys recorded on sample rows
//!
//! The two are deliberately not wrapped in one cross-store transaction: blob
//! cleanup is best-effort and ordered so a mid-sequence failure leaves the
//! database authoritative, and delete operations tolerate already-missing
//! blobs.
//!
//! # Architecture
//!
//! Feature slices under [`features`] each carry their own `commands/` (write
//! operations), `queries/` (read operations) and `routes.rs`, with per-
//! operation error enums mapped to HTTP at the route boundary.
//!
//! # Example
//!
//! ```no_run
//! use voiceset_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod features;
pub mod middleware;
pub mod storage;
