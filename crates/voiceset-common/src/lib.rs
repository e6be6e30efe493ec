//! Voiceset Common Library
//!
//! Shared utilities for the voiceset workspace:
//!
//! - **Error Handling**: the common error type used outside HTTP boundaries
//! - **Logging**: tracing subscriber configuration and initialization
//! - **Checksums**: SHA-256 digests for blob integrity and credential hashing

pub mod checksum;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{CommonError, Result};
