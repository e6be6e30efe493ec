pub mod download;

pub use download::{DownloadBlobError, DownloadBlobQuery};
