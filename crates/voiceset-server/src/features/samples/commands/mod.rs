pub mod delete;
pub mod upload;
pub mod update;

pub use delete::{DeleteSampleCommand, DeleteSampleError};
pub use update::{NewAudio, UpdateSampleCommand, UpdateSampleError};
pub use upload::{UploadSampleCommand, UploadSampleError};
