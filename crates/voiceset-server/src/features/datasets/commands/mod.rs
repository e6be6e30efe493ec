pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateDatasetCommand, CreateDatasetError};
pub use delete::{DeleteDatasetCommand, DeleteDatasetError};
pub use update::{UpdateDatasetCommand, UpdateDatasetError};
