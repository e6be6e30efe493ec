pub mod get;
pub mod list_by_dataset;

pub use get::{GetSampleError, GetSampleQuery};
pub use list_by_dataset::{ListSamplesError, ListSamplesQuery};
