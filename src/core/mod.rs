pub mod http_client;
pub mod storage_adapter;

pub use crate::domain::model::{Bucket, Headers, HttpMethod};
pub use crate::domain::ports::KeyValueStore;
pub use crate::utils::error::Result;
