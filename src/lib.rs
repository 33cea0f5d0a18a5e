pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{FileStore, MemoryStore};
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use adapters::WebStorage;
pub use config::{ClientConfig, RequestConfig};
pub use core::{
    http_client::{HttpClient, Payload, RequestBody, RequestDescriptor},
    storage_adapter::StorageAdapter,
};
pub use domain::model::{
    Bucket, CacheControl, Connection, ContentType, HeaderValue, Headers, HttpMethod, KnownHeader,
    TransferEncoding,
};
pub use domain::ports::KeyValueStore;
pub use utils::error::{Result, StoreFetchError};
