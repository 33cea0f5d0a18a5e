// Adapters layer: concrete KeyValueStore backends.

pub mod file;
pub mod memory;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::WebStorage;
