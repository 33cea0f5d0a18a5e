use crate::domain::ports::KeyValueStore;
use crate::utils::error::{Result, StoreFetchError};

/// `window.localStorage`. Compiled only for `wasm32` with the `web` feature;
/// outside a browser (no window, storage disabled) calls fail with a storage
/// error.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebStorage;

impl WebStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<web_sys::Storage> {
        let window = web_sys::window().ok_or_else(|| StoreFetchError::StorageError {
            message: "no global window".to_string(),
        })?;
        window
            .local_storage()
            .map_err(|e| js_error("localStorage unavailable", e))?
            .ok_or_else(|| StoreFetchError::StorageError {
                message: "localStorage is disabled".to_string(),
            })
    }
}

fn js_error(context: &str, value: wasm_bindgen::JsValue) -> StoreFetchError {
    StoreFetchError::StorageError {
        message: format!("{}: {:?}", context, value),
    }
}

// web_sys::Storage is !Send; a fresh handle is looked up on every call.
impl KeyValueStore for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| js_error("getItem failed", e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| js_error("setItem failed", e))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| js_error("removeItem failed", e))
    }
}
