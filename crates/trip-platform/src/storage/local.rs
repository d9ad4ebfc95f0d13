//! `localStorage` backend.
//!
//! The shapes stored here match the original web client: the raw JWT
//! under `token`, the cached user record as JSON under `user`, plus
//! the theme flag and locally-kept payment method labels.

use async_trait::async_trait;
use trip_core::ports::StoragePort;
use trip_types::{Result, TripError};

pub struct LocalStorage {
    store: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self> {
        let store = gloo_utils::window()
            .local_storage()
            .map_err(|e| TripError::JsInterop(format!("{:?}", e)))?
            .ok_or_else(|| TripError::Storage("localStorage unavailable".to_string()))?;
        Ok(Self { store })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.store
            .get_item(key)
            .map_err(|e| TripError::Storage(format!("{:?}", e)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.store
            .set_item(key, value)
            .map_err(|e| TripError::Storage(format!("{:?}", e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store
            .remove_item(key)
            .map_err(|e| TripError::Storage(format!("{:?}", e)))
    }

    fn backend_name(&self) -> &str {
        "localStorage"
    }
}
