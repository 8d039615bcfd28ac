//! `localStorage` implementation of the engine's storage port.
use lifesim_game::{KeyValueStore, LifeConfig, LifeEngine, StorageError};
use web_sys::Storage;

use crate::dom;

/// Documents stored as strings under their engine keys.
///
/// Quota errors and disabled storage surface as [`StorageError::Backend`];
/// the engine logs and swallows them.
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Attach to the page's `localStorage`.
    ///
    /// # Errors
    ///
    /// Fails outside a browser or when storage is disabled.
    pub fn new() -> Result<Self, StorageError> {
        dom::local_storage()
            .map(|storage| Self { storage })
            .map_err(|err| StorageError::Backend(dom::describe(&err)))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|err| StorageError::Backend(dom::describe(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StorageError::Backend(dom::describe(&err)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|err| StorageError::Backend(dom::describe(&err)))
    }
}

/// Create a browser engine backed by `localStorage` with default tuning.
///
/// # Errors
///
/// See [`LocalStorageStore::new`].
pub fn create_local_engine() -> Result<LifeEngine<LocalStorageStore>, StorageError> {
    Ok(LifeEngine::new(LocalStorageStore::new()?, LifeConfig::default()))
}
