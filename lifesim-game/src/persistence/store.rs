//! The storage port and its in-process implementations.
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The platform store refused the operation (quota, privacy mode, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("storage i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key/value storage, one JSON document per key.
///
/// This is the only place the engine performs side effects.
pub trait KeyValueStore {
    /// Read the raw document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the document under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the removal.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared in-memory store. Clones see the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.documents.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.documents
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.documents.borrow_mut().remove(key);
        Ok(())
    }
}

/// Directory of `<key>.json` files.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("lifesim-store-{label}-{nanos}"))
    }

    #[test]
    fn memory_store_clones_share_documents() {
        let store = MemoryStore::new();
        let alias = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(alias.get("k").unwrap().as_deref(), Some("v"));
        alias.remove("k").unwrap();
        assert!(store.is_empty());
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn file_store_roundtrips_and_tolerates_missing_keys() {
        let dir = temp_dir("roundtrip");
        let store = FileStore::new(&dir);
        assert!(store.get("absent").unwrap().is_none());
        store.remove("absent").unwrap();
        store.set("lifesim.save", "{\"a\":1}").unwrap();
        assert!(dir.join("lifesim.save.json").exists());
        assert_eq!(
            store.get("lifesim.save").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        store.remove("lifesim.save").unwrap();
        assert!(store.get("lifesim.save").unwrap().is_none());
        fs::remove_dir_all(dir).ok();
    }
}
