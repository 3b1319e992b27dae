//! In-process key/value store.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use crate::store::{KeyValueStore, StoreError};

/// Key/value store that lives only as long as the process.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    /// Returns `true` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::new("Memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    #[instrument(skip(self, value))]
    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        debug!(key, bytes = value.len(), "Storing entry in memory");
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poisoned_lock_fails_every_operation() {
        let store = MemoryStore::new();
        store.set("k", "v".to_string()).expect("Failed to set");

        let shared = store.clone();
        let result = std::thread::spawn(move || {
            let _guard = shared.entries.lock().expect("Failed to lock");
            panic!("poison the lock");
        })
        .join();
        assert!(result.is_err());

        assert!(store.len().is_err());
        assert!(store.is_empty().is_err());
        assert!(store.get("k").is_err());
        assert!(store.set("k", "w".to_string()).is_err());
        assert!(store.remove("k").is_err());
    }
}
