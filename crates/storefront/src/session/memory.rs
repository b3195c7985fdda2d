//! In-memory session store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{SessionStore, StoreError};

/// Session store that lives as long as the process.
///
/// Cheaply cloneable; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("token", "T1").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("T1"));
        assert_eq!(store.len(), 1);

        store.set("token", "T2").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("T2"));

        store.remove("token").unwrap();
        store.remove("token").unwrap();
        assert!(store.get("token").unwrap().is_none());
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let view = store.clone();
        store.set("user", "{}").unwrap();
        assert_eq!(view.get("user").unwrap().as_deref(), Some("{}"));
    }
}
