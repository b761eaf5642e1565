//! In-process key-value store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::KeyValueStore;
use crate::error::StorageError;

/// Key-value store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Snapshot of every stored key.
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn multi_set(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        for (key, value) in entries {
            guard.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        for key in keys {
            guard.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("a").unwrap().is_none());
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn multi_ops() {
        let store = MemoryStore::new();
        store
            .multi_set(&[("a".into(), "1".into()), ("b".into(), "2".into())])
            .unwrap();
        let got = store.multi_get(&["a", "b", "c"]).unwrap();
        assert_eq!(got[0], ("a".to_string(), Some("1".to_string())));
        assert_eq!(got[2], ("c".to_string(), None));

        store.multi_remove(&["a", "c"]).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["b".to_string()]);
    }
}
