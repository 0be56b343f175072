//! Process-local key-value store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::KeyValueStore;
use crate::error::{Error, Result};

/// In-memory key-value store.
///
/// Used in tests and as the stand-in when the durable store cannot be
/// opened. A [`MemoryStore::disabled`] store fails every operation, which
/// models an environment where local storage is turned off.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    disabled: bool,
}

impl MemoryStore {
    /// Create an empty, working store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every operation fails with
    /// [`Error::StoreUnavailable`].
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            entries: Mutex::default(),
            disabled: true,
        }
    }

    /// Whether this store rejects all operations.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        if self.disabled {
            return Err(Error::store_unavailable("storage is disabled"));
        }
        self.entries
            .lock()
            .map_err(|_| Error::internal("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.entries()?;
        for &(key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries()?.remove(key).is_some())
    }
}
