//! In-memory backend.

use std::collections::HashMap;

use crate::error::BackendError;
use crate::handle::StoreHandle;

/// A `HashMap`-backed store, the default for tests and native callers.
///
/// A byte quota and a disabled switch let callers reproduce the ways a
/// browser store refuses writes (quota exceeded, private browsing).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: HashMap<String, String>,
    quota: Option<usize>,
    disabled: bool,
}

impl MemoryStore {
    /// Create an empty, unlimited store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the total size of keys plus values to `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Makes every operation fail with [`BackendError::Disabled`].
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Checks for a key without going through the error channel.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns all stored keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    fn used_bytes(&self) -> usize {
        self.data.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl StoreHandle for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        if self.disabled {
            return Err(BackendError::Disabled);
        }
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        if self.disabled {
            return Err(BackendError::Disabled);
        }

        if let Some(limit) = self.quota {
            let replaced = self.data.get(key).map_or(0, |old| key.len() + old.len());
            let used = self.used_bytes() - replaced + key.len() + value.len();
            if used > limit {
                return Err(BackendError::QuotaExceeded { used, limit });
            }
        }

        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        if self.disabled {
            return Err(BackendError::Disabled);
        }
        self.data.remove(key);
        Ok(())
    }
}
