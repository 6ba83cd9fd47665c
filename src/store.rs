//! The storage facade: a default store plus configuration.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clash;
use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::expiry;
use crate::handle::StoreHandle;
use crate::memory::MemoryStore;
use crate::probe;
use crate::raw::{self, Format};

/// Best-effort key-value storage over a [`StoreHandle`].
///
/// `Storage` owns the store operations run against by default and applies
/// the namespace and probe key from its [`StorageConfig`]. Callers needing a
/// different store for a single call use the free functions in
/// [`raw`](crate::raw), [`expiry`](crate::expiry) and [`clash`](crate::clash),
/// which accept any store.
///
/// Writes never fail because the store is unavailable; they are skipped.
/// The only errors are JSON parse and encode failures.
#[derive(Debug, Clone, Default)]
pub struct Storage<S = MemoryStore> {
    store: S,
    config: StorageConfig,
    prefix: String,
}

impl<S: StoreHandle> Storage<S> {
    /// Wraps `store` with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, StorageConfig::default())
    }

    pub fn with_config(store: S, config: StorageConfig) -> Self {
        let prefix = config.prefix();
        Self {
            store,
            config,
            prefix,
        }
    }

    /// Sets a namespace prefix for all keys.
    /// Keys will be automatically prefixed when stored and accessed.
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.config.namespace = namespace.to_string();
        self.prefix = self.config.prefix();
        self
    }

    /// Sets the sentinel key used by availability probes.
    pub fn with_probe_key(mut self, probe_key: &str) -> Self {
        self.config.probe_key = probe_key.to_string();
        self
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Checks whether the store currently accepts writes.
    pub fn is_available(&mut self) -> bool {
        probe::is_available_with(&mut self.store, &self.config.probe_key)
    }

    pub fn read(&self, key: &str, format: Format) -> Result<Option<Value>, StorageError> {
        raw::read(&self.store, &self.namespaced_key(key), format)
    }

    pub fn read_raw(&self, key: &str) -> Option<String> {
        raw::read_raw(&self.store, &self.namespaced_key(key))
    }

    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        raw::read_json(&self.store, &self.namespaced_key(key))
    }

    /// Writes `value` according to `format`; see [`raw::write`].
    pub fn write(&mut self, key: &str, value: &Value, format: Format) -> Result<(), StorageError> {
        let key = self.namespaced_key(key);
        raw::write_with(&mut self.store, &key, value, format, &self.config.probe_key)
    }

    pub fn write_raw<V: std::fmt::Display>(&mut self, key: &str, value: V) {
        let key = self.namespaced_key(key);
        raw::write_raw_with(&mut self.store, &key, value, &self.config.probe_key);
    }

    pub fn write_json<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let key = self.namespaced_key(key);
        raw::write_json_with(&mut self.store, &key, value, &self.config.probe_key)
    }

    pub fn remove(&mut self, key: &str) {
        let key = self.namespaced_key(key);
        raw::remove(&mut self.store, &key);
    }

    /// Reads an expiring entry as of `now`, evicting it if it has expired.
    pub fn read_with_expiry<T: DeserializeOwned>(
        &mut self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<T>, StorageError> {
        let key = self.namespaced_key(key);
        expiry::read_with_expiry(&mut self.store, &key, now)
    }

    /// Writes an expiring entry; skipped when `expiry` is missing or not
    /// after `now`.
    pub fn write_with_expiry<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        now: DateTime<Utc>,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<(), StorageError> {
        let key = self.namespaced_key(key);
        expiry::write_with_expiry_with(
            &mut self.store,
            &key,
            value,
            now,
            expiry,
            &self.config.probe_key,
        )
    }

    /// Writes an entry expiring `ttl` from the current wall-clock time.
    pub fn write_with_ttl<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), StorageError> {
        let now = Utc::now();
        self.write_with_expiry(key, value, now, now.checked_add_signed(ttl))
    }

    /// Reads an expiring entry as of the current wall-clock time.
    pub fn read_fresh<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, StorageError> {
        self.read_with_expiry(key, Utc::now())
    }

    /// Returns `true` if any of `keys` is present in this namespace.
    pub fn has_clash<K: AsRef<str>>(&self, keys: &[K]) -> bool {
        self.find_clash(keys).is_some()
    }

    /// Returns the first of `keys` present in this namespace.
    pub fn find_clash<'k, K: AsRef<str>>(&self, keys: &'k [K]) -> Option<&'k str> {
        clash::find_clash_with_prefix(keys, &self.prefix, &self.store)
    }

    /// Helper function to add namespace prefix to a key.
    fn namespaced_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}
