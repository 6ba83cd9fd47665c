//! Browser `localStorage` / `sessionStorage` backend.

use chrono::Utc;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

use crate::error::{BackendError, StorageError};
use crate::handle::StoreHandle;
use crate::record::expiry_from_millis;
use crate::store::Storage;

#[wasm_bindgen]
extern "C" {
    // LocalStorage bindings
    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = getItem)]
    fn ls_get_item(key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = setItem)]
    fn ls_set_item(key: &str, value: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = removeItem)]
    fn ls_remove_item(key: &str) -> Result<(), JsValue>;

    // SessionStorage bindings
    #[wasm_bindgen(catch, js_namespace = sessionStorage, js_name = getItem)]
    fn ss_get_item(key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(catch, js_namespace = sessionStorage, js_name = setItem)]
    fn ss_set_item(key: &str, value: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = sessionStorage, js_name = removeItem)]
    fn ss_remove_item(key: &str) -> Result<(), JsValue>;
}

/// Web storage areas a [`WebStorage`] can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebStorageBackend {
    #[default]
    LocalStorage,
    SessionStorage,
}

/// A [`StoreHandle`] over one of the browser's Web Storage areas.
///
/// Exceptions thrown by the browser (quota exceeded, storage blocked by
/// privacy settings, missing `window`) become [`BackendError::WebStorage`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WebStorage {
    backend: WebStorageBackend,
}

impl WebStorage {
    pub fn local() -> Self {
        Self {
            backend: WebStorageBackend::LocalStorage,
        }
    }

    pub fn session() -> Self {
        Self {
            backend: WebStorageBackend::SessionStorage,
        }
    }

    pub fn backend(&self) -> WebStorageBackend {
        self.backend
    }
}

fn web_error(err: JsValue) -> BackendError {
    let msg = err.as_string().unwrap_or_else(|| format!("{err:?}"));
    BackendError::WebStorage(msg)
}

impl StoreHandle for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        match self.backend {
            WebStorageBackend::LocalStorage => ls_get_item(key),
            WebStorageBackend::SessionStorage => ss_get_item(key),
        }
        .map_err(web_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        match self.backend {
            WebStorageBackend::LocalStorage => ls_set_item(key, value),
            WebStorageBackend::SessionStorage => ss_set_item(key, value),
        }
        .map_err(web_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        match self.backend {
            WebStorageBackend::LocalStorage => ls_remove_item(key),
            WebStorageBackend::SessionStorage => ss_remove_item(key),
        }
        .map_err(web_error)
    }
}

fn js_error(err: StorageError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JavaScript-facing wrapper around a [`Storage`] over Web Storage.
///
/// Structured values cross the boundary as JSON text.
#[wasm_bindgen]
pub struct TinyStash {
    inner: Storage<WebStorage>,
}

#[wasm_bindgen]
impl TinyStash {
    #[wasm_bindgen(constructor)]
    pub fn new(session: bool, namespace: &str) -> TinyStash {
        let store = if session {
            WebStorage::session()
        } else {
            WebStorage::local()
        };
        TinyStash {
            inner: Storage::new(store).with_namespace(namespace),
        }
    }

    #[wasm_bindgen(js_name = "isAvailable")]
    pub fn is_available(&mut self) -> bool {
        self.inner.is_available()
    }

    #[wasm_bindgen(js_name = "get")]
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.read_raw(key)
    }

    #[wasm_bindgen(js_name = "set")]
    pub fn set(&mut self, key: &str, value: &str) {
        self.inner.write_raw(key, value);
    }

    #[wasm_bindgen(js_name = "remove")]
    pub fn remove(&mut self, key: &str) {
        self.inner.remove(key);
    }

    /// Stores JSON text `value` until `expiry_ms` (milliseconds since the epoch).
    /// A non-finite or out-of-range `expiry_ms` counts as no expiry, so
    /// nothing is written.
    #[wasm_bindgen(js_name = "setWithExpiry")]
    pub fn set_with_expiry(&mut self, key: &str, value: &str, expiry_ms: f64) -> Result<(), JsValue> {
        let value: serde_json::Value =
            serde_json::from_str(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner
            .write_with_expiry(key, &value, Utc::now(), expiry_from_millis(expiry_ms))
            .map_err(js_error)
    }

    /// Returns the live value under `key` as JSON text.
    #[wasm_bindgen(js_name = "getWithExpiry")]
    pub fn get_with_expiry(&mut self, key: &str) -> Result<Option<String>, JsValue> {
        let value: Option<serde_json::Value> = self.inner.read_fresh(key).map_err(js_error)?;
        Ok(value.map(|v| v.to_string()))
    }

    #[wasm_bindgen(js_name = "hasClash")]
    pub fn has_clash(&self, keys: Vec<String>) -> bool {
        self.inner.has_clash(keys.as_slice())
    }
}
