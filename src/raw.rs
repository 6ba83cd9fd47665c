//! Plain get/set/remove accessors.
//!
//! Reads treat a missing key, an empty stored string and a backend read
//! failure alike: the value is absent. Writes are best-effort: they are
//! skipped when the store fails the availability probe and backend errors
//! on the write itself are logged and dropped. The only errors returned are
//! JSON parse failures on read and JSON encode failures on write.

use std::fmt::Display;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::handle::StoreHandle;
use crate::probe::{self, PROBE_KEY};

/// How a stored string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// The stored string as-is
    #[default]
    Raw,
    /// The stored string is a JSON document
    Json,
}

/// Reads `key`, decoding it according to `format`.
///
/// With [`Format::Raw`] the stored string comes back as a
/// [`Value::String`].
pub fn read<S: StoreHandle + ?Sized>(
    store: &S,
    key: &str,
    format: Format,
) -> Result<Option<Value>, StorageError> {
    match format {
        Format::Raw => Ok(read_raw(store, key).map(Value::String)),
        Format::Json => read_json(store, key),
    }
}

/// Returns the stored string for `key`, if any.
pub fn read_raw<S: StoreHandle + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(Some(raw)) if !raw.is_empty() => Some(raw),
        Ok(_) => None,
        Err(e) => {
            warn!(key, error = %e, "storage read failed");
            None
        }
    }
}

/// Reads `key` and parses it as JSON into `T`.
///
/// A stored string that does not parse as `T` is an error; silently
/// reporting it as absent would hide corrupted data.
pub fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: StoreHandle + ?Sized,
{
    let Some(raw) = read_raw(store, key) else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Parse {
            key: key.to_string(),
            source,
        })
}

/// Writes `value` under `key` according to `format`.
///
/// With [`Format::Raw`] a JSON string is stored without quotes and any other
/// value is stored in its JSON text form.
pub fn write<S: StoreHandle + ?Sized>(
    store: &mut S,
    key: &str,
    value: &Value,
    format: Format,
) -> Result<(), StorageError> {
    write_with(store, key, value, format, PROBE_KEY)
}

/// Stores the `Display` form of `value` under `key`.
pub fn write_raw<S, V>(store: &mut S, key: &str, value: V)
where
    S: StoreHandle + ?Sized,
    V: Display,
{
    write_raw_with(store, key, value, PROBE_KEY);
}

/// Serializes `value` as JSON and stores it under `key`.
pub fn write_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: StoreHandle + ?Sized,
{
    write_json_with(store, key, value, PROBE_KEY)
}

/// Deletes `key`. Absent keys and backend failures are ignored.
pub fn remove<S: StoreHandle + ?Sized>(store: &mut S, key: &str) {
    if let Err(e) = store.remove(key) {
        warn!(key, error = %e, "storage remove failed");
    }
}

/// Like [`write`], probing availability with `sentinel` instead of
/// [`PROBE_KEY`].
pub fn write_with<S: StoreHandle + ?Sized>(
    store: &mut S,
    key: &str,
    value: &Value,
    format: Format,
    sentinel: &str,
) -> Result<(), StorageError> {
    match (format, value) {
        (Format::Raw, Value::String(s)) => {
            write_raw_with(store, key, s, sentinel);
            Ok(())
        }
        (Format::Raw, other) => {
            write_raw_with(store, key, other, sentinel);
            Ok(())
        }
        (Format::Json, value) => write_json_with(store, key, value, sentinel),
    }
}

/// Like [`write_raw`], probing availability with `sentinel`.
pub fn write_raw_with<S, V>(store: &mut S, key: &str, value: V, sentinel: &str)
where
    S: StoreHandle + ?Sized,
    V: Display,
{
    put(store, key, &value.to_string(), sentinel);
}

/// Like [`write_json`], probing availability with `sentinel`.
pub fn write_json_with<T, S>(
    store: &mut S,
    key: &str,
    value: &T,
    sentinel: &str,
) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: StoreHandle + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    put(store, key, &json, sentinel);
    Ok(())
}

fn put<S: StoreHandle + ?Sized>(store: &mut S, key: &str, value: &str, sentinel: &str) {
    if !probe::is_available_with(store, sentinel) {
        debug!(key, "storage unavailable, write skipped");
        return;
    }

    if let Err(e) = store.set(key, value) {
        warn!(key, error = %e, "storage write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_missing_key_is_absent() {
        let store = MemoryStore::new();
        assert!(read_raw(&store, "notSet").is_none());
        assert!(read(&store, "notSet", Format::Json).unwrap().is_none());
        assert!(read_json::<bool, _>(&store, "notSet").unwrap().is_none());
    }

    #[test]
    fn test_empty_string_is_absent() {
        let mut store = MemoryStore::new();
        store.set("blank", "").unwrap();
        assert!(read_raw(&store, "blank").is_none());
        assert!(read_json::<String, _>(&store, "blank").unwrap().is_none());
    }

    #[test]
    fn test_raw_write_stores_display_form() {
        let mut store = MemoryStore::new();
        write_raw(&mut store, "promoActive", true);
        write_raw(&mut store, "count", 5);

        assert_eq!(read_raw(&store, "promoActive").as_deref(), Some("true"));
        assert_eq!(
            read(&store, "count", Format::Raw).unwrap(),
            Some(json!("5"))
        );
    }

    #[test]
    fn test_json_values() {
        let mut store = MemoryStore::new();
        write_json(&mut store, "darkMode", &true).unwrap();
        write_json(&mut store, "colorOptions", &["red", "green", "blue"]).unwrap();
        write(&mut store, "count", &json!(5), Format::Json).unwrap();

        assert_eq!(read_json::<bool, _>(&store, "darkMode").unwrap(), Some(true));
        assert_eq!(
            read_json::<Vec<String>, _>(&store, "colorOptions").unwrap(),
            Some(vec!["red".into(), "green".into(), "blue".into()])
        );
        assert_eq!(read(&store, "count", Format::Json).unwrap(), Some(json!(5)));
    }

    #[test]
    fn test_raw_format_unquotes_strings() {
        let mut store = MemoryStore::new();
        write(&mut store, "name", &json!("alice"), Format::Raw).unwrap();
        write(&mut store, "list", &json!([1, 2]), Format::Raw).unwrap();

        assert_eq!(read_raw(&store, "name").as_deref(), Some("alice"));
        assert_eq!(read_raw(&store, "list").as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let mut store = MemoryStore::new();
        store.set("broken", "{not json").unwrap();

        let err = read(&store, "broken", Format::Json).unwrap_err();
        assert!(matches!(err, StorageError::Parse { .. }));
        assert_eq!(err.key(), "broken");

        // The raw view is still readable
        assert_eq!(read_raw(&store, "broken").as_deref(), Some("{not json"));
    }

    #[test]
    fn test_unencodable_value_is_an_error() {
        use std::collections::HashMap;

        let mut store = MemoryStore::new();
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], 1);

        let err = write_json(&mut store, "bad", &bad).unwrap_err();
        assert!(matches!(err, StorageError::Encode { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_write_to_unavailable_store_is_noop() {
        let mut store = MemoryStore::disabled();
        write_raw(&mut store, "k", "v");
        write_json(&mut store, "j", &1).unwrap();

        store.set_disabled(false);
        assert!(store.is_empty());
    }

    #[test]
    fn test_write_over_quota_is_swallowed() {
        let mut store = MemoryStore::new().with_quota(32);
        write_raw(&mut store, "big", "x".repeat(64));
        assert!(read_raw(&store, "big").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryStore::new();
        write_raw(&mut store, "k", "v");
        remove(&mut store, "k");
        remove(&mut store, "k");
        assert!(read_raw(&store, "k").is_none());

        // Failures are swallowed too
        let mut disabled = MemoryStore::disabled();
        remove(&mut disabled, "k");
    }

    #[test]
    fn test_custom_sentinel_variants() {
        let mut store = MemoryStore::new();
        write_raw_with(&mut store, "a", 1, "__probe__");
        write_json_with(&mut store, "b", &[1, 2], "__probe__").unwrap();
        write_with(&mut store, "c", &json!("x"), Format::Raw, "__probe__").unwrap();

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(read_raw(&store, "c").as_deref(), Some("x"));
    }

    #[test]
    fn test_read_failure_is_absent() {
        let store = MemoryStore::disabled();
        assert!(read_raw(&store, "k").is_none());
        assert!(read_json::<u8, _>(&store, "k").unwrap().is_none());
    }
}
