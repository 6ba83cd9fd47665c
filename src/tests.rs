//! Behaviour tests across backends and layers.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{Value, json};

use crate::{
    FileStore, Format, MemoryStore, Storage, StoreHandle, clash, expiry, probe, raw,
};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 11, day, hour, 0, 0).unwrap()
}

#[test]
fn test_get_storage_values() {
    let mut store = MemoryStore::new();
    raw::write_raw(&mut store, "promoActive", true);
    raw::write(&mut store, "darkMode", &json!(true), Format::Json).unwrap();
    raw::write(&mut store, "colorOptions", &json!(["red", "green", "blue"]), Format::Json).unwrap();
    raw::write(&mut store, "count", &json!(5), Format::Json).unwrap();

    assert_eq!(raw::read(&store, "notSet", Format::Raw).unwrap(), None);
    assert_eq!(raw::read(&store, "promoActive", Format::Raw).unwrap(), Some(json!("true")));
    assert_eq!(raw::read(&store, "darkMode", Format::Json).unwrap(), Some(json!(true)));
    assert_eq!(
        raw::read(&store, "colorOptions", Format::Json).unwrap(),
        Some(json!(["red", "green", "blue"]))
    );
    assert_eq!(raw::read(&store, "count", Format::Json).unwrap(), Some(json!(5)));
}

#[test]
fn test_per_call_store_override() {
    let mut local = Storage::new(MemoryStore::new());
    let mut session = MemoryStore::new();

    local.write_raw("theme", "dark");
    raw::write_raw(&mut session, "theme", "light");

    assert_eq!(local.read_raw("theme").as_deref(), Some("dark"));
    assert_eq!(raw::read_raw(&session, "theme").as_deref(), Some("light"));
    assert!(clash::has_clash(&["theme"], &session));
}

#[test]
fn test_swappable_backends() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let mut stores: Vec<Box<dyn StoreHandle>> = vec![
        Box::new(MemoryStore::new()),
        Box::new(FileStore::open(temp_file.path()).unwrap()),
    ];

    for store in stores.iter_mut() {
        assert!(probe::is_available(store.as_mut()));

        expiry::write_with_expiry(store.as_mut(), "session", &json!({"role": "admin"}), at(9, 1), Some(at(10, 1)))
            .unwrap();
        let live: Option<Value> = expiry::read_with_expiry(store.as_mut(), "session", at(9, 12)).unwrap();
        assert_eq!(live, Some(json!({"role": "admin"})));

        let gone: Option<Value> = expiry::read_with_expiry(store.as_mut(), "session", at(15, 1)).unwrap();
        assert!(gone.is_none());
        assert!(store.get("session").unwrap().is_none());
    }
}

#[test]
fn test_file_store_through_facade() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let temp_path = temp_file.path().to_path_buf();

    {
        let mut storage = Storage::new(FileStore::open(&temp_path).unwrap()).with_namespace("app1");
        storage.write_json("count", &42).unwrap();
        storage
            .write_with_expiry("session", "token", at(9, 1), Some(at(10, 1)))
            .unwrap();
    }

    let mut storage = Storage::new(FileStore::open(&temp_path).unwrap()).with_namespace("app1");
    assert_eq!(storage.read_json::<u32>("count").unwrap(), Some(42));
    assert!(storage.has_clash(&["session"]));

    let token: Option<String> = storage.read_with_expiry("session", at(11, 1)).unwrap();
    assert!(token.is_none());

    // Eviction reached the file
    let reopened = FileStore::open(&temp_path).unwrap();
    assert!(reopened.get("app1:session").unwrap().is_none());
    assert!(reopened.get("storagetest").unwrap().is_none());
}

#[test]
fn test_expired_write_leaves_store_unchanged() {
    let mut store = MemoryStore::new();
    raw::write_raw(&mut store, "other", "x");

    expiry::write_with_expiry(&mut store, "k", &1, at(12, 1), Some(at(10, 1))).unwrap();

    assert_eq!(store.keys(), vec!["other".to_string()]);
    let val: Option<u32> = expiry::read_with_expiry(&mut store, "k", at(9, 1)).unwrap();
    assert!(val.is_none());
}

proptest! {
    #[test]
    fn prop_unwritten_keys_are_absent(key in "[a-zA-Z0-9:_]{1,24}", hours in 0i64..100_000) {
        let mut store = MemoryStore::new();
        let now = at(9, 1) + Duration::hours(hours);

        prop_assert!(raw::read_raw(&store, &key).is_none());
        prop_assert!(raw::read_json::<Value, _>(&store, &key).unwrap().is_none());
        prop_assert!(expiry::read_with_expiry::<Value, _>(&mut store, &key, now).unwrap().is_none());
    }

    #[test]
    fn prop_json_round_trip(key in "[a-z]{1,12}", n in any::<i64>(), s in ".{0,32}", flag in any::<bool>()) {
        let mut store = MemoryStore::new();
        let value = json!({"n": n, "s": s, "flag": flag, "list": [n, flag]});

        raw::write_json(&mut store, &key, &value).unwrap();
        prop_assert_eq!(raw::read_json::<Value, _>(&store, &key).unwrap(), Some(value));
    }

    #[test]
    fn prop_expiry_boundary(offset_secs in -86_400i64..86_400) {
        let mut store = MemoryStore::new();
        let expiry_at = at(10, 1);
        expiry::write_with_expiry(&mut store, "k", &7u8, at(9, 1), Some(expiry_at)).unwrap();

        let now = expiry_at + Duration::seconds(offset_secs);
        let val: Option<u8> = expiry::read_with_expiry(&mut store, "k", now).unwrap();

        if offset_secs <= 0 {
            prop_assert_eq!(val, Some(7));
            prop_assert!(store.contains_key("k"));
        } else {
            prop_assert!(val.is_none());
            prop_assert!(!store.contains_key("k"));
        }
    }

    #[test]
    fn prop_clash_iff_any_present(k1 in "[a-z]{1,8}", k2 in "[A-Z]{1,8}", write1: bool, write2: bool) {
        let mut store = MemoryStore::new();
        if write1 {
            raw::write_raw(&mut store, &k1, "1");
        }
        if write2 {
            raw::write_raw(&mut store, &k2, "2");
        }

        prop_assert_eq!(clash::has_clash(&[&k1, &k2], &store), write1 || write2);
    }
}
