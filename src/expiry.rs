//! Expiring accessors with lazy eviction.
//!
//! An expiring entry is a [`StorageRecord`] stored as JSON under one key.
//! Nothing sweeps expired records in the background: the next
//! [`read_with_expiry`] that finds one past its expiry deletes it.
//!
//! `now` is always supplied by the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::StorageError;
use crate::handle::StoreHandle;
use crate::probe::PROBE_KEY;
use crate::raw;
use crate::record::StorageRecord;

/// Stores `value` under `key` until `expiry`.
///
/// Does nothing when `expiry` is `None` or not after `now`; an
/// already-expired record is never written.
pub fn write_with_expiry<T, S>(
    store: &mut S,
    key: &str,
    value: &T,
    now: DateTime<Utc>,
    expiry: Option<DateTime<Utc>>,
) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: StoreHandle + ?Sized,
{
    write_with_expiry_with(store, key, value, now, expiry, PROBE_KEY)
}

/// Returns the value stored under `key` unless its record expired before
/// `now`, in which case the key is removed and `None` returned.
///
/// The expiry is checked before the value is decoded, so an expired record
/// is evicted even when its value no longer fits `T`. The expiry itself is
/// never handed back to the caller.
pub fn read_with_expiry<T, S>(
    store: &mut S,
    key: &str,
    now: DateTime<Utc>,
) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: StoreHandle + ?Sized,
{
    let Some(record) = raw::read_json::<StorageRecord<Value>, _>(&*store, key)? else {
        return Ok(None);
    };

    if record.is_expired(now) {
        debug!(key, expiry = %record.expiry, "evicting expired entry");
        raw::remove(store, key);
        return Ok(None);
    }

    serde_json::from_value(record.into_value())
        .map(Some)
        .map_err(|source| StorageError::Parse {
            key: key.to_string(),
            source,
        })
}

/// Like [`write_with_expiry`], probing availability with `sentinel`
/// instead of [`PROBE_KEY`].
pub fn write_with_expiry_with<T, S>(
    store: &mut S,
    key: &str,
    value: &T,
    now: DateTime<Utc>,
    expiry: Option<DateTime<Utc>>,
    sentinel: &str,
) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: StoreHandle + ?Sized,
{
    let Some(expiry) = expiry else {
        debug!(key, "no expiry given, write skipped");
        return Ok(());
    };

    if now >= expiry {
        debug!(key, %now, %expiry, "expiry already passed, write skipped");
        return Ok(());
    }

    let record = StorageRecord::new(value, expiry);
    raw::write_json_with(store, key, &record, sentinel)
}
