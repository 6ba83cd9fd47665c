//! The stored envelope for expiring entries.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value stored together with the moment it stops being valid.
///
/// Encoded as `{"value": ..., "expiry": "2020-11-10T01:00:00.000Z"}`, the
/// same shape a browser's `JSON.stringify` produces for a `Date`, so records
/// written by other clients of the same store read back unchanged. Expiries
/// with sub-millisecond precision keep their extra digits, so the stored
/// expiry is always exactly the one the writer checked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageRecord<T> {
    pub value: T,
    #[serde(serialize_with = "serialize_expiry", deserialize_with = "deserialize_expiry")]
    pub expiry: DateTime<Utc>,
}

impl<T> StorageRecord<T> {
    pub fn new(value: T, expiry: DateTime<Utc>) -> Self {
        Self { value, expiry }
    }

    /// True once `now` is strictly past the expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry < now
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Converts JavaScript milliseconds since the epoch into a timestamp.
///
/// Returns `None` for `NaN`, infinities and values outside chrono's range.
pub fn expiry_from_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    let whole = ms.trunc();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(whole as i64)
}

// Millisecond digits at minimum, more only when the expiry carries them.
fn expiry_format(expiry: &DateTime<Utc>) -> SecondsFormat {
    let nanos = expiry.timestamp_subsec_nanos();
    if nanos % 1_000_000 == 0 {
        SecondsFormat::Millis
    } else if nanos % 1_000 == 0 {
        SecondsFormat::Micros
    } else {
        SecondsFormat::Nanos
    }
}

fn serialize_expiry<S: Serializer>(expiry: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&expiry.to_rfc3339_opts(expiry_format(expiry), true))
}

// Accepts any RFC 3339 offset, normalised to UTC.
fn deserialize_expiry<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}
