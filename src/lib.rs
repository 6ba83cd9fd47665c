//! # tinystash
//!
//! A best-effort key-value layer over browser-style storage.
//!
//! Any backend that implements [`StoreHandle`] (string keys, string values)
//! gets:
//!
//! - availability probing ([`probe`]),
//! - plain and JSON reads and writes ([`raw`]),
//! - values that expire and are evicted lazily on read ([`expiry`]),
//! - clash detection over a set of keys ([`clash`]).
//!
//! Storage is optional persistence: writes to a store that cannot accept
//! them are skipped, missing keys read as `None`, and the only errors are
//! JSON payloads that fail to parse or encode.
//!
//! ```
//! use chrono::{Duration, Utc};
//! use tinystash::{MemoryStore, Storage};
//!
//! let mut storage = Storage::new(MemoryStore::new()).with_namespace("app1");
//! storage.write_json("colorOptions", &["red", "green", "blue"])?;
//!
//! let now = Utc::now();
//! storage.write_with_expiry("promo", &true, now, Some(now + Duration::days(1)))?;
//! assert_eq!(storage.read_with_expiry::<bool>("promo", now)?, Some(true));
//!
//! assert!(storage.has_clash(&["modalOpen", "promo"]));
//! # Ok::<(), tinystash::StorageError>(())
//! ```

pub mod clash;
pub mod config;
pub mod error;
pub mod expiry;
pub mod file;
pub mod handle;
pub mod memory;
pub mod probe;
pub mod raw;
pub mod record;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::StorageConfig;
pub use error::{BackendError, StorageError};
pub use file::FileStore;
pub use handle::StoreHandle;
pub use memory::MemoryStore;
pub use raw::Format;
pub use record::StorageRecord;
pub use store::Storage;

#[cfg(feature = "wasm")]
pub use wasm::{TinyStash, WebStorage, WebStorageBackend};

#[cfg(test)]
mod tests;
