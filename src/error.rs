//! Error types for tinystash operations.

use std::io;

use thiserror::Error;

/// Failure signalled by a [`StoreHandle`](crate::StoreHandle) backend.
///
/// Backends must raise one of these instead of silently dropping a write;
/// the availability probe relies on it.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The write would exceed the backend's storage quota
    #[error("storage quota exceeded ({used} of {limit} bytes)")]
    QuotaExceeded { used: usize, limit: usize },
    /// The backend refuses all access (e.g. private browsing, policy)
    #[error("storage is disabled")]
    Disabled,
    /// File system related error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The backend's own persisted state could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Web storage exception (only available with wasm)
    #[cfg(feature = "wasm")]
    #[error("Web storage error: {0}")]
    WebStorage(String),
}

/// Errors that cross the storage facade.
///
/// Everything else (unavailable storage, missing keys, rejected expiring
/// writes) degrades to a no-op or an absent result.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A JSON read found a payload that is not valid for the requested type
    #[error("malformed JSON stored under {key:?}: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// The value handed to a JSON write cannot be encoded
    #[error("cannot encode value for {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// The key the failing operation targeted.
    pub fn key(&self) -> &str {
        match self {
            Self::Parse { key, .. } | Self::Encode { key, .. } => key,
        }
    }
}
