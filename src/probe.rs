//! Availability probing.

use tracing::debug;

use crate::handle::StoreHandle;

/// Sentinel key (and value) written by [`is_available`].
pub const PROBE_KEY: &str = "storagetest";

/// Checks whether `store` currently accepts writes.
///
/// Writes [`PROBE_KEY`] and removes it again. Returns `false` if the backend
/// signals any failure; never returns an error.
pub fn is_available<S: StoreHandle + ?Sized>(store: &mut S) -> bool {
    is_available_with(store, PROBE_KEY)
}

/// Like [`is_available`], with a caller-chosen sentinel key.
///
/// The remove is attempted even when the write failed so a partially
/// applied write never leaves the sentinel behind.
pub fn is_available_with<S: StoreHandle + ?Sized>(store: &mut S, sentinel: &str) -> bool {
    let written = store.set(sentinel, sentinel);
    let removed = store.remove(sentinel);

    match (written, removed) {
        (Ok(()), Ok(())) => true,
        (Err(e), _) | (Ok(()), Err(e)) => {
            debug!(error = %e, "storage probe failed");
            false
        }
    }
}
