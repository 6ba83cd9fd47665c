//! Clash detection: is any of a set of keys already present?
//!
//! Presence is decided on the raw stored string, so a key holding any
//! non-empty value (JSON or not, expired record or not) counts as a clash.

use crate::handle::StoreHandle;
use crate::raw;

/// Returns `true` if any key in `keys` is present in `store`.
pub fn has_clash<K, S>(keys: &[K], store: &S) -> bool
where
    K: AsRef<str>,
    S: StoreHandle + ?Sized,
{
    find_clash(keys, store).is_some()
}

/// Returns the first key in `keys` that is present in `store`.
pub fn find_clash<'k, K, S>(keys: &'k [K], store: &S) -> Option<&'k str>
where
    K: AsRef<str>,
    S: StoreHandle + ?Sized,
{
    find_clash_with_prefix(keys, "", store)
}

/// Like [`find_clash`], looking each key up as `prefix` followed by the key.
///
/// The returned key is the caller's, without the prefix.
pub fn find_clash_with_prefix<'k, K, S>(keys: &'k [K], prefix: &str, store: &S) -> Option<&'k str>
where
    K: AsRef<str>,
    S: StoreHandle + ?Sized,
{
    keys.iter().map(AsRef::<str>::as_ref).find(|key| {
        if prefix.is_empty() {
            raw::read_raw(store, key).is_some()
        } else {
            raw::read_raw(store, &format!("{prefix}{key}")).is_some()
        }
    })
}
