//! The storage capability every accessor runs against.

use crate::error::BackendError;

/// A string-keyed, string-valued persistence backend.
///
/// This is the whole surface tinystash needs from a store: browser
/// `localStorage`, an in-memory map or a JSON file all fit. Implementations
/// must return an error rather than silently dropping a write they cannot
/// honour, because availability probing depends on that signal.
pub trait StoreHandle {
    /// Returns the string stored under `key`, or `None` if there is none.
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Deletes `key`. Deleting an absent key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), BackendError>;
}

impl<S: StoreHandle + ?Sized> StoreHandle for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        (**self).remove(key)
    }
}

impl<S: StoreHandle + ?Sized> StoreHandle for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        (**self).remove(key)
    }
}
