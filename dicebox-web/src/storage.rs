//! `localStorage` implementation of the core key/value store.

use dicebox_core::KeyValueStore;
use web_sys::Storage;

use crate::dom;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum WebStorageError {
    #[error("localStorage is unavailable")]
    Unavailable,
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Web-specific key/value storage using `localStorage`.
///
/// Private browsing modes and sandboxed frames may deny storage entirely; the
/// store then reports every call as [`WebStorageError::Unavailable`] and the
/// session carries on in memory.
#[derive(Debug, Clone, Default)]
pub struct WebStorage {
    storage: Option<Storage>,
}

impl WebStorage {
    /// Bind to `window.localStorage`, or a detached store when it is missing.
    #[must_use]
    pub fn open() -> Self {
        match dom::local_storage() {
            Ok(storage) => Self {
                storage: Some(storage),
            },
            Err(err) => {
                log::warn!("running without persistence: {}", dom::js_error_message(&err));
                Self::detached()
            }
        }
    }

    /// A store with no backing storage.
    #[must_use]
    pub const fn detached() -> Self {
        Self { storage: None }
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.storage.is_some()
    }

    fn storage(&self) -> Result<&Storage, WebStorageError> {
        self.storage.as_ref().ok_or(WebStorageError::Unavailable)
    }
}

impl KeyValueStore for WebStorage {
    type Error = WebStorageError;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.storage()?
            .get_item(key)
            .map_err(|e| WebStorageError::Storage(dom::js_error_message(&e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| WebStorageError::Storage(dom::js_error_message(&e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| WebStorageError::Storage(dom::js_error_message(&e)))
    }
}
