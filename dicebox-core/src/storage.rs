//! In-memory store and best-effort persistence helpers.
//!
//! Every container treats storage as optional: a failed read yields the
//! default state and a failed write is logged and dropped, leaving the
//! in-memory value authoritative for the rest of the session.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::KeyValueStore;

/// Key/value store held entirely in memory. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored pair.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.items.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

pub(crate) fn read_string<S: KeyValueStore>(store: &S, key: &str) -> Option<String> {
    match store.get_item(key) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("storage read of `{key}` failed: {err}");
            None
        }
    }
}

pub(crate) fn write_string<S: KeyValueStore>(store: &S, key: &str, value: &str) {
    if let Err(err) = store.set_item(key, value) {
        log::warn!("storage write of `{key}` failed: {err}");
    }
}

pub(crate) fn remove_key<S: KeyValueStore>(store: &S, key: &str) {
    if let Err(err) = store.remove_item(key) {
        log::warn!("storage removal of `{key}` failed: {err}");
    }
}

/// Read and decode a JSON value; corrupt snapshots are discarded.
pub(crate) fn read_json<S, T>(store: &S, key: &str) -> Option<T>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    let raw = read_string(store, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("discarding corrupt `{key}` snapshot: {err}");
            None
        }
    }
}

pub(crate) fn write_json<S, T>(store: &S, key: &str, value: &T)
where
    S: KeyValueStore,
    T: Serialize + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(json) => write_string(store, key, &json),
        Err(err) => log::warn!("could not encode `{key}`: {err}"),
    }
}
