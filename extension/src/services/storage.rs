// Chrome Storage API Integration
// Settings live in chrome.storage; views and the background worker only talk
// to it through the SettingsStore trait.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::{Error, Result};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    fn sync_get(keys: JsValue) -> std::result::Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    fn sync_set(items: JsValue) -> std::result::Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    fn local_get(keys: JsValue) -> std::result::Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = set)]
    fn local_set(items: JsValue) -> std::result::Result<js_sys::Promise, JsValue>;
}

/// Asynchronous key-value store shared by every extension context.
///
/// A missing key is `Ok(None)`, never an error. Writes are total overwrites of
/// the key; concurrent writers race with last-writer-wins. The store does not
/// check the shape of the values it is given.
#[async_trait(?Send)]
pub trait SettingsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageArea {
    Local,
    /// Follows the signed-in user across devices
    Sync,
}

/// `chrome.storage` backed store.
#[derive(Clone, Copy, Debug)]
pub struct ChromeStore {
    area: StorageArea,
}

impl ChromeStore {
    pub fn new(area: StorageArea) -> Self {
        Self { area }
    }

    pub fn sync() -> Self {
        Self::new(StorageArea::Sync)
    }

    fn request_get(&self, keys: JsValue) -> std::result::Result<js_sys::Promise, JsValue> {
        match self.area {
            StorageArea::Local => local_get(keys),
            StorageArea::Sync => sync_get(keys),
        }
    }

    fn request_set(&self, items: JsValue) -> std::result::Result<js_sys::Promise, JsValue> {
        match self.area {
            StorageArea::Local => local_set(items),
            StorageArea::Sync => sync_set(items),
        }
    }
}

#[async_trait(?Send)]
impl SettingsStore for ChromeStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        log::debug!("Reading `{}` from {:?} storage", key, self.area);

        let keys = js_sys::Array::new();
        keys.push(&key.into());

        let promise = self.request_get(keys.into()).map_err(storage_error)?;
        let result = JsFuture::from(promise).await.map_err(storage_error)?;

        let raw = js_sys::Reflect::get(&result, &key.into()).map_err(storage_error)?;
        if raw.is_undefined() {
            return Ok(None);
        }

        let value: Value = serde_wasm_bindgen::from_value(raw)?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        log::debug!("Writing `{}` = {} to {:?} storage", key, value, self.area);

        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let js_value = value.serialize(&serializer)?;

        let items = js_sys::Object::new();
        js_sys::Reflect::set(&items, &key.into(), &js_value).map_err(storage_error)?;

        let promise = self.request_set(items.into()).map_err(storage_error)?;
        JsFuture::from(promise).await.map_err(storage_error)?;
        Ok(())
    }
}

fn storage_error(value: JsValue) -> Error {
    match Error::from(value) {
        Error::Js(message) => Error::Storage(message),
        other => other,
    }
}

/// In-process store, used wherever chrome.storage is not reachable (tests).
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, Value>>,
    writes: Cell<usize>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Make every following operation fail as if storage were gone
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    pub fn peek(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.get() {
            return Err(Error::Storage("memory store marked unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl SettingsStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.check_available()?;
        Ok(self.values.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.check_available()?;
        self.values.borrow_mut().insert(key.to_owned(), value);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn missing_key_resolves_to_none() {
        let store = MemoryStore::new();
        assert_eq!(block_on(store.get("enableFeature")).unwrap(), None);
    }

    #[test]
    fn set_then_get_returns_written_value() {
        let store = MemoryStore::new();
        for b in [true, false] {
            block_on(store.set("enableFeature", json!(b))).unwrap();
            assert_eq!(
                block_on(store.get("enableFeature")).unwrap(),
                Some(json!(b))
            );
        }
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn last_writer_wins() {
        let store = MemoryStore::new();
        block_on(store.set("enableFeature", json!(true))).unwrap();
        block_on(store.set("enableFeature", json!(false))).unwrap();
        assert_eq!(store.peek("enableFeature"), Some(json!(false)));
    }

    #[test]
    fn store_does_not_validate_values() {
        let store = MemoryStore::new();
        block_on(store.set("enableFeature", json!("yes"))).unwrap();
        assert_eq!(store.peek("enableFeature"), Some(json!("yes")));
    }

    #[test]
    fn unavailable_store_rejects_operations() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            block_on(store.get("enableFeature")),
            Err(Error::Storage(_))
        ));
        assert!(matches!(
            block_on(store.set("enableFeature", json!(true))),
            Err(Error::Storage(_))
        ));
        assert_eq!(store.writes(), 0);
    }
}
