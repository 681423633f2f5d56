// Page navigation through chrome.runtime / chrome.tabs

use std::cell::RefCell;

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::{Error, Result};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = getURL)]
    fn runtime_get_url(path: &str) -> String;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = create)]
    fn tabs_create(properties: JsValue) -> std::result::Result<js_sys::Promise, JsValue>;
}

#[async_trait(?Send)]
pub trait Navigator {
    /// Absolute URL of a page bundled with the extension
    fn extension_url(&self, path: &str) -> String;

    /// Open `url` in a new tab
    async fn open_tab(&self, url: &str) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ChromeNavigator;

#[async_trait(?Send)]
impl Navigator for ChromeNavigator {
    fn extension_url(&self, path: &str) -> String {
        runtime_get_url(path)
    }

    async fn open_tab(&self, url: &str) -> Result<()> {
        log::info!("Opening tab: {}", url);

        let properties = js_sys::Object::new();
        js_sys::Reflect::set(&properties, &"url".into(), &url.into())
            .map_err(navigation_error)?;

        let promise = tabs_create(properties.into()).map_err(navigation_error)?;
        JsFuture::from(promise).await.map_err(navigation_error)?;
        Ok(())
    }
}

fn navigation_error(value: JsValue) -> Error {
    match Error::from(value) {
        Error::Js(message) => Error::Navigation(message),
        other => other,
    }
}

/// Navigator that resolves against a fixed origin and remembers what it opened.
pub struct RecordingNavigator {
    base: String,
    opened: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new(extension_id: &str) -> Self {
        Self {
            base: format!("chrome-extension://{}/", extension_id),
            opened: RefCell::new(Vec::new()),
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Navigator for RecordingNavigator {
    fn extension_url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    async fn open_tab(&self, url: &str) -> Result<()> {
        self.opened.borrow_mut().push(url.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_navigator_resolves_relative_to_identity() {
        let nav = RecordingNavigator::new("test-id");
        assert_eq!(
            nav.extension_url("config/config.html"),
            "chrome-extension://test-id/config/config.html"
        );
        assert_eq!(
            nav.extension_url("/popup/popup.html"),
            "chrome-extension://test-id/popup/popup.html"
        );
    }
}
