// Capabilities shared with every page through the Dioxus context API.
// Pages never reach chrome.* directly; they go through these handles.

use std::rc::Rc;

use crate::services::navigation::{ChromeNavigator, Navigator};
use crate::services::storage::{ChromeStore, SettingsStore};

#[derive(Clone)]
pub struct ExtensionContext {
    store: Rc<dyn SettingsStore>,
    navigator: Rc<dyn Navigator>,
}

// Contexts don't need real equality
impl PartialEq for ExtensionContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store) && Rc::ptr_eq(&self.navigator, &other.navigator)
    }
}

impl ExtensionContext {
    pub fn new(store: Rc<dyn SettingsStore>, navigator: Rc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// chrome.storage.sync + chrome.tabs
    pub fn chrome() -> Self {
        Self::new(Rc::new(ChromeStore::sync()), Rc::new(ChromeNavigator))
    }

    pub fn store(&self) -> Rc<dyn SettingsStore> {
        self.store.clone()
    }

    pub fn navigator(&self) -> Rc<dyn Navigator> {
        self.navigator.clone()
    }
}
