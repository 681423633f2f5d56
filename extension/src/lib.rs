// Hello World browser extension: a popup that opens the configuration page,
// a configuration page with one persisted checkbox, and a background worker
// that seeds the default on install.
//
// All chrome.* access sits behind SettingsStore and Navigator so the page
// logic runs against in-memory fakes in tests.

pub mod error;
pub mod extension_context;
pub mod lifecycle;
pub mod messaging;
pub mod services;
pub mod settings;
pub mod views;

#[cfg(feature = "ui")]
mod components;

pub use error::{Error, Result};

#[cfg(feature = "ui")]
pub use app::{run_config, run_popup};

/// Route `log` output to the console of the current execution context.
/// Call once per context (popup, options page, service worker).
pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
}

#[cfg(feature = "ui")]
mod app {
    use dioxus::prelude::*;
    use wasm_bindgen::prelude::*;

    use crate::components::{ConfigPage, LauncherPage};
    use crate::extension_context::ExtensionContext;

    /// Both documents mount into `<div id="main">`
    const ROOT_ELEMENT_ID: &str = "main";

    #[component]
    fn Popup() -> Element {
        use_context_provider(ExtensionContext::chrome);
        rsx! { LauncherPage {} }
    }

    #[component]
    fn Config() -> Element {
        use_context_provider(ExtensionContext::chrome);
        rsx! { ConfigPage {} }
    }

    fn launch(root: fn() -> Element) {
        LaunchBuilder::web()
            .with_cfg(dioxus_web::Config::new().rootname(ROOT_ELEMENT_ID))
            .launch(root);
    }

    /// Entry point for popup/popup.html
    #[wasm_bindgen]
    pub fn run_popup() {
        crate::init_logging();
        log::info!("Popup starting...");
        launch(Popup);
    }

    /// Entry point for config/config.html
    #[wasm_bindgen]
    pub fn run_config() {
        crate::init_logging();
        log::info!("Configuration page starting...");
        launch(Config);
    }
}
