// Background service worker for the Hello World extension
// Built with --no-default-features (no Dioxus) and --target no-modules.
// background.js registers the chrome.runtime listeners and forwards to these.

use hello_world_extension::lifecycle::{on_installed, InstallReason};
use hello_world_extension::messaging::acknowledge;
use hello_world_extension::services::ChromeStore;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Dummy main for binary target
fn main() {}

/// Initialize background service worker
/// Called from JavaScript glue via wasm_bindgen
#[wasm_bindgen]
pub fn init_background() {
    hello_world_extension::init_logging();
    log::info!("Background service worker started");
}

/// Handle chrome.runtime.onInstalled
///
/// Failures are logged only; the platform does not wait on the result.
#[wasm_bindgen]
pub async fn handle_install(reason: String) {
    let reason = InstallReason::parse(&reason);
    let store = ChromeStore::sync();

    if let Err(e) = on_installed(&store, &reason).await {
        log::error!("Install handler failed ({}): {}", reason.as_str(), e);
    }
}

/// Handle chrome.runtime.onMessage, answered synchronously with `{ status: "ok" }`
#[wasm_bindgen]
pub fn handle_message(message: JsValue) -> Result<JsValue, JsValue> {
    let payload: serde_json::Value =
        serde_wasm_bindgen::from_value(message).unwrap_or(serde_json::Value::Null);

    let response = acknowledge(&payload);
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    response
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
