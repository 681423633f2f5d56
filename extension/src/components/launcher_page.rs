use dioxus::prelude::*;

use crate::extension_context::ExtensionContext;
use crate::views::{open_config, OPEN_CONFIG_BUTTON_ID};

#[component]
pub fn LauncherPage() -> Element {
    let ctx = use_context::<ExtensionContext>();

    rsx! {
        div { class: "container",
            h1 { "Hello World" }
            p { class: "subtitle", "Welcome to the extension popup." }

            button {
                id: OPEN_CONFIG_BUTTON_ID,
                class: "primary",
                onclick: move |_| {
                    let navigator = ctx.navigator();
                    spawn(async move {
                        if let Err(e) = open_config(navigator.as_ref()).await {
                            log::error!("Failed to open configuration page: {}", e);
                        }
                    });
                },
                "Open Configuration"
            }
        }
    }
}
