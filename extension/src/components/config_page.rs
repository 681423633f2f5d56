use std::rc::Rc;

use dioxus::prelude::*;

use crate::extension_context::ExtensionContext;
use crate::views::{OptionsController, ENABLE_FEATURE_CHECKBOX_ID};

#[component]
pub fn ConfigPage() -> Element {
    let ctx = use_context::<ExtensionContext>();
    let controller = use_hook(|| Rc::new(OptionsController::new(ctx.store())));
    let mut checked = use_signal(|| controller.checked());
    let mut loading = use_signal(|| true);

    let loader = controller.clone();
    use_future(move || {
        let loader = loader.clone();
        async move {
            if let Err(e) = loader.load().await {
                log::warn!("Could not load settings: {}", e);
            }
            checked.set(loader.checked());
            loading.set(false);
        }
    });

    let toggler = controller.clone();

    rsx! {
        div { class: "container",
            h1 { "Hello World" }
            p { "This is the configuration page." }

            div { class: "setting",
                label {
                    input {
                        r#type: "checkbox",
                        id: ENABLE_FEATURE_CHECKBOX_ID,
                        checked: checked(),
                        onchange: move |evt: FormEvent| {
                            // dioxus-web reports checkboxes as "true"/"false"
                            let value = evt.value() == "true";
                            checked.set(value);

                            // The write is not awaited by the render path; a
                            // failed write puts the checkbox back.
                            let toggler = toggler.clone();
                            spawn(async move {
                                if let Err(e) = toggler.toggle(value).await {
                                    log::error!("Failed to save settings: {}", e);
                                    checked.set(toggler.checked());
                                }
                            });
                        }
                    }
                    span { " Enable feature" }
                }
            }

            if loading() {
                p { class: "hint", "Loading settings..." }
            }
        }
    }
}
