pub mod launcher;
pub mod options;

pub use launcher::{open_config, CONFIG_PAGE_PATH, OPEN_CONFIG_BUTTON_ID};
pub use options::{ConfigState, OptionsController, ENABLE_FEATURE_CHECKBOX_ID};
