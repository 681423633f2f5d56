use crate::error::Result;
use crate::services::navigation::Navigator;

pub const CONFIG_PAGE_PATH: &str = "config/config.html";
pub const OPEN_CONFIG_BUTTON_ID: &str = "openConfig";

/// Open the configuration page in a new tab. Each call opens another tab.
pub async fn open_config(navigator: &dyn Navigator) -> Result<()> {
    let url = navigator.extension_url(CONFIG_PAGE_PATH);
    navigator.open_tab(&url).await
}
