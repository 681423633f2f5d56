// Install handler for `chrome.runtime.onInstalled`.

use crate::error::Result;
use crate::services::storage::SettingsStore;
use crate::settings::{Settings, SettingsRecord};

/// Reason string carried by the `onInstalled` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallReason {
    Install,
    Update,
    ChromeUpdate,
    SharedModuleUpdate,
    Other(String),
}

impl InstallReason {
    pub fn parse(reason: &str) -> Self {
        match reason {
            "install" => Self::Install,
            "update" => Self::Update,
            "chrome_update" => Self::ChromeUpdate,
            "shared_module_update" => Self::SharedModuleUpdate,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Install => "install",
            Self::Update => "update",
            Self::ChromeUpdate => "chrome_update",
            Self::SharedModuleUpdate => "shared_module_update",
            Self::Other(other) => other,
        }
    }
}

/// Seed the defaults on a fresh install. Updates and every other reason keep
/// whatever is already stored.
pub async fn on_installed(store: &dyn SettingsStore, reason: &InstallReason) -> Result<()> {
    match reason {
        InstallReason::Install => {
            log::info!("Extension installed");
            Settings::new(store)
                .apply(&SettingsRecord::install_defaults())
                .await
        }
        InstallReason::Update => {
            log::info!("Extension updated");
            Ok(())
        }
        other => {
            log::debug!("Ignoring onInstalled reason `{}`", other.as_str());
            Ok(())
        }
    }
}
