// The persisted settings record and a typed view over the store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ContextExt, Error, Result};
use crate::services::storage::SettingsStore;

pub const ENABLE_FEATURE_KEY: &str = "enableFeature";

/// Everything the extension persists. A `None` field means the key is absent
/// and the reader falls back to its own default.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_feature: Option<bool>,
}

impl SettingsRecord {
    /// Record written on a fresh install
    pub fn install_defaults() -> Self {
        Self {
            enable_feature: Some(true),
        }
    }
}

/// Typed access to the settings keys.
pub struct Settings<'a> {
    store: &'a dyn SettingsStore,
}

impl<'a> Settings<'a> {
    pub fn new(store: &'a dyn SettingsStore) -> Self {
        Self { store }
    }

    pub async fn enable_feature(&self) -> Result<Option<bool>> {
        let value = self
            .store
            .get(ENABLE_FEATURE_KEY)
            .await
            .ctx("reading enableFeature")?;

        match value {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(Error::UnexpectedValue {
                key: ENABLE_FEATURE_KEY.to_owned(),
                value: other,
            }),
        }
    }

    pub async fn set_enable_feature(&self, enabled: bool) -> Result<()> {
        self.store
            .set(ENABLE_FEATURE_KEY, Value::Bool(enabled))
            .await
            .ctx("writing enableFeature")
    }

    /// Write every field present in `record`; absent fields are left alone.
    pub async fn apply(&self, record: &SettingsRecord) -> Result<()> {
        if let Some(enabled) = record.enable_feature {
            self.set_enable_feature(enabled).await?;
        }
        Ok(())
    }
}
