// manifest.json (Manifest V3) rendered from extension.toml

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::ConfigFile;

/// wasm needs 'wasm-unsafe-eval' on extension pages
const EXTENSION_PAGES_CSP: &str = "script-src 'self' 'wasm-unsafe-eval'; object-src 'self'";

#[derive(Debug, Serialize)]
pub struct Manifest {
    pub manifest_version: u8,
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub permissions: Vec<String>,
    pub action: Action,
    pub options_page: String,
    pub background: Background,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub icons: BTreeMap<u32, String>,
    pub content_security_policy: ContentSecurityPolicy,
}

#[derive(Debug, Serialize)]
pub struct Action {
    pub default_popup: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub default_icon: BTreeMap<u32, String>,
}

#[derive(Debug, Serialize)]
pub struct Background {
    pub service_worker: String,
}

#[derive(Debug, Serialize)]
pub struct ContentSecurityPolicy {
    pub extension_pages: String,
}

impl Manifest {
    pub fn from_config(config: &ConfigFile) -> Self {
        let icons: BTreeMap<u32, String> = config
            .icons
            .as_ref()
            .map(|icons| {
                icons
                    .sizes
                    .iter()
                    .map(|&size| (size, icons.path_for(size)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            manifest_version: 3,
            name: config.extension.name.clone(),
            version: config.extension.version.clone(),
            description: config.extension.description.clone(),
            permissions: config.extension.permissions.clone(),
            action: Action {
                default_popup: config.pages.popup.clone(),
                default_icon: icons.clone(),
            },
            options_page: config.pages.options.clone(),
            background: Background {
                service_worker: config.pages.service_worker.clone(),
            },
            icons,
            content_security_policy: ContentSecurityPolicy {
                extension_pages: EXTENSION_PAGES_CSP.to_string(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize manifest")
    }

    pub fn write(&self, out_dir: &Path) -> Result<()> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;

        let path = out_dir.join("manifest.json");
        fs::write(&path, self.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
