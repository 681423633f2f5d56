use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub extension: ExtensionConfig,
    pub pages: PagesConfig,
    #[serde(default)]
    pub icons: Option<IconsConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtensionConfig {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_permissions")]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PagesConfig {
    #[serde(default = "default_popup")]
    pub popup: String,
    #[serde(default = "default_options")]
    pub options: String,
    #[serde(default = "default_service_worker")]
    pub service_worker: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IconsConfig {
    #[serde(default = "default_icon_directory")]
    pub directory: String,
    pub sizes: Vec<u32>,
}

impl IconsConfig {
    pub fn path_for(&self, size: u32) -> String {
        format!("{}/icon-{}.png", self.directory, size)
    }
}

fn default_permissions() -> Vec<String> {
    vec!["storage".to_string()]
}

fn default_popup() -> String {
    "popup/popup.html".to_string()
}

fn default_options() -> String {
    "config/config.html".to_string()
}

fn default_service_worker() -> String {
    "background/background.js".to_string()
}

fn default_icon_directory() -> String {
    "icons".to_string()
}

impl ConfigFile {
    pub fn load(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).context(format!("Failed to read config file: {}", path))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Drop the icon section when `icons_src` does not exist, so the manifest
    /// never points at icon files that were not copied.
    pub fn with_available_icons(mut self, icons_src: &Path) -> Self {
        if self.icons.is_some() && !icons_src.is_dir() {
            println!(
                "⚠️  {} not found, building without icons",
                icons_src.display()
            );
            self.icons = None;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.extension.name.trim().is_empty() {
            anyhow::bail!("[extension] name must not be empty");
        }

        validate_version(&self.extension.version)?;

        // The settings store lives in chrome.storage
        if !self.extension.permissions.iter().any(|p| p == "storage") {
            anyhow::bail!("[extension] permissions must include 'storage'");
        }

        validate_page("popup", &self.pages.popup, ".html")?;
        validate_page("options", &self.pages.options, ".html")?;
        validate_page("service_worker", &self.pages.service_worker, ".js")?;

        if let Some(icons) = &self.icons {
            if icons.sizes.is_empty() || icons.sizes.contains(&0) {
                anyhow::bail!("[icons] sizes must be a non-empty list of positive sizes");
            }
        }

        Ok(())
    }
}

/// Chrome accepts one to four dot-separated integers, each at most 65535.
fn validate_version(version: &str) -> Result<()> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() > 4 {
        anyhow::bail!("Invalid version '{}': at most four components", version);
    }

    for part in parts {
        let valid = !part.is_empty()
            && (part == "0" || !part.starts_with('0'))
            && part.parse::<u16>().is_ok();
        if !valid {
            anyhow::bail!("Invalid version '{}': bad component '{}'", version, part);
        }
    }
    Ok(())
}

fn validate_page(field: &str, path: &str, extension: &str) -> Result<()> {
    if path.starts_with('/') || path.split('/').any(|segment| segment == "..") {
        anyhow::bail!(
            "[pages] {} must be relative to the extension root: {}",
            field,
            path
        );
    }
    if !path.ends_with(extension) {
        anyhow::bail!("[pages] {} must point at a {} file: {}", field, extension, path);
    }
    Ok(())
}
