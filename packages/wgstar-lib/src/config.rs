use crate::{
    constant::{DEFAULT_WGSTAR_CONF_PATH, DEFAULT_WIREGUARD_ETC_DIR, WIREGUARD_INTERFACE},
    util::expand_home,
};
use anyhow::Context;
use serde::Deserialize;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

fn default_wireguard_dir() -> String {
    DEFAULT_WIREGUARD_ETC_DIR.to_string()
}

fn default_preshared_key_path() -> String {
    DEFAULT_WGSTAR_CONF_PATH.to_string()
}

fn default_interface() -> String {
    WIREGUARD_INTERFACE.to_string()
}

/// Where wgstar reads and writes its files. Every field is optional in the
/// YAML document.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_wireguard_dir")]
    wireguard_dir: String,
    #[serde(default = "default_preshared_key_path")]
    preshared_key_path: String,
    #[serde(default = "default_interface")]
    interface: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wireguard_dir: default_wireguard_dir(),
            preshared_key_path: default_preshared_key_path(),
            interface: default_interface(),
        }
    }
}

impl Settings {
    pub fn wireguard_dir(&self) -> PathBuf {
        expand_home(&self.wireguard_dir)
    }

    pub fn preshared_key_path(&self) -> PathBuf {
        expand_home(&self.preshared_key_path)
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl TryFrom<&PathBuf> for Settings {
    type Error = anyhow::Error;
    fn try_from(p: &PathBuf) -> anyhow::Result<Self> {
        Settings::try_from(p.as_path())
    }
}

impl TryFrom<&Path> for Settings {
    type Error = anyhow::Error;
    fn try_from(p: &Path) -> anyhow::Result<Self> {
        let file =
            File::open(p).with_context(|| format!("reading settings {}", p.display()))?;
        let content: serde_yaml::Value = serde_yaml::from_reader(file)
            .with_context(|| format!("parsing settings {}", p.display()))?;
        // An empty document deserializes to `Null`.
        if content.is_null() {
            return Ok(Settings::default());
        }
        let settings: Settings = serde_yaml::from_value(content)?;
        Ok(settings)
    }
}

impl TryFrom<&str> for Settings {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> anyhow::Result<Self> {
        let content: serde_yaml::Value = serde_yaml::from_str(s)?;
        if content.is_null() {
            return Ok(Settings::default());
        }
        let settings: Settings = serde_yaml::from_value(content)?;
        Ok(settings)
    }
}
