//! Client configuration.
//!
//! Stored as TOML:
//! - Linux: `~/.config/filesend/client.toml`
//! - Windows: `%APPDATA%/filesend/client.toml`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Storage keys scanned, in order, for a fallback access token.
pub const DEFAULT_CREDENTIAL_KEYS: &[&str] = &["access_token", "token", "auth_token", "jwt"];

/// Configuration shared by every transfer made through one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL prepended to relative endpoints. Empty keeps them relative.
    #[serde(default)]
    pub base_url: String,

    /// Whole-request timeout in seconds. Zero disables it.
    #[serde(default)]
    pub timeout_secs: u64,

    /// Headers attached to every request made by the shared client.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Credential storage keys scanned when no `Authorization` header is set.
    #[serde(default = "default_credential_keys")]
    pub credential_keys: Vec<String>,

    /// Location of the local credential store, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_store: Option<PathBuf>,
}

fn default_credential_keys() -> Vec<String> {
    DEFAULT_CREDENTIAL_KEYS.iter().map(|k| k.to_string()).collect()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 0,
            headers: BTreeMap::new(),
            credential_keys: default_credential_keys(),
            credential_store: None,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the platform path, or defaults if absent.
    pub fn load() -> Result<Self, SettingsError> {
        let path = config_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads the configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), base_url = %config.base_url, "configuration loaded");
        Ok(config)
    }

    /// Saves the configuration to the platform path.
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Saves the configuration as TOML.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Ambient headers may carry secrets.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> Result<PathBuf, SettingsError> {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA").map_err(|_| SettingsError::NoConfigDir)?;
        Ok(PathBuf::from(appdata).join("filesend").join("client.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").map_err(|_| SettingsError::NoConfigDir)?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("filesend")
            .join("client.toml"))
    }
}
