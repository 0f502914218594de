//! File-backed local credential storage.
//!
//! A flat JSON object of string keys to string values, the desktop
//! counterpart of browser local storage. Transfers only read from it; the
//! login flow that fills it lives elsewhere.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

/// Key/value credential store persisted as JSON.
#[derive(Debug, Clone, Default)]
pub struct LocalCredentialStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl LocalCredentialStore {
    /// In-memory store with no backing file.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let entries = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "credential store opened");
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// Returns the value stored under `key`. Empty values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes the store back to its file. No-op for in-memory stores.
    pub fn save(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.entries)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}
