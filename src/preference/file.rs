use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::PreferenceStore;
use super::cookie::{escape, unescape};
use crate::runtime::Runtime;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct StoredEntry {
    /// Escaped value.
    value: String,
    expires: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
struct StoredEntries {
    #[serde(default)]
    entries: BTreeMap<String, StoredEntry>,
}

/// Preference store persisted as a JSON file, for hosts without a cookie jar.
pub struct FileStore<R: Runtime> {
    runtime: R,
    path: PathBuf,
}

/// Default location of the preference file
#[tracing::instrument(skip(runtime))]
pub fn default_store_path<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let config_dir = runtime
        .config_dir()
        .context("Could not find config directory")?;
    Ok(config_dir.join("app-launcher").join("preferences.json"))
}

impl<R: Runtime> FileStore<R> {
    pub fn new(runtime: R, path: PathBuf) -> Self {
        Self { runtime, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file or one holding invalid JSON reads as empty. Read
    /// errors are returned so a transient failure never looks like an empty
    /// store.
    fn load(&self) -> Result<StoredEntries> {
        if !self.runtime.exists(&self.path) {
            return Ok(StoredEntries::default());
        }
        let content = self
            .runtime
            .read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences from {}", self.path.display()))?;
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Ignoring corrupt preference file {}: {}", self.path.display(), e);
                Ok(StoredEntries::default())
            }
        }
    }

    fn save(&self, entries: &StoredEntries) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !self.runtime.exists(parent) {
                self.runtime.create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        self.runtime
            .write(&self.path, content.as_bytes())
            .with_context(|| format!("Failed to save preferences to {}", self.path.display()))
    }
}

impl<R: Runtime> PreferenceStore for FileStore<R> {
    #[tracing::instrument(skip(self))]
    fn get(&self, key: &str) -> Option<String> {
        let now = self.runtime.now();
        let mut stored = match self.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("{:#}", e);
                return None;
            }
        };
        stored
            .entries
            .remove(key)
            .filter(|entry| entry.expires > now)
            .map(|entry| unescape(&entry.value))
    }

    #[tracing::instrument(skip(self))]
    fn set(&self, key: &str, value: &str, expires: DateTime<Utc>) -> Result<()> {
        let now = self.runtime.now();
        let mut stored = self.load()?;
        stored.entries.retain(|_, entry| entry.expires > now);
        stored.entries.insert(
            key.to_string(),
            StoredEntry {
                value: escape(value),
                expires,
            },
        );
        debug!("Writing {} preference(s) to {}", stored.entries.len(), self.path.display());
        self.save(&stored)
    }
}
