use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::LauncherConfig;
use crate::preference::default_store_path;
use crate::runtime::Runtime;

/// Command-line values layered over an optional config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub url_scheme: Option<String>,
    pub app_store_url: Option<String>,
    pub cookie_name: Option<String>,
    pub prompt_message: Option<String>,
    pub auto_launch_message: Option<String>,
    pub message_delay_ms: Option<u64>,
    pub store_path: Option<PathBuf>,
}

pub struct Config {
    pub launcher: LauncherConfig,
    pub store_path: PathBuf,
}

impl Config {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<Self> {
        let mut launcher = match &overrides.config_file {
            Some(path) => LauncherConfig::load(runtime, path)?,
            None => LauncherConfig::new(
                overrides
                    .url_scheme
                    .clone()
                    .context("--url-scheme is required without --config")?,
                overrides
                    .app_store_url
                    .clone()
                    .context("--app-store-url is required without --config")?,
                overrides
                    .cookie_name
                    .clone()
                    .context("--cookie-name is required without --config")?,
            ),
        };

        if let Some(url_scheme) = overrides.url_scheme {
            launcher.url_scheme = url_scheme;
        }
        if let Some(app_store_url) = overrides.app_store_url {
            launcher.app_store_url = app_store_url;
        }
        if let Some(cookie_name) = overrides.cookie_name {
            launcher.cookie_name = cookie_name;
        }
        if let Some(message) = overrides.prompt_message {
            launcher.prompt_message = message;
        }
        if let Some(message) = overrides.auto_launch_message {
            launcher.auto_launch_message = message;
        }
        if let Some(ms) = overrides.message_delay_ms {
            launcher.timing.message_delay = Duration::from_millis(ms);
        }
        launcher.validate()?;

        let store_path = match overrides.store_path {
            Some(path) => path,
            None => default_store_path(runtime)?,
        };
        debug!("Using preference store {}", store_path.display());

        Ok(Self {
            launcher,
            store_path,
        })
    }
}
