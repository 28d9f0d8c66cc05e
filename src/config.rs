use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::runtime::Runtime;

pub const DEFAULT_PROMPT_MESSAGE: &str =
    "An iPhone App is available. Would you like to launch it now?";
pub const DEFAULT_AUTO_LAUNCH_MESSAGE: &str = "Opening in iPhone App...";

/// Delay after the page load event before any message is shown.
pub const DEFAULT_MESSAGE_DELAY: Duration = Duration::from_millis(500);
/// Delay between activating the app link and checking whether the page is still alive.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(500);
/// A fallback check firing within this window of the link activation means
/// the page was never suspended, so the app did not open.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_millis(2000);

/// Timing constants of the prompt flow and the redirect heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timing {
    #[serde(with = "millis")]
    pub message_delay: Duration,
    #[serde(with = "millis")]
    pub fallback_delay: Duration,
    #[serde(with = "millis")]
    pub freshness_window: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            message_delay: DEFAULT_MESSAGE_DELAY,
            fallback_delay: DEFAULT_FALLBACK_DELAY,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
        }
    }
}

/// Launcher configuration, immutable once the launcher is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherConfig {
    /// Custom URL scheme registered by the app, e.g. `fb://`.
    pub url_scheme: String,
    /// Store page opened when the app does not appear to be installed.
    pub app_store_url: String,
    /// Name of the persisted preference entry.
    pub cookie_name: String,
    #[serde(default = "default_prompt_message")]
    pub prompt_message: String,
    #[serde(default = "default_auto_launch_message")]
    pub auto_launch_message: String,
    #[serde(flatten)]
    pub timing: Timing,
}

fn default_prompt_message() -> String {
    DEFAULT_PROMPT_MESSAGE.to_string()
}

fn default_auto_launch_message() -> String {
    DEFAULT_AUTO_LAUNCH_MESSAGE.to_string()
}

impl LauncherConfig {
    pub fn new(
        url_scheme: impl Into<String>,
        app_store_url: impl Into<String>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            url_scheme: url_scheme.into(),
            app_store_url: app_store_url.into(),
            cookie_name: cookie_name.into(),
            prompt_message: default_prompt_message(),
            auto_launch_message: default_auto_launch_message(),
            timing: Timing::default(),
        }
    }

    pub fn with_prompt_message(mut self, message: impl Into<String>) -> Self {
        self.prompt_message = message.into();
        self
    }

    pub fn with_auto_launch_message(mut self, message: impl Into<String>) -> Self {
        self.auto_launch_message = message.into();
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: LauncherConfig =
            serde_json::from_str(content).context("Failed to parse launcher config")?;
        config.validate()?;
        Ok(config)
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read launcher config {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("urlScheme", &self.url_scheme),
            ("appStoreUrl", &self.app_store_url),
            ("cookieName", &self.cookie_name),
        ] {
            if value.trim().is_empty() {
                bail!("Launcher config is missing {}", field);
            }
        }
        if self.cookie_name.contains([';', '=']) || self.cookie_name.trim() != self.cookie_name {
            bail!("Invalid cookie name {:?}", self.cookie_name);
        }
        Ok(())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    #[test]
    fn test_new_applies_defaults() {
        let config = LauncherConfig::new("fb://", "itms://apps.apple.com/app/id284882215", "c1");
        assert_eq!(config.prompt_message, DEFAULT_PROMPT_MESSAGE);
        assert_eq!(config.auto_launch_message, DEFAULT_AUTO_LAUNCH_MESSAGE);
        assert_eq!(config.timing.message_delay, Duration::from_millis(500));
        assert_eq!(config.timing.fallback_delay, Duration::from_millis(500));
        assert_eq!(config.timing.freshness_window, Duration::from_millis(2000));
        config.validate().unwrap();
    }

    #[test]
    fn test_from_json_minimal() {
        let config = LauncherConfig::from_json(
            r#"{ "urlScheme": "fb://", "appStoreUrl": "itms://store", "cookieName": "c1" }"#,
        )
        .unwrap();
        assert_eq!(config, LauncherConfig::new("fb://", "itms://store", "c1"));
    }

    #[test]
    fn test_from_json_overrides() {
        let config = LauncherConfig::from_json(
            r#"{
                "urlScheme": "fb://",
                "appStoreUrl": "itms://store",
                "cookieName": "c1",
                "promptMessage": "Open the app?",
                "autoLaunchMessage": "Opening...",
                "messageDelay": 0,
                "freshnessWindow": 3000
            }"#,
        )
        .unwrap();
        assert_eq!(config.prompt_message, "Open the app?");
        assert_eq!(config.auto_launch_message, "Opening...");
        assert_eq!(config.timing.message_delay, Duration::ZERO);
        assert_eq!(config.timing.fallback_delay, DEFAULT_FALLBACK_DELAY);
        assert_eq!(config.timing.freshness_window, Duration::from_millis(3000));
    }

    #[test]
    fn test_from_json_requires_fields() {
        let err = LauncherConfig::from_json(r#"{ "urlScheme": "fb://" }"#).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));

        let err = LauncherConfig::from_json(
            r#"{ "urlScheme": "fb://", "appStoreUrl": " ", "cookieName": "c1" }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("appStoreUrl"));
    }

    #[test]
    fn test_validate_rejects_bad_cookie_names() {
        for name in ["a;b", "a=b", " c1"] {
            let config = LauncherConfig::new("fb://", "itms://store", name);
            assert!(config.validate().is_err(), "accepted {:?}", name);
        }
    }

    #[test]
    fn test_serialize_uses_millis() {
        let json = serde_json::to_value(LauncherConfig::new("fb://", "itms://store", "c1")).unwrap();
        assert_eq!(json["messageDelay"], 500);
        assert_eq!(json["freshnessWindow"], 2000);
        assert_eq!(json["cookieName"], "c1");
    }

    #[test]
    fn test_load_reads_through_runtime() {
        let mut runtime = MockRuntime::new();
        runtime.expect_read_to_string().returning(|_| {
            Ok(r#"{ "urlScheme": "fb://", "appStoreUrl": "itms://store", "cookieName": "c1" }"#
                .to_string())
        });

        let config = LauncherConfig::load(&runtime, Path::new("/launcher.json")).unwrap();
        assert_eq!(config.url_scheme, "fb://");
    }
}
