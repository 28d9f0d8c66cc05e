//! Redirect heuristic.
//!
//! Browsers cannot report whether a custom URL scheme opened an app. When the
//! hand-off succeeds the page is suspended or torn down, so a check scheduled
//! shortly after the link activation either never runs or runs late. A check
//! that fires on time means nothing took over and the user is sent to the
//! store instead.
//!
//! Slow devices can run the check on time even after a successful hand-off,
//! producing a spurious store redirect. The timing defaults are kept for
//! compatibility with the devices they were tuned on.

use anyhow::Result;
use chrono::TimeDelta;
use log::{debug, info};
use std::time::Duration;

use crate::config::LauncherConfig;
use crate::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The fallback check fired outside the freshness window.
    HandedOff,
    /// The page was still live, the store URL was opened.
    FellBack,
}

/// Whether a check `elapsed` after the link activation still counts as
/// fresh. A clock that went backwards counts as fresh.
pub fn is_fresh(elapsed: TimeDelta, window: Duration) -> bool {
    match elapsed.to_std() {
        Ok(elapsed) => elapsed < window,
        Err(_) => true,
    }
}

#[tracing::instrument(skip(runtime, config), fields(url_scheme = %config.url_scheme))]
pub async fn attempt_launch<R: Runtime + ?Sized>(
    runtime: &R,
    config: &LauncherConfig,
) -> Result<LaunchOutcome> {
    let clicked_at = runtime.now();
    runtime.activate_link(&config.url_scheme)?;

    tokio::time::sleep(config.timing.fallback_delay).await;

    let elapsed = runtime.now() - clicked_at;
    if is_fresh(elapsed, config.timing.freshness_window) {
        info!(
            "Still on the page {}ms after opening {}, sending to {}",
            elapsed.num_milliseconds(),
            config.url_scheme,
            config.app_store_url
        );
        runtime.navigate(&config.app_store_url)?;
        Ok(LaunchOutcome::FellBack)
    } else {
        debug!(
            "Fallback check ran {}ms after opening {}, assuming the app took over",
            elapsed.num_milliseconds(),
            config.url_scheme
        );
        Ok(LaunchOutcome::HandedOff)
    }
}
