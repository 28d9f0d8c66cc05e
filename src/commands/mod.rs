use anyhow::Result;
use log::{debug, info};

use crate::launcher::{FlowOutcome, LaunchOutcome};
use crate::page::PageLoad;
use crate::preference::Preference;
use crate::runtime::Runtime;

pub mod config;
mod services;

pub use config::{Config, ConfigOverrides};
pub use services::{CliLauncher, build_launcher};

/// Full startup flow: detect, read the stored choice, load the page, act.
#[tracing::instrument(skip(runtime, overrides))]
pub async fn run<R: Runtime + Clone + 'static>(
    runtime: R,
    overrides: ConfigOverrides,
) -> Result<Option<FlowOutcome>> {
    let config = Config::load(&runtime, overrides)?;
    let launcher = build_launcher(runtime, config);
    let page = PageLoad::new();

    let Some(state) = launcher.init(&page) else {
        info!("Not an iOS device, nothing to do");
        return Ok(None);
    };
    debug!("Startup state: {:?}", state);

    page.fire();
    let outcome = launcher.wait_startup().await?;
    debug!("Startup finished: {:?}", outcome);
    Ok(outcome)
}

/// Open the app without consulting the stored choice.
#[tracing::instrument(skip(runtime, overrides))]
pub async fn launch<R: Runtime + Clone + 'static>(
    runtime: R,
    overrides: ConfigOverrides,
) -> Result<Option<LaunchOutcome>> {
    let config = Config::load(&runtime, overrides)?;
    let launcher = build_launcher(runtime, config);
    if !launcher.is_active() {
        info!("Not an iOS device, nothing to do");
    }
    launcher.launch_app().await
}

/// Ask again, whatever was chosen before.
#[tracing::instrument(skip(runtime, overrides))]
pub async fn prompt<R: Runtime + Clone + 'static>(
    runtime: R,
    overrides: ConfigOverrides,
) -> Result<Option<FlowOutcome>> {
    let config = Config::load(&runtime, overrides)?;
    let launcher = build_launcher(runtime, config);
    if !launcher.is_active() {
        info!("Not an iOS device, nothing to do");
    }
    launcher.prompt().await
}

/// The stored choice, `None` on an unsupported device.
#[tracing::instrument(skip(runtime, overrides))]
pub fn status<R: Runtime + Clone + 'static>(
    runtime: R,
    overrides: ConfigOverrides,
) -> Result<Option<Preference>> {
    let config = Config::load(&runtime, overrides)?;
    let launcher = build_launcher(runtime, config);
    if !launcher.is_active() {
        info!("Not an iOS device, nothing to do");
        return Ok(None);
    }
    Ok(Some(launcher.stored_preference()))
}
