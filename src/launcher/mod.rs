//! The app launcher.
//!
//! A [`Launcher`] is built once per page visit. If the visitor is not on a
//! supported device it stays inert: nothing is read, stored, shown or opened.
//! Otherwise [`Launcher::init`] reads the stored preference and schedules the
//! matching flow for after the page load event plus the message delay.

mod flow;
mod redirect;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use crate::config::LauncherConfig;
use crate::page::PageLoad;
use crate::platform::detect_device;
use crate::preference::{
    PREFERENCE_EXPIRY_DAYS, Preference, PreferenceStore, read_preference, write_preference,
};
use crate::runtime::Runtime;

pub use flow::{FlowOutcome, FlowState};
pub use redirect::{LaunchOutcome, attempt_launch, is_fresh};

struct Inner<R, S> {
    config: LauncherConfig,
    runtime: R,
    store: S,
    prefers_app: AtomicBool,
    scheduled: AtomicBool,
    startup: Mutex<Option<JoinHandle<Result<FlowOutcome>>>>,
}

impl<R: Runtime, S: PreferenceStore> Inner<R, S> {
    async fn run(&self, state: FlowState) -> Result<FlowOutcome> {
        match state {
            FlowState::Silent => Ok(FlowOutcome::Silent),
            FlowState::AutoLaunch => {
                if let Err(e) = self.runtime.alert(&self.config.auto_launch_message) {
                    warn!("Could not show auto-launch message: {:#}", e);
                }
                let outcome = attempt_launch(&self.runtime, &self.config).await?;
                Ok(FlowOutcome::AutoLaunched(outcome))
            }
            FlowState::AwaitingResponse => self.prompt().await,
        }
    }

    /// Ask the user, remember the answer, and launch on confirmation.
    /// A failed store write is logged and does not stop the launch.
    async fn prompt(&self) -> Result<FlowOutcome> {
        if self.runtime.confirm(&self.config.prompt_message)? {
            info!("User chose to open the app");
            self.remember(Preference::Confirmed);
            self.prefers_app.store(true, Ordering::SeqCst);
            let outcome = attempt_launch(&self.runtime, &self.config).await?;
            Ok(FlowOutcome::Confirmed(outcome))
        } else {
            info!("User chose to stay on the page");
            self.remember(Preference::Denied);
            Ok(FlowOutcome::Denied)
        }
    }

    fn remember(&self, preference: Preference) {
        if let Err(e) = write_preference(
            &self.store,
            &self.config.cookie_name,
            preference,
            self.runtime.now(),
            PREFERENCE_EXPIRY_DAYS,
        ) {
            warn!("Failed to remember preference {}: {:#}", preference, e);
        }
    }
}

pub struct Launcher<R: Runtime, S: PreferenceStore> {
    /// `None` when the device is not supported.
    inner: Option<Arc<Inner<R, S>>>,
}

impl<R: Runtime + 'static, S: PreferenceStore + 'static> Launcher<R, S> {
    /// Build a launcher. The device is detected here, once.
    pub fn new(config: LauncherConfig, runtime: R, store: S) -> Self {
        let user_agent = runtime.user_agent();
        let Some(device) = detect_device(&user_agent) else {
            debug!("Unsupported device {:?}, launcher disabled", user_agent);
            return Self { inner: None };
        };

        info!("Detected {} device, app scheme {}", device, config.url_scheme);
        Self {
            inner: Some(Arc::new(Inner {
                config,
                runtime,
                store,
                prefers_app: AtomicBool::new(false),
                scheduled: AtomicBool::new(false),
                startup: Mutex::new(None),
            })),
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }

    pub fn config(&self) -> Option<&LauncherConfig> {
        self.inner.as_ref().map(|inner| &inner.config)
    }

    /// True once the user confirmed during this session.
    pub fn prefers_app(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.prefers_app.load(Ordering::SeqCst))
    }

    pub fn stored_preference(&self) -> Preference {
        match &self.inner {
            Some(inner) => read_preference(&inner.store, &inner.config.cookie_name),
            None => Preference::Unset,
        }
    }

    /// Choose the startup flow from the stored preference and schedule it on
    /// `page`'s load event. Returns `None` on an unsupported device.
    ///
    /// The scheduled flow is spawned on the current tokio runtime when the
    /// load event fires, so [`PageLoad::fire`] must be called from within one.
    /// The flow is scheduled at most once per launcher.
    pub fn init(&self, page: &PageLoad) -> Option<FlowState> {
        let inner = self.inner.as_ref()?;
        let state = FlowState::decide(read_preference(&inner.store, &inner.config.cookie_name));

        if state == FlowState::Silent {
            info!("User declined before, staying on the page");
            return Some(state);
        }
        if inner.scheduled.swap(true, Ordering::SeqCst) {
            debug!("Startup already scheduled, ignoring repeated init");
            return Some(state);
        }

        debug!("Scheduling {:?} after page load", state);
        let inner = Arc::clone(inner);
        page.on_load(move || {
            let Ok(handle) = tokio::runtime::Handle::try_current() else {
                warn!("No async runtime on page load, launcher startup skipped");
                return;
            };
            let task_inner = Arc::clone(&inner);
            let task = handle.spawn(async move {
                tokio::time::sleep(task_inner.config.timing.message_delay).await;
                let result = task_inner.run(state).await;
                if let Err(e) = &result {
                    warn!("Launcher startup failed: {:#}", e);
                }
                result
            });
            *inner.startup.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
        });
        Some(state)
    }

    /// Wait for the flow scheduled by [`Launcher::init`]. Returns `None` if
    /// nothing has been started (inactive, silent, or the page has not loaded).
    pub async fn wait_startup(&self) -> Result<Option<FlowOutcome>> {
        let Some(inner) = &self.inner else {
            return Ok(None);
        };
        let task = inner
            .startup
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match task {
            Some(task) => {
                let outcome = task.await.context("Launcher startup task failed")??;
                Ok(Some(outcome))
            }
            None => Ok(None),
        }
    }

    /// Open the app right away, ignoring the stored preference.
    pub async fn launch_app(&self) -> Result<Option<LaunchOutcome>> {
        match &self.inner {
            Some(inner) => Ok(Some(attempt_launch(&inner.runtime, &inner.config).await?)),
            None => Ok(None),
        }
    }

    /// Ask the user again, ignoring the stored preference.
    pub async fn prompt(&self) -> Result<Option<FlowOutcome>> {
        match &self.inner {
            Some(inner) => Ok(Some(inner.prompt().await?)),
            None => Ok(None),
        }
    }
}
