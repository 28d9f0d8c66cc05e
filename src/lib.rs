pub mod commands;
pub mod config;
pub mod launcher;
pub mod page;
pub mod platform;
pub mod preference;
pub mod runtime;

pub use config::{LauncherConfig, Timing};
pub use launcher::{FlowOutcome, FlowState, LaunchOutcome, Launcher};
pub use page::PageLoad;
pub use preference::{CookieJar, FileStore, Preference, PreferenceStore};
