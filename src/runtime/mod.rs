//! Runtime abstraction for host operations.
//!
//! This module provides a trait-based abstraction over everything the
//! launcher needs from its host, enabling dependency injection and
//! testability.
//!
//! # Structure
//!
//! - `env` - Device identifier, wall clock and directories
//! - `fs` - File system operations used by the file-backed preference store
//! - `user` - User interaction (confirmation prompts and alerts)
//! - `navigation` - Link activation and navigation

mod env;
mod fs;
mod navigation;
mod user;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Host environment
    /// The device identifier string (user agent) of the visiting device.
    fn user_agent(&self) -> String;
    fn now(&self) -> DateTime<Utc>;

    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    // Directories
    fn config_dir(&self) -> Option<PathBuf>;

    // User interaction
    /// Ask a blocking yes/no question. Returns true if the user affirms.
    fn confirm(&self, message: &str) -> Result<bool>;
    fn alert(&self, message: &str) -> Result<()>;

    // Navigation
    /// Synthesize a user-initiated activation of a link pointing at `href`.
    /// Custom URL schemes are only honoured when reached this way.
    fn activate_link(&self, href: &str) -> Result<()>;
    /// Redirect the current browsing context to `url`.
    fn navigate(&self, url: &str) -> Result<()>;
}

/// Runtime backed by the terminal: stdin/stdout for interaction and the
/// system URL opener for navigation.
#[derive(Debug, Clone)]
pub struct RealRuntime {
    user_agent: String,
    open_links: bool,
}

impl RealRuntime {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            open_links: true,
        }
    }

    /// Print link activations and navigations instead of handing them to the
    /// system opener.
    pub fn print_only(mut self) -> Self {
        self.open_links = false;
        self
    }
}

impl Runtime for RealRuntime {
    fn user_agent(&self) -> String {
        self.user_agent_impl()
    }

    fn now(&self) -> DateTime<Utc> {
        self.now_impl()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir_impl()
    }

    fn confirm(&self, message: &str) -> Result<bool> {
        self.confirm_impl(message)
    }

    fn alert(&self, message: &str) -> Result<()> {
        self.alert_impl(message)
    }

    fn activate_link(&self, href: &str) -> Result<()> {
        self.activate_link_impl(href)
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.navigate_impl(url)
    }
}

impl<R: Runtime + ?Sized> Runtime for std::sync::Arc<R> {
    fn user_agent(&self) -> String {
        (**self).user_agent()
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        (**self).write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        (**self).create_dir_all(path)
    }

    fn config_dir(&self) -> Option<PathBuf> {
        (**self).config_dir()
    }

    fn confirm(&self, message: &str) -> Result<bool> {
        (**self).confirm(message)
    }

    fn alert(&self, message: &str) -> Result<()> {
        (**self).alert(message)
    }

    fn activate_link(&self, href: &str) -> Result<()> {
        (**self).activate_link(href)
    }

    fn navigate(&self, url: &str) -> Result<()> {
        (**self).navigate(url)
    }
}
