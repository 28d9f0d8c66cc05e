//! Host environment: device identifier, clock and directories.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn user_agent_impl(&self) -> String {
        self.user_agent.clone()
    }

    pub(crate) fn now_impl(&self) -> DateTime<Utc> {
        Utc::now()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn config_dir_impl(&self) -> Option<PathBuf> {
        dirs::config_dir()
    }
}
