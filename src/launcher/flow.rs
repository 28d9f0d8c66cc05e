use crate::preference::Preference;

use super::LaunchOutcome;

/// Startup state chosen from the stored preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// The user declined before; stay on the page.
    Silent,
    /// The user accepted before; announce and launch without asking.
    AutoLaunch,
    /// No decision yet; ask once the page has loaded.
    AwaitingResponse,
}

impl FlowState {
    pub fn decide(preference: Preference) -> Self {
        match preference {
            Preference::Denied => FlowState::Silent,
            Preference::Confirmed => FlowState::AutoLaunch,
            Preference::Unset => FlowState::AwaitingResponse,
        }
    }
}

/// What a completed flow did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Silent,
    AutoLaunched(LaunchOutcome),
    Confirmed(LaunchOutcome),
    Denied,
}

impl FlowOutcome {
    pub fn launch(&self) -> Option<LaunchOutcome> {
        match self {
            FlowOutcome::AutoLaunched(outcome) | FlowOutcome::Confirmed(outcome) => Some(*outcome),
            FlowOutcome::Silent | FlowOutcome::Denied => None,
        }
    }
}
