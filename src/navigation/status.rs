//! Read-only navigator status for presentation layers

use crate::core::types::NavigationState;

/// Snapshot of what the navigator is doing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigatorStatus {
    pub state: NavigationState,
    /// Lit by activity pulses, decays on its own timer
    pub is_recording: bool,
    /// Label of the last accepted target
    pub selected_label: String,
    /// Rationale (or clarification request) of the last decision
    pub selected_reason: String,
    /// Bumped by every submit and cancel; results from older generations are dropped
    pub generation: u64,
    pub(crate) pulse_generation: u64,
}

impl NavigatorStatus {
    pub fn is_idle(&self) -> bool {
        self.state == NavigationState::Idle
    }

    pub fn has_result(&self) -> bool {
        !self.selected_label.is_empty() || !self.selected_reason.is_empty()
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected_label.clear();
        self.selected_reason.clear();
    }
}
