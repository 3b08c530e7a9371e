//! UI state for the navigation overlay

use crate::core::types::NavigationState;
use crate::navigation::status::NavigatorStatus;
use std::collections::VecDeque;

/// Maximum log entries to keep
const MAX_LOG_ENTRIES: usize = 50;

/// What the overlay shows for one status snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// "REQUESTING", "PROCESSING" or empty when idle
    pub state_text: &'static str,
    pub recording_visible: bool,
    pub label: String,
    pub reason: String,
    /// Result layer is shown when there is a label or a reason
    pub result_visible: bool,
}

impl StatusView {
    pub fn from_status(status: &NavigatorStatus) -> Self {
        let state_text = match status.state {
            NavigationState::Requesting => "REQUESTING",
            NavigationState::Processing => "PROCESSING",
            NavigationState::Idle => "",
        };
        Self {
            state_text,
            recording_visible: status.is_recording,
            label: status.selected_label.clone(),
            reason: status.selected_reason.clone(),
            result_visible: status.has_result(),
        }
    }

    /// One-line rendering for a terminal
    pub fn render(&self) -> String {
        let mut parts = Vec::new();
        if self.recording_visible {
            parts.push("[REC]".to_string());
        }
        if !self.state_text.is_empty() {
            parts.push(format!("[{}]", self.state_text));
        }
        if self.result_visible {
            if self.label.is_empty() {
                parts.push(self.reason.clone());
            } else if self.reason.is_empty() {
                parts.push(format!("-> {}", self.label));
            } else {
                parts.push(format!("-> {} ({})", self.label, self.reason));
            }
        }
        if parts.is_empty() {
            "[IDLE]".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// An entry in the overlay log
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub generation: u64,
    pub message: String,
    pub category: LogCategory,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} [{:?}] {}", self.generation, self.category, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    State,
    Selection,
    Recording,
}

/// Overlay state: last rendered view plus a log of what changed
#[derive(Debug, Default)]
pub struct NavigationUI {
    log: VecDeque<LogEntry>,
    last: Option<NavigatorStatus>,
}

impl NavigationUI {
    pub fn new() -> Self {
        Self {
            log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            last: None,
        }
    }

    /// Add an entry to the log
    fn push(&mut self, generation: u64, message: String, category: LogCategory) {
        if self.log.len() >= MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry {
            generation,
            message,
            category,
        });
    }

    /// Up to `count` of the newest entries, oldest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &LogEntry> + '_ {
        self.log.iter().skip(self.log.len().saturating_sub(count))
    }

    /// Record the differences from the previous status; returns the new view
    pub fn observe(&mut self, status: &NavigatorStatus) -> StatusView {
        let previous = self.last.replace(status.clone()).unwrap_or_default();

        if previous.state != status.state {
            self.push(
                status.generation,
                format!("{:?} -> {:?}", previous.state, status.state),
                LogCategory::State,
            );
        }
        if previous.is_recording != status.is_recording {
            let message = if status.is_recording { "listening" } else { "silence" };
            self.push(status.generation, message.to_string(), LogCategory::Recording);
        }
        let selection_changed = previous.selected_label != status.selected_label
            || previous.selected_reason != status.selected_reason;
        if selection_changed && status.has_result() {
            self.push(
                status.generation,
                format!("{} {}", status.selected_label, status.selected_reason)
                    .trim()
                    .to_string(),
                LogCategory::Selection,
            );
        }

        StatusView::from_status(status)
    }
}
