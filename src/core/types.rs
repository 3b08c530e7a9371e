//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a UI control in the containment hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlId(pub Uuid);

impl ControlId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ControlId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability tag of a navigable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Generic grouping container, never a navigation target
    Context,
    /// Terminal activatable target
    Button,
    /// Top-level activatable container, never a navigation target
    Menu,
}

impl ElementKind {
    /// Infer the kind from what the control can do.
    ///
    /// A menu wins over a clickable control; anything else is a context.
    pub fn from_capabilities(clickable: bool, menu: bool) -> Self {
        if menu {
            ElementKind::Menu
        } else if clickable {
            ElementKind::Button
        } else {
            ElementKind::Context
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, ElementKind::Button)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Context => "context",
            ElementKind::Button => "button",
            ElementKind::Menu => "menu",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationState {
    /// Nothing in flight
    #[default]
    Idle,
    /// Resolver call in flight
    Requesting,
    /// Path replay in flight
    Processing,
}
