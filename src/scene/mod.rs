//! Containment hierarchy of UI controls
//!
//! The element graph never owns UI controls; it only asks "which control
//! contains this one". `SceneTree` is the in-process hierarchy used by the
//! demo scene and the tests.

pub mod tree;

pub use tree::{Control, SceneTree, SharedScene};

use crate::core::types::ControlId;

/// Read-only view of the containment hierarchy
pub trait Containment: Send + Sync {
    /// The control directly containing `control`, if any
    fn container(&self, control: ControlId) -> Option<ControlId>;

    /// Whether `control` still exists
    fn contains(&self, control: ControlId) -> bool;

    /// Number of live controls, used to bound upward walks
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
