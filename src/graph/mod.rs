//! Element graph - the live population of navigable elements
//!
//! Elements only record who they are; parent/child structure comes from
//! the containment hierarchy. `flatten` turns the current forest into an
//! index-addressed snapshot that the intent resolver and path replay share.

pub mod element;
pub mod flatten;
pub mod graph;
pub mod path;

pub use element::{Activation, NavigableElement};
pub use flatten::{FlatNode, FlatSnapshot, NodeListWrapper};
pub use graph::{ElementGraph, ParentLink, SharedGraph};
pub use path::{build_path_from_parents, is_valid_path};
