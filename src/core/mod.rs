pub mod config;
pub mod error;
pub mod types;

pub use config::{LlmConfig, NavigationConfig, NavigatorConfig, ParentResolution};
pub use error::{NavError, Result};
pub use types::{ControlId, ElementKind, NavigationState};
