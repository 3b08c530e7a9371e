//! UI module - read-only presentation of navigator status

pub mod state;

pub use state::{LogCategory, LogEntry, NavigationUI, StatusView};
