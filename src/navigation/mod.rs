//! Command pipeline: utterance -> flatten -> resolve -> validate -> replay

pub mod diagnostics;
pub mod navigator;
pub mod replay;
pub mod status;

pub use diagnostics::DiagnosticsWriter;
pub use navigator::Navigator;
pub use replay::{replay_path, ReplayOutcome};
pub use status::NavigatorStatus;
