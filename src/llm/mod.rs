//! Intent resolution through an external language model
//!
//! The client moves text, the prompt fixes the contract, the decision
//! module parses the reply. The navigator treats the result as untrusted.

pub mod client;
pub mod decision;
pub mod offline;
pub mod prompt;
pub mod resolver;

pub use client::LlmClient;
pub use decision::{parse_decision, DecisionAction, NavigationDecision};
pub use offline::KeywordResolver;
pub use resolver::{IntentResolver, LlmIntentResolver, ScriptedResolver};
