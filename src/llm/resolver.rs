//! Intent resolution - (utterance, flattened nodes) -> navigation decision
//!
//! One request/response exchange per call, no retries. Any transport or
//! parse problem comes back as `Err`, never as a panic.

use crate::core::error::{NavError, Result};
use crate::graph::flatten::FlatNode;
use crate::llm::client::LlmClient;
use crate::llm::decision::{parse_decision, NavigationDecision};
use crate::llm::prompt::{build_user_message, NAVIGATION_SYSTEM_PROMPT, PROMPT_VERSION};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

#[async_trait]
pub trait IntentResolver: Send + Sync {
    async fn resolve(&self, utterance: &str, nodes: &[FlatNode]) -> Result<NavigationDecision>;
}

/// Resolver backed by a chat completion service
pub struct LlmIntentResolver {
    client: LlmClient,
    strict_json: bool,
}

impl LlmIntentResolver {
    pub fn new(client: LlmClient, strict_json: bool) -> Self {
        Self {
            client,
            strict_json,
        }
    }
}

#[async_trait]
impl IntentResolver for LlmIntentResolver {
    async fn resolve(&self, utterance: &str, nodes: &[FlatNode]) -> Result<NavigationDecision> {
        let user = build_user_message(utterance, nodes)?;

        tracing::debug!(
            prompt_version = PROMPT_VERSION,
            model = self.client.model(),
            nodes = nodes.len(),
            "Sending intent resolution request"
        );

        let response = self.client.complete(NAVIGATION_SYSTEM_PROMPT, &user).await?;
        let decision = parse_decision(&response, self.strict_json)?;

        tracing::info!(
            action = ?decision.action,
            selected_id = ?decision.selected_id,
            confidence = decision.confidence(),
            rationale = decision.rationale(),
            path = ?decision.path(),
            "Intent resolved"
        );

        Ok(decision)
    }
}

/// A canned resolver reply
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    /// Simulated round-trip time
    pub delay: Duration,
    pub outcome: std::result::Result<NavigationDecision, String>,
}

/// What a scripted resolver was asked
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub utterance: String,
    pub nodes: Vec<FlatNode>,
}

/// Resolver that replays queued replies in order.
///
/// Used by the tests and by anyone driving the navigator without a service.
#[derive(Debug, Default)]
pub struct ScriptedResolver {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<ResolveRequest>>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_decision(&self, decision: NavigationDecision) {
        self.push_delayed(Duration::ZERO, decision);
    }

    pub fn push_delayed(&self, delay: Duration, decision: NavigationDecision) {
        self.replies.lock().push_back(ScriptedReply {
            delay,
            outcome: Ok(decision),
        });
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.replies.lock().push_back(ScriptedReply {
            delay: Duration::ZERO,
            outcome: Err(message.into()),
        });
    }

    pub fn requests(&self) -> Vec<ResolveRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl IntentResolver for ScriptedResolver {
    async fn resolve(&self, utterance: &str, nodes: &[FlatNode]) -> Result<NavigationDecision> {
        self.requests.lock().push(ResolveRequest {
            utterance: utterance.to_string(),
            nodes: nodes.to_vec(),
        });

        let reply = self.replies.lock().pop_front();
        let Some(reply) = reply else {
            return Err(NavError::Llm("No scripted reply queued".into()));
        };

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }

        reply.outcome.map_err(NavError::Llm)
    }
}
