//! Navigation decision returned by the intent resolver
//!
//! Everything in here is untrusted: the navigator re-checks the selected id
//! and rebuilds the path itself.

use crate::core::error::{NavError, Result};
use serde::{Deserialize, Serialize};

/// What the resolver wants to happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    Navigate,
    AskClarify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NavigationDecision {
    pub action: DecisionAction,
    #[serde(default)]
    pub selected_id: Option<i64>,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub path_to_selection: Option<Vec<i64>>,
}

impl NavigationDecision {
    pub fn navigate(selected_id: i64, path: Vec<i64>, rationale: impl Into<String>) -> Self {
        Self {
            action: DecisionAction::Navigate,
            selected_id: Some(selected_id),
            confidence: Some(1.0),
            rationale: Some(rationale.into()),
            path_to_selection: Some(path),
        }
    }

    pub fn ask_clarify(rationale: impl Into<String>) -> Self {
        Self {
            action: DecisionAction::AskClarify,
            selected_id: None,
            confidence: None,
            rationale: Some(rationale.into()),
            path_to_selection: None,
        }
    }

    /// Selected id when the decision asks to navigate to a non-negative id
    pub fn target(&self) -> Option<usize> {
        if self.action != DecisionAction::Navigate {
            return None;
        }
        self.selected_id.and_then(|id| usize::try_from(id).ok())
    }

    pub fn rationale(&self) -> &str {
        self.rationale.as_deref().unwrap_or("")
    }

    pub fn path(&self) -> &[i64] {
        self.path_to_selection.as_deref().unwrap_or(&[])
    }

    /// Confidence clamped to [0, 1]; 0 when missing
    pub fn confidence(&self) -> f32 {
        match self.confidence {
            Some(c) if !c.is_nan() => c.clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// Parse the resolver's reply text into a decision.
///
/// With `strict` the reply must be exactly one JSON object. Otherwise the
/// outermost `{...}` is cut out of any surrounding prose first.
pub fn parse_decision(content: &str, strict: bool) -> Result<NavigationDecision> {
    let json_str = if strict {
        content.trim()
    } else {
        extract_json(content)?
    };

    serde_json::from_str(json_str).map_err(|e| {
        NavError::Decision(format!("Failed to parse decision: {} - Response: {}", e, content))
    })
}

/// Extract JSON object from LLM response (handles surrounding text)
fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| NavError::Decision("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| NavError::Decision("No closing brace found in response".into()))?;
    if end < start {
        return Err(NavError::Decision("Malformed JSON in response".into()));
    }
    Ok(&response[start..=end])
}
