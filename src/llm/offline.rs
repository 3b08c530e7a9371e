//! Word-overlap resolver for running without a language model

use crate::core::error::Result;
use crate::graph::flatten::FlatNode;
use crate::graph::path::build_path_from_parents;
use crate::llm::decision::NavigationDecision;
use crate::llm::resolver::IntentResolver;
use async_trait::async_trait;

/// Picks the button whose label shares the most words with the utterance
#[derive(Debug, Default)]
pub struct KeywordResolver;

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1)
        .map(|w| {
            let w = w.to_lowercase();
            match w.strip_suffix('s') {
                Some(stem) if stem.len() > 2 => stem.to_string(),
                _ => w,
            }
        })
        .collect()
}

fn score(utterance: &[String], label: &str) -> usize {
    words(label).iter().filter(|w| utterance.contains(w)).count()
}

#[async_trait]
impl IntentResolver for KeywordResolver {
    async fn resolve(&self, utterance: &str, nodes: &[FlatNode]) -> Result<NavigationDecision> {
        let spoken = words(utterance);

        let best = nodes
            .iter()
            .filter(|n| n.kind.is_selectable())
            .map(|n| (score(&spoken, &n.name), n))
            .filter(|(s, _)| *s > 0)
            .max_by_key(|(s, n)| (*s, std::cmp::Reverse(n.id)));

        let Some((matched, node)) = best else {
            return Ok(NavigationDecision::ask_clarify(format!(
                "No control matches \"{}\".",
                utterance
            )));
        };

        let path = build_path_from_parents(nodes, node.id)
            .into_iter()
            .map(|id| id as i64)
            .collect();

        let mut decision = NavigationDecision::navigate(
            node.id as i64,
            path,
            format!("\"{}\" matched {} word(s).", node.name, matched),
        );
        decision.confidence = Some((matched as f32 / spoken.len().max(1) as f32).min(1.0));
        Ok(decision)
    }
}
