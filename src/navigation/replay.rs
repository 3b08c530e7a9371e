//! Timed activation of the buttons along a path

use crate::core::types::ElementKind;
use crate::graph::flatten::FlatSnapshot;
use crate::graph::graph::SharedGraph;
use parking_lot::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    Completed { activated: usize },
    Cancelled,
}

/// Activate every button on `path`, pausing `step_delay` after each one.
///
/// Ids refer to `snapshot`. Containers on the path are skipped, as are ids
/// outside the snapshot and elements that were unregistered since the
/// snapshot was taken. The live registration is used for the activation so
/// a refreshed element fires its current effect.
///
/// Each activation runs under `activation_lock` after a last look at
/// `token`; whoever cancels the token while holding the same lock knows no
/// activation follows.
pub async fn replay_path(
    path: &[usize],
    snapshot: &FlatSnapshot,
    graph: &SharedGraph,
    token: &CancellationToken,
    activation_lock: &Mutex<()>,
    step_delay: Duration,
) -> ReplayOutcome {
    let mut activated = 0;

    for &id in path {
        if token.is_cancelled() {
            return ReplayOutcome::Cancelled;
        }

        let Some(element) = snapshot.element(id) else {
            tracing::warn!(id, "Node not found in snapshot, skipping");
            continue;
        };
        if element.kind() != ElementKind::Button {
            continue;
        }

        // Clone out so the effect runs without holding the graph lock
        let live = graph.lock().element(element.control()).cloned();
        let Some(live) = live else {
            tracing::warn!(id, label = element.label(), "Element was unregistered, skipping");
            continue;
        };

        {
            let _activation = activation_lock.lock();
            if token.is_cancelled() {
                return ReplayOutcome::Cancelled;
            }
            tracing::debug!(id, label = live.label(), "Activating node");
            if !live.activate() {
                tracing::warn!(id, label = live.label(), "Button has no activation effect");
            }
        }
        activated += 1;

        tokio::select! {
            _ = token.cancelled() => return ReplayOutcome::Cancelled,
            _ = tokio::time::sleep(step_delay) => {}
        }
    }

    ReplayOutcome::Completed { activated }
}
