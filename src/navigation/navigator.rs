//! Navigation orchestrator
//!
//! Idle -> Requesting -> Processing -> Idle. Every `submit` cancels whatever
//! is in flight and starts a new generation; a result carrying an older
//! generation is dropped without touching status or firing activations.
//!
//! `submit` and `recording_pulse` spawn onto the ambient tokio runtime and
//! must be called from inside one. Activation effects run while the
//! navigator holds its activation lock and must not call back into it.

use crate::core::config::NavigationConfig;
use crate::core::types::{ElementKind, NavigationState};
use crate::graph::flatten::FlatSnapshot;
use crate::graph::graph::SharedGraph;
use crate::graph::path::{build_path_from_parents, is_valid_path};
use crate::llm::decision::NavigationDecision;
use crate::llm::resolver::IntentResolver;
use crate::navigation::diagnostics::DiagnosticsWriter;
use crate::navigation::replay::{replay_path, ReplayOutcome};
use crate::navigation::status::NavigatorStatus;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// In-flight resolver call or replay
struct ActiveCommand {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

struct Inner {
    graph: SharedGraph,
    resolver: Arc<dyn IntentResolver>,
    config: NavigationConfig,
    diagnostics: Option<DiagnosticsWriter>,
    status: watch::Sender<NavigatorStatus>,
    active: Mutex<Option<ActiveCommand>>,
    /// Held around each activation and around every cancel
    activation: Mutex<()>,
    pulse: Mutex<Option<JoinHandle<()>>>,
}

/// Context object owning the command pipeline.
///
/// Cloning is cheap; clones share the same pipeline.
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<Inner>,
}

impl Navigator {
    pub fn new(graph: SharedGraph, resolver: Arc<dyn IntentResolver>, config: NavigationConfig) -> Self {
        let diagnostics = config.diagnostics_path().map(DiagnosticsWriter::new);
        let (status, _) = watch::channel(NavigatorStatus::default());

        Self {
            inner: Arc::new(Inner {
                graph,
                resolver,
                config,
                diagnostics,
                status,
                active: Mutex::new(None),
                activation: Mutex::new(()),
                pulse: Mutex::new(None),
            }),
        }
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.inner.graph
    }

    pub fn status(&self) -> NavigatorStatus {
        self.inner.status.borrow().clone()
    }

    pub fn state(&self) -> NavigationState {
        self.inner.status.borrow().state
    }

    /// Receiver that sees every status change
    pub fn subscribe(&self) -> watch::Receiver<NavigatorStatus> {
        self.inner.status.subscribe()
    }

    /// Start resolving `utterance`, superseding anything in flight.
    ///
    /// Returns the generation of the new command.
    pub fn submit(&self, utterance: impl Into<String>) -> u64 {
        let utterance = utterance.into();
        tracing::info!(utterance = %utterance, "New query received");

        // Held for the whole call so concurrent submits serialize
        let mut active = self.inner.active.lock();
        if let Some(previous) = active.take() {
            self.inner.stop(previous);
            tracing::debug!("Cancelled in-flight command");
        }

        let snapshot = self.inner.graph.lock().flatten();

        let mut generation = 0;
        self.inner.status.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            s.state = NavigationState::Requesting;
            s.is_recording = false;
        });

        let token = CancellationToken::new();
        let handle = tokio::spawn(run_command(
            self.inner.clone(),
            generation,
            token.clone(),
            utterance,
            snapshot,
        ));
        *active = Some(ActiveCommand { token, handle });

        generation
    }

    /// Cancel whatever is in flight and return to idle
    pub fn cancel(&self) {
        let mut active = self.inner.active.lock();
        if let Some(previous) = active.take() {
            self.inner.stop(previous);
        }
        self.inner.status.send_modify(|s| {
            s.generation += 1;
            s.state = NavigationState::Idle;
        });
    }

    /// Speech activity: light the recording indicator and restart its decay timer
    pub fn recording_pulse(&self) {
        let mut pulse = self.inner.pulse.lock();
        if let Some(previous) = pulse.take() {
            previous.abort();
        }

        let mut pulse_generation = 0;
        self.inner.status.send_modify(|s| {
            s.pulse_generation += 1;
            pulse_generation = s.pulse_generation;
            s.is_recording = true;
            s.clear_selection();
        });

        let inner = self.inner.clone();
        *pulse = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.config.pulse_decay()).await;
            inner.status.send_if_modified(|s| {
                if s.pulse_generation != pulse_generation || !s.is_recording {
                    return false;
                }
                s.is_recording = false;
                true
            });
        }));
    }

    /// Wait until the navigator is idle
    pub async fn wait_idle(&self) {
        let mut rx = self.subscribe();
        // Only fails if the sender is gone, and `self` keeps it alive
        let _ = rx.wait_for(|s| s.state == NavigationState::Idle).await;
    }

    /// Cancel everything, including the pulse timer
    pub fn shutdown(&self) {
        self.cancel();
        if let Some(pulse) = self.inner.pulse.lock().take() {
            pulse.abort();
        }
        self.inner.status.send_modify(|s| s.is_recording = false);
    }
}

impl Inner {
    /// Stop `command`. Once this returns it activates nothing more.
    fn stop(&self, command: ActiveCommand) {
        let _activation = self.activation.lock();
        command.token.cancel();
        command.handle.abort();
    }

    /// Apply `f` only if `generation` is still the current one
    fn update(&self, generation: u64, f: impl FnOnce(&mut NavigatorStatus)) -> bool {
        self.status.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            f(s);
            true
        })
    }

    fn is_current(&self, generation: u64) -> bool {
        self.status.borrow().generation == generation
    }

    /// Validate the decision and produce the path to replay.
    ///
    /// Anything that is not a navigate to an existing button in the
    /// snapshot ends the command without activation.
    fn plan(&self, generation: u64, decision: &NavigationDecision, snapshot: &FlatSnapshot) -> Option<Vec<usize>> {
        let rationale = decision.rationale().to_string();

        let no_target = |reason: &str| {
            tracing::info!(reason, rationale = %rationale, "No actionable target");
            self.update(generation, |s| {
                s.state = NavigationState::Idle;
                s.selected_label.clear();
                s.selected_reason = rationale.clone();
            });
            None
        };

        let Some(target) = decision.target() else {
            return no_target("resolver selected nothing");
        };

        let Some(node) = snapshot.nodes().get(target) else {
            tracing::warn!(target, nodes = snapshot.len(), "Selected id outside the snapshot");
            return no_target("selected id out of range");
        };

        if node.kind != ElementKind::Button {
            tracing::warn!(target, kind = %node.kind, "Refusing non-button selection");
            return no_target("selected node is not a button");
        }

        let path = build_path_from_parents(snapshot.nodes(), target);
        let claimed: Vec<usize> = decision
            .path()
            .iter()
            .filter_map(|id| usize::try_from(*id).ok())
            .collect();
        if claimed != path {
            tracing::debug!(
                claimed = ?decision.path(),
                rebuilt = ?path,
                claimed_valid = is_valid_path(snapshot.nodes(), &claimed),
                "Resolver path differs from parent walk"
            );
        }

        let label = node.name.clone();
        let accepted = self.update(generation, |s| {
            s.state = NavigationState::Processing;
            s.selected_label = label;
            s.selected_reason = rationale.clone();
        });
        accepted.then_some(path)
    }
}

async fn run_command(
    inner: Arc<Inner>,
    generation: u64,
    token: CancellationToken,
    utterance: String,
    snapshot: FlatSnapshot,
) {
    if let Some(diagnostics) = &inner.diagnostics {
        diagnostics.write_best_effort(&snapshot);
    }

    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::debug!(generation, "Request superseded");
            return;
        }
        outcome = inner.resolver.resolve(&utterance, snapshot.nodes()) => outcome,
    };

    if token.is_cancelled() || !inner.is_current(generation) {
        tracing::debug!(generation, "Discarding stale resolver result");
        return;
    }

    let decision = match outcome {
        Ok(decision) => decision,
        Err(e) => {
            tracing::error!(error = %e, "Navigation request failed");
            inner.update(generation, |s| s.state = NavigationState::Idle);
            return;
        }
    };

    tracing::info!(
        action = ?decision.action,
        selected_id = ?decision.selected_id,
        "Navigation request completed"
    );

    let Some(path) = inner.plan(generation, &decision, &snapshot) else {
        return;
    };

    let outcome = replay_path(
        &path,
        &snapshot,
        &inner.graph,
        &token,
        &inner.activation,
        inner.config.step_delay(),
    )
    .await;

    match outcome {
        ReplayOutcome::Completed { activated } => {
            tracing::info!(activated, "Finished processing all nodes in path");
            inner.update(generation, |s| s.state = NavigationState::Idle);
        }
        ReplayOutcome::Cancelled => {
            tracing::debug!(generation, "Replay superseded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ControlId;
    use crate::graph::element::NavigableElement;
    use crate::graph::graph::ElementGraph;
    use crate::llm::resolver::ScriptedResolver;
    use crate::scene::SceneTree;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn config() -> NavigationConfig {
        NavigationConfig {
            diagnostics_path: Default::default(),
            ..NavigationConfig::default()
        }
    }

    fn single_button() -> (SharedGraph, Arc<AtomicUsize>) {
        let mut tree = SceneTree::new();
        let control: ControlId = tree.add_root("Play");
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = clicks.clone();

        let mut graph = ElementGraph::new(tree.shared());
        graph.register(
            NavigableElement::new(control, "Play", ElementKind::Button).with_activation(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (graph.shared(), clicks)
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_enters_requesting() {
        let (graph, _) = single_button();
        let resolver = Arc::new(ScriptedResolver::new());
        resolver.push_delayed(
            Duration::from_secs(1),
            NavigationDecision::navigate(0, vec![0], "Play it"),
        );
        let navigator = Navigator::new(graph, resolver, config());

        let generation = navigator.submit("play");
        assert_eq!(generation, 1);
        assert_eq!(navigator.state(), NavigationState::Requesting);

        navigator.wait_idle().await;
        assert_eq!(navigator.status().selected_label, "Play");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_result() {
        let (graph, clicks) = single_button();
        let resolver = Arc::new(ScriptedResolver::new());
        resolver.push_delayed(
            Duration::from_secs(1),
            NavigationDecision::navigate(0, vec![0], "Play it"),
        );
        let navigator = Navigator::new(graph, resolver, config());

        navigator.submit("play");
        navigator.cancel();
        assert!(navigator.status().is_idle());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(clicks.load(Ordering::SeqCst), 0);
        assert_eq!(navigator.status().selected_label, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_releases_command_task() {
        let (graph, _) = single_button();
        let resolver = Arc::new(ScriptedResolver::new());
        resolver.push_delayed(
            Duration::from_secs(60),
            NavigationDecision::navigate(0, vec![0], "Play it"),
        );
        let navigator = Navigator::new(graph, resolver, config());

        navigator.submit("play");
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(Arc::strong_count(&navigator.inner), 2);

        navigator.cancel();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(Arc::strong_count(&navigator.inner), 1);
        assert!(navigator.inner.active.lock().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_map_written_by_command_task() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Logs").join("ActiveMap.json");
        let (graph, _) = single_button();
        let resolver = Arc::new(ScriptedResolver::new());
        resolver.push_decision(NavigationDecision::ask_clarify("Which?"));
        let config = NavigationConfig {
            diagnostics_path: path.clone(),
            ..NavigationConfig::default()
        };
        let navigator = Navigator::new(graph, resolver, config);

        navigator.submit("play");
        // Nothing touches the disk inside submit itself
        assert!(!path.exists());

        navigator.wait_idle().await;
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"Play\""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pulse_decays() {
        let (graph, _) = single_button();
        let navigator = Navigator::new(graph, Arc::new(ScriptedResolver::new()), config());

        navigator.recording_pulse();
        assert!(navigator.status().is_recording);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        // A second pulse restarts the timer
        navigator.recording_pulse();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(navigator.status().is_recording);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!navigator.status().is_recording);
    }
}
