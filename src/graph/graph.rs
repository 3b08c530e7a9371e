//! Registry of navigable elements with parent inference from containment

use crate::core::config::ParentResolution;
use crate::core::types::ControlId;
use crate::graph::element::NavigableElement;
use crate::graph::flatten::{FlatNode, FlatSnapshot};
use crate::scene::Containment;
use ahash::AHashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Graph shared between the UI layer (registration) and the navigator (flatten)
pub type SharedGraph = Arc<Mutex<ElementGraph>>;

/// Cached parent link, only used with `ParentResolution::Registration`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentLink {
    /// No registered ancestor was found
    Root,
    /// Parent is the element registered for this control
    Linked(ControlId),
    /// The parent was unregistered after the link was made.
    ///
    /// Kept distinct from `Root` so a flatten can report the broken edge.
    Detached(ControlId),
}

#[derive(Debug)]
struct GraphNode {
    element: NavigableElement,
    parent: ParentLink,
}

/// The live set of navigable elements, in registration order
pub struct ElementGraph {
    nodes: Vec<GraphNode>,
    containment: Arc<dyn Containment>,
    resolution: ParentResolution,
}

impl ElementGraph {
    pub fn new(containment: Arc<dyn Containment>) -> Self {
        Self::with_resolution(containment, ParentResolution::default())
    }

    pub fn with_resolution(containment: Arc<dyn Containment>, resolution: ParentResolution) -> Self {
        Self {
            nodes: Vec::new(),
            containment,
            resolution,
        }
    }

    pub fn shared(self) -> SharedGraph {
        Arc::new(Mutex::new(self))
    }

    pub fn resolution(&self) -> ParentResolution {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_registered(&self, control: ControlId) -> bool {
        self.position(control).is_some()
    }

    pub fn element(&self, control: ControlId) -> Option<&NavigableElement> {
        self.position(control).map(|i| &self.nodes[i].element)
    }

    pub fn elements(&self) -> impl Iterator<Item = &NavigableElement> + '_ {
        self.nodes.iter().map(|n| &n.element)
    }

    /// Cached link for `control`; always `Root` under live resolution
    pub fn parent_link(&self, control: ControlId) -> Option<ParentLink> {
        self.position(control).map(|i| self.nodes[i].parent)
    }

    fn position(&self, control: ControlId) -> Option<usize> {
        self.nodes.iter().position(|n| n.element.control() == control)
    }

    /// Register an element, or refresh it if its control is already known.
    ///
    /// Under registration-time resolution the parent link is recomputed on
    /// every call, including pure updates.
    pub fn register(&mut self, element: NavigableElement) {
        let index = match self.position(element.control()) {
            Some(i) => {
                tracing::debug!(label = element.label(), "Refreshing registered element");
                self.nodes[i].element = element;
                i
            }
            None => {
                tracing::debug!(
                    label = element.label(),
                    kind = %element.kind(),
                    "Registering navigable element"
                );
                self.nodes.push(GraphNode {
                    element,
                    parent: ParentLink::Root,
                });
                self.nodes.len() - 1
            }
        };

        if self.resolution == ParentResolution::Registration && self.nodes.len() > 1 {
            let parent = self.resolve_parent(&self.nodes[index].element);
            self.nodes[index].parent = match parent {
                Some(control) => ParentLink::Linked(control),
                None => ParentLink::Root,
            };
        }
    }

    pub fn register_all(&mut self, elements: impl IntoIterator<Item = NavigableElement>) {
        for element in elements {
            self.register(element);
        }
    }

    /// Remove the element for `control`. Unknown controls are logged and ignored.
    pub fn unregister(&mut self, control: ControlId) -> bool {
        let Some(index) = self.position(control) else {
            tracing::info!(%control, "Trying to unregister element not found");
            return false;
        };

        let removed = self.nodes.remove(index);
        tracing::debug!(label = removed.element.label(), "Unregistered navigable element");

        for node in &mut self.nodes {
            if node.parent == ParentLink::Linked(control) {
                node.parent = ParentLink::Detached(control);
            }
        }
        true
    }

    /// Nearest registered ancestor of `element` in the containment hierarchy.
    ///
    /// A designated context anchor that is itself registered is the parent.
    /// Otherwise the walk starts at the anchor's container. The walk never
    /// returns the element itself and is bounded by the hierarchy size.
    fn resolve_parent(&self, element: &NavigableElement) -> Option<ControlId> {
        let own = element.control();
        let anchor = element.context_anchor();

        let mut current = if anchor != own {
            if self.is_registered(anchor) {
                return Some(anchor);
            }
            self.containment.container(anchor)
        } else {
            self.containment.container(own)
        };

        let mut steps = 0;
        let bound = self.containment.len() + 1;
        while let Some(control) = current {
            if control == own || steps > bound {
                return None;
            }
            if self.is_registered(control) {
                return Some(control);
            }
            current = self.containment.container(control);
            steps += 1;
        }
        None
    }

    /// Snapshot the forest with ids assigned by position.
    ///
    /// Parent ids refer to this same snapshot; a parent that is not part of
    /// it makes the node a root.
    pub fn flatten(&self) -> FlatSnapshot {
        let index_of: AHashMap<ControlId, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.element.control(), i))
            .collect();

        let mut nodes = Vec::with_capacity(self.nodes.len());
        let mut elements = Vec::with_capacity(self.nodes.len());

        for (id, node) in self.nodes.iter().enumerate() {
            let parent_control = match self.resolution {
                ParentResolution::Live => self.resolve_parent(&node.element),
                ParentResolution::Registration => match node.parent {
                    ParentLink::Root => None,
                    ParentLink::Linked(control) => Some(control),
                    ParentLink::Detached(control) => {
                        tracing::warn!(
                            label = node.element.label(),
                            %control,
                            "Parent was unregistered, flattening as root"
                        );
                        None
                    }
                },
            };

            let parent = parent_control
                .and_then(|c| index_of.get(&c).copied())
                .filter(|p| *p != id);

            nodes.push(FlatNode {
                id,
                name: node.element.label().to_string(),
                kind: node.element.kind(),
                parent,
            });
            elements.push(node.element.clone());
        }

        tracing::debug!(count = nodes.len(), "Flattened element graph");
        FlatSnapshot::new(nodes, elements)
    }
}
