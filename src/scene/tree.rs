//! Arena of named UI controls with container links

use crate::core::types::ControlId;
use crate::scene::Containment;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Scene shared between the UI layer and the element graph
pub type SharedScene = Arc<RwLock<SceneTree>>;

/// One UI control
#[derive(Debug, Clone)]
pub struct Control {
    pub id: ControlId,
    pub name: String,
    pub container: Option<ControlId>,
    pub active: bool,
    /// Text shown by the control's label, if it has one
    pub text: Option<String>,
}

/// The containment hierarchy
#[derive(Debug, Default)]
pub struct SceneTree {
    controls: AHashMap<ControlId, Control>,
    order: Vec<ControlId>,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedScene {
        Arc::new(RwLock::new(self))
    }

    /// Add a control under `container`.
    ///
    /// An unknown container is kept as-is; walks treat it as the top.
    pub fn add_control(&mut self, name: impl Into<String>, container: Option<ControlId>) -> ControlId {
        let id = ControlId::new();
        self.controls.insert(
            id,
            Control {
                id,
                name: name.into(),
                container,
                active: true,
                text: None,
            },
        );
        self.order.push(id);
        id
    }

    pub fn add_root(&mut self, name: impl Into<String>) -> ControlId {
        self.add_control(name, None)
    }

    pub fn add_child(&mut self, container: ControlId, name: impl Into<String>) -> ControlId {
        self.add_control(name, Some(container))
    }

    pub fn get(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(&id)
    }

    pub fn name(&self, id: ControlId) -> Option<&str> {
        self.controls.get(&id).map(|c| c.name.as_str())
    }

    pub fn text(&self, id: ControlId) -> Option<&str> {
        self.controls.get(&id).and_then(|c| c.text.as_deref())
    }

    pub fn set_text(&mut self, id: ControlId, text: impl Into<String>) {
        if let Some(control) = self.controls.get_mut(&id) {
            control.text = Some(text.into());
        }
    }

    pub fn set_active(&mut self, id: ControlId, active: bool) {
        if let Some(control) = self.controls.get_mut(&id) {
            control.active = active;
        }
    }

    pub fn is_active(&self, id: ControlId) -> bool {
        self.controls.get(&id).map(|c| c.active).unwrap_or(false)
    }

    /// Active itself and every container up to the top
    pub fn is_active_in_hierarchy(&self, id: ControlId) -> bool {
        self.is_active(id) && self.ancestors(id).iter().all(|a| self.is_active(*a))
    }

    /// Containers from the direct one up to the top, bounded by the arena size
    pub fn ancestors(&self, id: ControlId) -> Vec<ControlId> {
        let mut out = Vec::new();
        let mut current = self.container(id);
        while let Some(c) = current {
            if out.len() >= self.controls.len() || c == id || out.contains(&c) {
                break;
            }
            out.push(c);
            current = self.container(c);
        }
        out
    }

    /// Whether `id` sits somewhere below `ancestor`
    pub fn is_descendant_of(&self, id: ControlId, ancestor: ControlId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// Direct children in insertion order
    pub fn children(&self, id: ControlId) -> Vec<ControlId> {
        self.order
            .iter()
            .copied()
            .filter(|c| self.controls.get(c).and_then(|c| c.container) == Some(id))
            .collect()
    }

    /// First control with this name, in insertion order
    pub fn find_by_name(&self, name: &str) -> Option<ControlId> {
        self.order
            .iter()
            .copied()
            .find(|c| self.controls.get(c).map(|c| c.name == name).unwrap_or(false))
    }

    /// Move `id` under `container`; refuses moves that would create a cycle
    pub fn reparent(&mut self, id: ControlId, container: Option<ControlId>) -> bool {
        if !self.controls.contains_key(&id) {
            return false;
        }
        if let Some(target) = container {
            if target == id || self.is_descendant_of(target, id) {
                return false;
            }
        }
        if let Some(control) = self.controls.get_mut(&id) {
            control.container = container;
        }
        true
    }

    /// Remove a control and its whole subtree, returning every removed id
    pub fn remove(&mut self, id: ControlId) -> Vec<ControlId> {
        if !self.controls.contains_key(&id) {
            return Vec::new();
        }
        let removed: Vec<ControlId> = self
            .order
            .iter()
            .copied()
            .filter(|c| *c == id || self.is_descendant_of(*c, id))
            .collect();
        for c in &removed {
            self.controls.remove(c);
        }
        self.order.retain(|c| !removed.contains(c));
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> + '_ {
        self.order.iter().filter_map(|c| self.controls.get(c))
    }

    /// Indented outline of the hierarchy, for debugging
    pub fn outline(&self) -> String {
        let mut s = String::new();
        for control in self.iter() {
            let depth = self.ancestors(control.id).len();
            let marker = if self.is_active_in_hierarchy(control.id) { "" } else { " (hidden)" };
            s.push_str(&format!("{}{}{}\n", "  ".repeat(depth), control.name, marker));
        }
        s
    }
}

impl Containment for SceneTree {
    fn container(&self, control: ControlId) -> Option<ControlId> {
        self.controls.get(&control).and_then(|c| c.container)
    }

    fn contains(&self, control: ControlId) -> bool {
        self.controls.contains_key(&control)
    }

    fn len(&self) -> usize {
        self.controls.len()
    }
}

impl Containment for RwLock<SceneTree> {
    fn container(&self, control: ControlId) -> Option<ControlId> {
        self.read().container(control)
    }

    fn contains(&self, control: ControlId) -> bool {
        self.read().contains(control)
    }

    fn len(&self) -> usize {
        Containment::len(&*self.read())
    }
}
