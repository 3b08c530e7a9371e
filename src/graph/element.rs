//! Navigable element handle

use crate::core::types::{ControlId, ElementKind};
use std::fmt;
use std::sync::Arc;

/// Side effect of pressing a button (equivalent to a UI click)
pub type Activation = Arc<dyn Fn() + Send + Sync>;

/// One addressable UI node eligible for voice targeting
#[derive(Clone)]
pub struct NavigableElement {
    control: ControlId,
    name: String,
    kind: ElementKind,
    label_text: Option<String>,
    context_anchor: Option<ControlId>,
    activation: Option<Activation>,
}

impl NavigableElement {
    pub fn new(control: ControlId, name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            control,
            name: name.into(),
            kind,
            label_text: None,
            context_anchor: None,
            activation: None,
        }
    }

    /// Text from the control's associated label
    pub fn with_label_text(mut self, text: impl Into<String>) -> Self {
        self.label_text = Some(text.into());
        self
    }

    /// Treat `anchor` as this element's stand-in for containment purposes
    pub fn with_context_anchor(mut self, anchor: ControlId) -> Self {
        self.context_anchor = Some(anchor);
        self
    }

    pub fn with_activation(mut self, activation: impl Fn() + Send + Sync + 'static) -> Self {
        self.activation = Some(Arc::new(activation));
        self
    }

    pub fn control(&self) -> ControlId {
        self.control
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Label text when it is non-empty, otherwise the control name
    pub fn label(&self) -> &str {
        match self.label_text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => &self.name,
        }
    }

    /// The anchor if one was designated, otherwise the element itself
    pub fn context_anchor(&self) -> ControlId {
        self.context_anchor.unwrap_or(self.control)
    }

    pub fn has_activation(&self) -> bool {
        self.activation.is_some()
    }

    /// Run the activation effect; false when the element has none
    pub fn activate(&self) -> bool {
        match &self.activation {
            Some(effect) => {
                effect();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for NavigableElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigableElement")
            .field("control", &self.control)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("label", &self.label())
            .field("context_anchor", &self.context_anchor)
            .field("activation", &self.activation.is_some())
            .finish()
    }
}
