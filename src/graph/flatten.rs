//! Flattened, index-addressed view of the element forest
//!
//! Ids are positions in one snapshot and mean nothing outside it. Parent
//! ids point into the same snapshot but may be larger than the child id:
//! the sequence follows registration order, not topological order.

use crate::core::types::ElementKind;
use crate::graph::element::NavigableElement;
use serde::{Deserialize, Serialize};

/// Wire form of one node, as sent to the intent resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlatNode {
    pub id: usize,
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: ElementKind,
    /// Id of the parent in the same snapshot, null for roots
    pub parent: Option<usize>,
}

/// Diagnostic dump format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeListWrapper {
    #[serde(rename = "Nodes")]
    pub nodes: Vec<FlatNode>,
}

/// Flattened nodes together with the elements that produced them
#[derive(Debug, Clone, Default)]
pub struct FlatSnapshot {
    nodes: Vec<FlatNode>,
    elements: Vec<NavigableElement>,
}

impl FlatSnapshot {
    pub(crate) fn new(nodes: Vec<FlatNode>, elements: Vec<NavigableElement>) -> Self {
        debug_assert_eq!(nodes.len(), elements.len());
        Self { nodes, elements }
    }

    pub fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by snapshot id, bounds-checked
    pub fn node(&self, id: i64) -> Option<&FlatNode> {
        usize::try_from(id).ok().and_then(|i| self.nodes.get(i))
    }

    /// Element handle by snapshot id, bounds-checked
    pub fn element(&self, id: usize) -> Option<&NavigableElement> {
        self.elements.get(id)
    }

    pub fn wrapper(&self) -> NodeListWrapper {
        NodeListWrapper {
            nodes: self.nodes.clone(),
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.wrapper())
    }
}
