//! Root-to-target path reconstruction over a flattened snapshot

use crate::graph::flatten::FlatNode;

/// Walk parent ids from `selected` up to a root and return root -> selected.
///
/// Ids are positions in `nodes`. The walk stops at a root, at an id outside
/// the snapshot, or at an id it has already visited, so it finishes within
/// `nodes.len()` steps even if the parent ids form a cycle.
pub fn build_path_from_parents(nodes: &[FlatNode], selected: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut visited = vec![false; nodes.len()];
    let mut current = Some(selected);

    while let Some(id) = current {
        if id >= nodes.len() || visited[id] || path.len() >= nodes.len() {
            break;
        }
        visited[id] = true;
        path.push(id);
        current = nodes[id].parent;
    }

    path.reverse();
    path
}

/// Every adjacent pair (a, b) satisfies `nodes[b].parent == a`
pub fn is_valid_path(nodes: &[FlatNode], path: &[usize]) -> bool {
    if path.iter().any(|id| *id >= nodes.len()) {
        return false;
    }
    path.windows(2).all(|pair| nodes[pair[1]].parent == Some(pair[0]))
}
