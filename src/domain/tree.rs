//! Copy-on-write tree operations over snapshots.
//!
//! Every rewrite returns a new snapshot and leaves its input untouched. Only
//! the path from the root to the target is rebuilt; untouched subtrees are
//! shared with the input. A rewrite that finds nothing to do returns the
//! input snapshot itself (same allocation).
//!
//! Lookups are depth-first, children in order, first match wins.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{NodeId, NodePatch, NodeTemplate, OrgNode, Snapshot};

/// Deepest tree accepted, counted in nodes from the root.
///
/// Every level costs two nesting steps in the persisted JSON (node object and
/// `children` array), which keeps exported charts well inside what the
/// decoder accepts on import.
pub const MAX_DEPTH: usize = 50;

/// Depth-first search for `id`.
pub fn find<'a>(root: &'a OrgNode, id: &str) -> Option<&'a OrgNode> {
    if root.id.as_str() == id {
        return Some(root);
    }
    root.children.iter().find_map(|child| find(child, id))
}

pub fn contains(root: &OrgNode, id: &str) -> bool {
    find(root, id).is_some()
}

/// Ids from the root down to `id`, both ends included.
pub fn path_to(root: &OrgNode, id: &str) -> Option<Vec<NodeId>> {
    if root.id.as_str() == id {
        return Some(vec![root.id.clone()]);
    }
    root.children.iter().find_map(|child| {
        path_to(child, id).map(|mut path| {
            path.insert(0, root.id.clone());
            path
        })
    })
}

/// Merge `patch` into the node matching `id`. No-op when `id` is absent.
pub fn update(root: &Snapshot, id: &str, patch: &NodePatch) -> Snapshot {
    try_update(root, id, patch).unwrap_or_else(|e| {
        debug!("update: {}", e);
        Arc::clone(root)
    })
}

pub fn try_update(root: &Snapshot, id: &str, patch: &NodePatch) -> DomainResult<Snapshot> {
    rewrite(root, id, &mut |node: &OrgNode| node.patched(patch))
        .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))
}

/// Append a placeholder child with a fresh id under `parent_id`.
/// No-op when `parent_id` is absent.
pub fn add_child(root: &Snapshot, parent_id: &str) -> Snapshot {
    let child = NodeTemplate::default().child(fresh_id(root));
    add_child_node(root, parent_id, child)
}

/// Append `child` as the last child of `parent_id`. No-op when `parent_id`
/// is absent or when the result would be deeper than [`MAX_DEPTH`].
///
/// The caller is responsible for `child`'s subtree ids being unique within
/// `root`; [`fresh_id`] provides such an id for a new leaf.
pub fn add_child_node(root: &Snapshot, parent_id: &str, child: OrgNode) -> Snapshot {
    try_add_child_node(root, parent_id, child).unwrap_or_else(|e| {
        debug!("add_child: {}", e);
        Arc::clone(root)
    })
}

pub fn try_add_child_node(root: &Snapshot, parent_id: &str, child: OrgNode) -> DomainResult<Snapshot> {
    let parent_depth = path_to(root, parent_id)
        .ok_or_else(|| DomainError::NodeNotFound(parent_id.to_string()))?
        .len();
    if parent_depth + depth(&child) > MAX_DEPTH {
        return Err(DomainError::TooDeep {
            at: parent_id.to_string(),
            max: MAX_DEPTH,
        });
    }
    let child = Arc::new(child);
    rewrite(root, parent_id, &mut |parent: &OrgNode| {
        let mut node = parent.clone();
        node.children.push(Arc::clone(&child));
        node
    })
    .ok_or_else(|| DomainError::NodeNotFound(parent_id.to_string()))
}

/// Remove the subtree rooted at `id`.
///
/// No-op when `id` is absent, and when `id` names the root of `root` (the
/// node with no ancestors in this snapshot), whatever its id is.
pub fn delete(root: &Snapshot, id: &str) -> Snapshot {
    try_delete(root, id).unwrap_or_else(|e| {
        debug!("delete: {}", e);
        Arc::clone(root)
    })
}

pub fn try_delete(root: &Snapshot, id: &str) -> DomainResult<Snapshot> {
    if root.id.as_str() == id {
        return Err(DomainError::RootDeletion(id.to_string()));
    }
    remove_descendant(root, id).ok_or_else(|| DomainError::NodeNotFound(id.to_string()))
}

/// Flip `expanded` on the node matching `id`. No-op when `id` is absent.
pub fn toggle_expanded(root: &Snapshot, id: &str) -> Snapshot {
    rewrite(root, id, &mut |node: &OrgNode| {
        let mut node = node.clone();
        node.expanded = !node.expanded;
        node
    })
    .unwrap_or_else(|| {
        debug!("toggle_expanded: node not found: {}", id);
        Arc::clone(root)
    })
}

/// Set `expanded` on every node of the tree.
pub fn set_all_expanded(root: &Snapshot, expanded: bool) -> Snapshot {
    let children: Vec<Snapshot> = root
        .children
        .iter()
        .map(|child| set_all_expanded(child, expanded))
        .collect();
    let unchanged = root.expanded == expanded
        && children.iter().zip(&root.children).all(|(a, b)| Arc::ptr_eq(a, b));
    if unchanged {
        return Arc::clone(root);
    }
    Arc::new(OrgNode {
        expanded,
        children,
        ..(**root).clone()
    })
}

/// An id not present anywhere in `root`.
pub fn fresh_id(root: &OrgNode) -> NodeId {
    loop {
        let id = NodeId::generate();
        if !contains(root, id.as_str()) {
            return id;
        }
    }
}

/// Number of nodes in the tree, root included.
pub fn node_count(root: &OrgNode) -> usize {
    1 + root.children.iter().map(|child| node_count(child)).sum::<usize>()
}

/// Length of the longest root-to-leaf path, counted in nodes.
pub fn depth(root: &OrgNode) -> usize {
    1 + root
        .children
        .iter()
        .map(|child| depth(child))
        .max()
        .unwrap_or(0)
}

/// Ids of every node strictly below `id`, depth-first. Empty when `id` is
/// absent or a leaf.
pub fn descendant_ids(root: &OrgNode, id: &str) -> Vec<NodeId> {
    find(root, id)
        .map(|node| iter(node).skip(1).map(|n| n.id.clone()).collect())
        .unwrap_or_default()
}

/// Titles of all leaf nodes, depth-first.
pub fn leaf_titles(root: &OrgNode) -> Vec<String> {
    iter(root)
        .filter(|node| node.is_leaf())
        .map(|node| node.title.clone())
        .collect()
}

/// Depth-first, pre-order traversal, children left to right.
pub fn iter(root: &OrgNode) -> TreeIterator<'_> {
    TreeIterator { stack: vec![root] }
}

pub struct TreeIterator<'a> {
    stack: Vec<&'a OrgNode>,
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = &'a OrgNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in current.children.iter().rev() {
            self.stack.push(child.as_ref());
        }
        Some(current)
    }
}

/// Rebuild the path to the first node matching `id`, replacing that node
/// with `f(node)`. `None` when no node matches.
#[instrument(level = "trace", skip(node, f), fields(at = %node.id))]
fn rewrite(node: &Snapshot, id: &str, f: &mut dyn FnMut(&OrgNode) -> OrgNode) -> Option<Snapshot> {
    if node.id.as_str() == id {
        return Some(Arc::new(f(node.as_ref())));
    }
    for (i, child) in node.children.iter().enumerate() {
        if let Some(new_child) = rewrite(child, id, f) {
            let mut copy = (**node).clone();
            copy.children[i] = new_child;
            return Some(Arc::new(copy));
        }
    }
    None
}

/// Rebuild the path to the parent of the first descendant matching `id`,
/// with that descendant dropped from the parent's children.
#[instrument(level = "trace", skip(node), fields(at = %node.id))]
fn remove_descendant(node: &Snapshot, id: &str) -> Option<Snapshot> {
    if let Some(pos) = node.children.iter().position(|c| c.id.as_str() == id) {
        let mut copy = (**node).clone();
        copy.children.remove(pos);
        return Some(Arc::new(copy));
    }
    for (i, child) in node.children.iter().enumerate() {
        if let Some(new_child) = remove_descendant(child, id) {
            let mut copy = (**node).clone();
            copy.children[i] = new_child;
            return Some(Arc::new(copy));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // root
    // ├── a
    // │   └── a1
    // └── b
    fn sample() -> Snapshot {
        OrgNode::new("root", "Root")
            .with_child(OrgNode::new("a", "A").with_child(OrgNode::new("a1", "A1")))
            .with_child(OrgNode::new("b", "B"))
            .into_snapshot()
    }

    #[test]
    fn given_nested_id_when_finding_then_returns_node() {
        let tree = sample();
        assert_eq!(find(&tree, "a1").map(|n| n.title.as_str()), Some("A1"));
        assert!(find(&tree, "zzz").is_none());
    }

    #[test]
    fn given_update_when_target_is_deep_then_siblings_are_shared() {
        let tree = sample();
        let updated = update(&tree, "a1", &NodePatch::new().title("Sales"));

        assert_eq!(find(&updated, "a1").map(|n| n.title.as_str()), Some("Sales"));
        assert!(Arc::ptr_eq(&tree.children[1], &updated.children[1]));
        assert!(!Arc::ptr_eq(&tree.children[0], &updated.children[0]));
        // input untouched
        assert_eq!(find(&tree, "a1").map(|n| n.title.as_str()), Some("A1"));
    }

    #[test]
    fn given_missing_id_when_rewriting_then_same_snapshot_is_returned() {
        let tree = sample();
        assert!(Arc::ptr_eq(&tree, &update(&tree, "x", &NodePatch::new().title("t"))));
        assert!(Arc::ptr_eq(&tree, &delete(&tree, "x")));
        assert!(Arc::ptr_eq(&tree, &add_child(&tree, "x")));
        assert!(Arc::ptr_eq(&tree, &toggle_expanded(&tree, "x")));
    }

    #[test]
    fn given_root_id_when_try_delete_then_reports_root_deletion() {
        let tree = sample();
        assert_eq!(
            try_delete(&tree, "root"),
            Err(DomainError::RootDeletion("root".into()))
        );
    }

    #[test]
    fn given_path_query_then_lists_ancestors_in_order() {
        let tree = sample();
        let path = path_to(&tree, "a1").unwrap();
        let ids: Vec<&str> = path.iter().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["root", "a", "a1"]);
    }

    #[test]
    fn given_tree_when_iterating_then_pre_order_left_to_right() {
        let tree = sample();
        let ids: Vec<&str> = iter(&tree).map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "a", "a1", "b"]);
        assert_eq!(depth(&tree), 3);
        assert_eq!(leaf_titles(&tree), vec!["A1", "B"]);
    }

    #[test]
    fn given_all_expanded_when_setting_expanded_then_snapshot_is_reused() {
        let tree = sample();
        assert!(Arc::ptr_eq(&tree, &set_all_expanded(&tree, true)));

        let collapsed = set_all_expanded(&tree, false);
        assert!(iter(&collapsed).all(|n| !n.expanded));
    }
}
