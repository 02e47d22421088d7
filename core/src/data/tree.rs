//! Resource tree engine — invariant-preserving mutations on immutable trees.
//!
//! Every mutation takes the current root and returns a new root. The path from
//! the root to the edited node is rebuilt; every other subtree is shared with
//! the input by `Arc`. The input tree is never modified.
//!
//! Invariants kept by every operation here:
//!
//! - node ids are pairwise distinct;
//! - a non-root node's active tracks are a subset of its parent's;
//! - a node only holds quantities for tracks it has activated.
//!
//! Registry consistency (every referenced track exists) is the session's
//! concern, since the engine never sees the registry.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Result, TreeError};
use crate::types::node::Node;


// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Find a node anywhere in the tree.
pub fn find<'a>(root: &'a Node, id: &str) -> Option<&'a Node> {
    if root.id == id {
        return Some(root);
    }
    root.children.iter().find_map(|c| find(c, id))
}

/// Find the parent of `id`. `None` for the root or an unknown id.
pub fn parent_of<'a>(root: &'a Node, id: &str) -> Option<&'a Node> {
    if root.children.iter().any(|c| c.id == id) {
        return Some(root);
    }
    root.children.iter().find_map(|c| parent_of(c, id))
}

/// All nodes in pre-order.
pub fn walk(root: &Node) -> Vec<&Node> {
    let mut out = Vec::new();
    walk_into(root, &mut out);
    out
}

fn walk_into<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    out.push(node);
    for child in &node.children {
        walk_into(child, out);
    }
}

pub fn node_count(root: &Node) -> usize {
    1 + root.children.iter().map(|c| node_count(c)).sum::<usize>()
}

pub fn contains_id(root: &Node, id: &str) -> bool {
    find(root, id).is_some()
}

/// Child indices leading from `node` to `id`. Empty when `node` is the target.
fn path_to(node: &Node, id: &str) -> Option<Vec<usize>> {
    if node.id == id {
        return Some(Vec::new());
    }
    for (i, child) in node.children.iter().enumerate() {
        if let Some(mut path) = path_to(child, id) {
            path.insert(0, i);
            return Some(path);
        }
    }
    None
}

fn node_at<'a>(root: &'a Arc<Node>, path: &[usize]) -> &'a Arc<Node> {
    path.iter().fold(root, |node, &i| &node.children[i])
}

/// Rebuild the spine along `path`, substituting `f(target)` at its end.
fn replace_at<F>(node: &Arc<Node>, path: &[usize], f: F) -> Result<Arc<Node>>
where
    F: FnOnce(&Arc<Node>) -> Result<Arc<Node>>,
{
    match path.split_first() {
        None => f(node),
        Some((&i, rest)) => {
            let child = replace_at(&node.children[i], rest, f)?;
            let mut next = (**node).clone();
            next.children[i] = child;
            Ok(Arc::new(next))
        }
    }
}

fn locate(root: &Node, id: &str) -> Result<Vec<usize>> {
    path_to(root, id).ok_or_else(|| TreeError::node_not_found(id))
}

// ---------------------------------------------------------------------------
// Track activation
// ---------------------------------------------------------------------------

/// Activate or deactivate `track_id` on a node.
///
/// Turning a track on touches only the target node, and only if the parent
/// has the track active (the root may take any track). An unavailable track
/// is a silent no-op: the input root is returned unchanged. Turning a track
/// off strips it, and its quantities, from the whole subtree.
pub fn toggle_track(root: &Arc<Node>, node_id: &str, track_id: &str) -> Result<Arc<Node>> {
    let path = locate(root, node_id)?;
    let target = node_at(root, &path);
    let is_active = target.is_active(track_id);
    let is_available = parent_of(root, node_id).map_or(true, |p| p.is_active(track_id));

    if !is_active && !is_available {
        tracing::debug!(node = node_id, track = track_id, "track unavailable at parent; toggle ignored");
        return Ok(Arc::clone(root));
    }

    replace_at(root, &path, |node| {
        if is_active {
            Ok(strip_track(node, track_id))
        } else {
            let mut next = (**node).clone();
            next.active_tracks.push(track_id.to_string());
            Ok(Arc::new(next))
        }
    })
}

/// Set a node's quantity for a track it has activated.
pub fn set_quantity(root: &Arc<Node>, node_id: &str, track_id: &str, value: f64) -> Result<Arc<Node>> {
    if !value.is_finite() {
        return Err(TreeError::InvalidQuantity { value });
    }
    let path = locate(root, node_id)?;
    replace_at(root, &path, |node| {
        if !node.is_active(track_id) {
            return Err(TreeError::TrackNotActive {
                node: node_id.to_string(),
                track: track_id.to_string(),
            });
        }
        let mut next = (**node).clone();
        next.quantities.insert(track_id.to_string(), value);
        Ok(Arc::new(next))
    })
}

/// Remove `track_id` from every node in the tree.
pub fn delete_track_everywhere(root: &Arc<Node>, track_id: &str) -> Arc<Node> {
    strip_track(root, track_id)
}

/// Strip a track from a subtree. Visits every node; subtrees that never
/// mentioned the track come back as the same `Arc`.
fn strip_track(node: &Arc<Node>, track_id: &str) -> Arc<Node> {
    let children: Vec<Arc<Node>> = node
        .children
        .iter()
        .map(|c| strip_track(c, track_id))
        .collect();
    let children_same = children
        .iter()
        .zip(&node.children)
        .all(|(a, b)| Arc::ptr_eq(a, b));
    let mentions = node.is_active(track_id) || node.quantities.contains_key(track_id);

    if children_same && !mentions {
        return Arc::clone(node);
    }
    let mut next = (**node).clone();
    next.active_tracks.retain(|t| t != track_id);
    next.quantities.remove(track_id);
    next.children = children;
    Arc::new(next)
}

/// Rebuild a subtree so that each node only keeps tracks that pass `keep` and
/// are active at its parent (`available`, `None` meaning unconstrained), and
/// only quantities for tracks it keeps. Repeated track ids collapse to one.
pub fn restrict_tracks<K>(node: &Node, available: Option<&[String]>, keep: &K) -> Arc<Node>
where
    K: Fn(&str) -> bool,
{
    let mut active: Vec<String> = Vec::new();
    for t in &node.active_tracks {
        let allowed = available.map_or(true, |a| a.contains(t));
        if allowed && keep(t.as_str()) && !active.contains(t) {
            active.push(t.clone());
        }
    }
    let quantities = node
        .quantities
        .iter()
        .filter(|(k, _)| active.contains(k))
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    let children = node
        .children
        .iter()
        .map(|c| restrict_tracks(c, Some(active.as_slice()), keep))
        .collect();
    Arc::new(Node {
        id: node.id.clone(),
        name: node.name.clone(),
        active_tracks: active,
        quantities,
        children,
    })
}

// ---------------------------------------------------------------------------
// Structural edits
// ---------------------------------------------------------------------------

fn collect_ids<'a>(node: &'a Node, ids: &mut HashSet<&'a str>) -> Option<&'a str> {
    if !ids.insert(node.id.as_str()) {
        return Some(node.id.as_str());
    }
    node.children.iter().find_map(|c| collect_ids(c, ids))
}

/// First repeated node id in the tree, if any.
pub fn first_duplicate_id(root: &Node) -> Option<String> {
    let mut ids = HashSet::new();
    collect_ids(root, &mut ids).map(str::to_string)
}

/// Append `child` (with its subtree) as the last child of `parent_id`.
///
/// The child's ids must not collide with ids already in the tree. Its tracks
/// are narrowed to what the parent has active.
pub fn add_child(root: &Arc<Node>, parent_id: &str, child: Node) -> Result<Arc<Node>> {
    let path = locate(root, parent_id)?;

    let mut ids = HashSet::new();
    collect_ids(root, &mut ids);
    if let Some(dup) = collect_ids(&child, &mut ids) {
        return Err(TreeError::DuplicateId { id: dup.to_string() });
    }

    replace_at(root, &path, |parent| {
        let child = restrict_tracks(&child, Some(parent.active_tracks.as_slice()), &|_: &str| true);
        let mut next = (**parent).clone();
        next.children.push(child);
        Ok(Arc::new(next))
    })
}

/// Remove a node and its whole subtree.
pub fn delete_node(root: &Arc<Node>, node_id: &str) -> Result<Arc<Node>> {
    if root.id == node_id {
        return Err(TreeError::CannotDeleteRoot);
    }
    let path = locate(root, node_id)?;
    let Some((&index, parent_path)) = path.split_last() else {
        return Err(TreeError::CannotDeleteRoot);
    };
    replace_at(root, parent_path, |parent| {
        let mut next = (**parent).clone();
        next.children.remove(index);
        Ok(Arc::new(next))
    })
}

pub fn rename_node(root: &Arc<Node>, node_id: &str, name: &str) -> Result<Arc<Node>> {
    let path = locate(root, node_id)?;
    replace_at(root, &path, |node| {
        let mut next = (**node).clone();
        next.name = name.to_string();
        Ok(Arc::new(next))
    })
}
