//! Invariant checks and the repair pass applied to imported documents.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::data::registry::TrackRegistry;
use crate::data::tree;
use crate::error::{Result, TreeError};
use crate::types::node::Node;
use crate::types::track::Track;


/// A single breach of the tree/registry invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    DuplicateNodeId { id: String },
    DuplicateTrackId { id: String },
    /// A node references a track the registry does not know.
    UnknownTrack { node: String, track: String },
    /// A non-root node has a track active that its parent does not.
    UnavailableTrack { node: String, track: String },
    /// A node holds a quantity for a track it has not activated.
    OrphanQuantity { node: String, track: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeId { id } => write!(f, "duplicate node id '{id}'"),
            Self::DuplicateTrackId { id } => write!(f, "duplicate track id '{id}'"),
            Self::UnknownTrack { node, track } => {
                write!(f, "node '{node}' references unknown track '{track}'")
            }
            Self::UnavailableTrack { node, track } => {
                write!(f, "node '{node}' has track '{track}' active but its parent does not")
            }
            Self::OrphanQuantity { node, track } => {
                write!(f, "node '{node}' has a quantity for inactive track '{track}'")
            }
        }
    }
}


/// Every invariant violation in `(registry, root)`, in pre-order.
pub fn violations(registry: &TrackRegistry, root: &Node) -> Vec<Violation> {
    let mut out = Vec::new();

    let mut track_ids = HashSet::new();
    for t in registry.list() {
        if !track_ids.insert(t.id.as_str()) {
            out.push(Violation::DuplicateTrackId { id: t.id.clone() });
        }
    }

    let mut node_ids = HashSet::new();
    check_node(root, None, &track_ids, &mut node_ids, &mut out);
    out
}

fn check_node<'a>(
    node: &'a Node,
    parent: Option<&Node>,
    known: &HashSet<&str>,
    seen: &mut HashSet<&'a str>,
    out: &mut Vec<Violation>,
) {
    if !seen.insert(node.id.as_str()) {
        out.push(Violation::DuplicateNodeId { id: node.id.clone() });
    }
    let referenced = node.active_tracks.iter().chain(node.quantities.keys());
    let mut reported = HashSet::new();
    for track in referenced {
        if !known.contains(track.as_str()) && reported.insert(track.as_str()) {
            out.push(Violation::UnknownTrack {
                node: node.id.clone(),
                track: track.clone(),
            });
        }
    }
    if let Some(parent) = parent {
        for track in &node.active_tracks {
            if !parent.is_active(track) {
                out.push(Violation::UnavailableTrack {
                    node: node.id.clone(),
                    track: track.clone(),
                });
            }
        }
    }
    for track in node.quantities.keys() {
        if !node.is_active(track) {
            out.push(Violation::OrphanQuantity {
                node: node.id.clone(),
                track: track.clone(),
            });
        }
    }
    for child in &node.children {
        check_node(child, Some(node), known, seen, out);
    }
}


/// Bring an imported document in line with the invariants.
///
/// Duplicate ids cannot be repaired without guessing which node or track was
/// meant, so they reject the import. Every other breach is stripped top-down.
pub fn repair(tracks: Vec<Track>, root: &Node) -> Result<(TrackRegistry, Arc<Node>)> {
    let registry = TrackRegistry::from_tracks(tracks).map_err(|e| TreeError::InvalidImport {
        message: e.to_string(),
    })?;
    if let Some(id) = tree::first_duplicate_id(root) {
        return Err(TreeError::InvalidImport {
            message: format!("duplicate node id: {}", id),
        });
    }
    let root = tree::restrict_tracks(root, None, &|t: &str| registry.contains(t));
    Ok((registry, root))
}
