//! Resource tree nodes.
//!
//! A `Node` is an immutable value. Children are held behind `Arc` so that a
//! mutation can rebuild the path from the root to the edited node and share
//! every untouched subtree with the previous snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    /// Active track ids, in activation order. Behaves as a set.
    #[serde(rename = "tracks", default)]
    pub active_tracks: Vec<String>,
    #[serde(default)]
    pub quantities: BTreeMap<String, f64>,
    #[serde(default)]
    pub children: Vec<Arc<Node>>,
}


impl Node {
    /// A fresh node: no tracks, no quantities, no children.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Node {
        Node {
            id: id.into(),
            name: name.into(),
            active_tracks: Vec::new(),
            quantities: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn is_active(&self, track_id: &str) -> bool {
        self.active_tracks.iter().any(|t| t == track_id)
    }

    /// True if this node or any descendant mentions `track_id`.
    pub fn references_track(&self, track_id: &str) -> bool {
        self.is_active(track_id)
            || self.quantities.contains_key(track_id)
            || self.children.iter().any(|c| c.references_track(track_id))
    }
}
