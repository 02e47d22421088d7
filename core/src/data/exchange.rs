//! Exchange codec — the JSON text form of `{tracks, tree}`.
//!
//! Export is deterministic: tracks keep registry order, node tracks keep
//! activation order, quantities are sorted by track id. Import checks only
//! that the text parses and carries both top-level fields; invariant checking
//! is left to the session's import policy.

use std::collections::{BTreeMap, HashMap};

use kurbo::Rect;
use serde::Serialize;

use crate::error::{Result, TreeError};
use crate::layout::Layout;
use crate::types::node::Node;
use crate::types::track::Track;


/// A decoded exchange document.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub tracks: Vec<Track>,
    pub tree: Node,
}


#[derive(Serialize)]
struct ExportDoc<'a> {
    tracks: &'a [Track],
    tree: ExportNode<'a>,
}

#[derive(Serialize)]
struct ExportNode<'a> {
    id: &'a str,
    name: &'a str,
    tracks: &'a [String],
    quantities: &'a BTreeMap<String, f64>,
    children: Vec<ExportNode<'a>>,
    #[serde(flatten)]
    frame: Option<Frame>,
}

#[derive(Serialize)]
struct Frame {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<Rect> for Frame {
    fn from(r: Rect) -> Frame {
        Frame {
            x: r.x0,
            y: r.y0,
            width: r.width(),
            height: r.height(),
        }
    }
}

fn export_node<'a>(node: &'a Node, frames: &HashMap<&str, Rect>) -> ExportNode<'a> {
    ExportNode {
        id: &node.id,
        name: &node.name,
        tracks: &node.active_tracks,
        quantities: &node.quantities,
        children: node.children.iter().map(|c| export_node(c, frames)).collect(),
        frame: frames.get(node.id.as_str()).copied().map(Frame::from),
    }
}


/// Encode tracks and tree as JSON text.
///
/// When `layout` is given, each node also carries the `x`, `y`, `width` and
/// `height` computed for it. Those fields are informational only.
pub fn export(tracks: &[Track], tree: &Node, layout: Option<&Layout>, pretty: bool) -> Result<String> {
    let mut frames = HashMap::new();
    if let Some(layout) = layout {
        layout.root.visit(&mut |n| {
            frames.insert(n.id.as_str(), n.rect);
        });
    }
    let doc = ExportDoc {
        tracks,
        tree: export_node(tree, &frames),
    };
    let text = if pretty {
        serde_json::to_string_pretty(&doc)
    } else {
        serde_json::to_string(&doc)
    };
    text.map_err(TreeError::Encode)
}


/// Decode JSON text produced by [`export`] or written by hand.
///
/// Fails with `MalformedText` if the text is not JSON, and with
/// `InvalidSchema` if `tracks` or `tree` is missing or has the wrong shape.
/// Layout fields on nodes are accepted and dropped.
pub fn import(text: &str) -> Result<Exchange> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(TreeError::MalformedText)?;
    let obj = value
        .as_object()
        .ok_or_else(|| TreeError::invalid_schema("expected an object with 'tracks' and 'tree'"))?;

    let tracks = required(obj, "tracks")?;
    let tree = required(obj, "tree")?;

    let tracks: Vec<Track> = serde_json::from_value(tracks.clone())
        .map_err(|e| TreeError::invalid_schema(format!("tracks: {}", e)))?;
    let tree: Node = serde_json::from_value(tree.clone())
        .map_err(|e| TreeError::invalid_schema(format!("tree: {}", e)))?;

    Ok(Exchange { tracks, tree })
}

fn required<'a>(
    obj: &'a serde_json::Map<String, serde_json::Value>,
    field: &str,
) -> Result<&'a serde_json::Value> {
    obj.get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| TreeError::invalid_schema(format!("missing '{}' field", field)))
}
