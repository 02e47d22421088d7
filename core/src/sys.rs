use std::sync::Arc;

use crate::command::Command;
use crate::data::exchange;
use crate::data::registry::TrackRegistry;
use crate::data::tree;
use crate::data::validate::{self, Violation};
use crate::error::{Result, TreeError};
use crate::layout::{self, Layout};
use crate::response::Response;
use crate::types::config::{ImportPolicy, Settings};
use crate::types::node::Node;
use crate::types::track::{Track, TrackKind};


/// The session: one track registry and one tree, each swapped whole.
///
/// Every typed operation builds the complete next snapshot before assigning
/// it, so a failed operation leaves the session exactly as it was.
#[derive(Debug)]
pub struct Sys {
    registry: TrackRegistry,
    root: Arc<Node>,
    settings: Settings,
    next_id: u64,
}


/// Next `<prefix>-<n>` id not rejected by `taken`.
fn fresh_id(counter: &mut u64, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    loop {
        *counter += 1;
        let id = format!("{}-{}", prefix, counter);
        if !taken(&id) {
            return id;
        }
    }
}


impl Sys {
    pub fn new(settings: Settings) -> Sys {
        let mut next_id = 0;
        let root_id = fresh_id(&mut next_id, "node", |_| false);
        Sys {
            registry: TrackRegistry::new(),
            root: Arc::new(Node::new(root_id, settings.root_name.clone())),
            settings,
            next_id,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tracks(&self) -> &TrackRegistry {
        &self.registry
    }

    /// The current tree snapshot.
    pub fn tree(&self) -> &Arc<Node> {
        &self.root
    }

    /// The single dispatch method.
    pub fn execute(&mut self, cmd: Command) -> Response {
        tracing::debug!(?cmd, "execute");
        let result = match cmd {
            Command::Status => Ok(self.status()),
            Command::Help { topic } => Ok(crate::help::help_text(topic.as_deref())),
            Command::TracksList => Ok(self.registry.to_json()),
            Command::TrackAdd { name, color, kind, id } => self.add_track(name, color, kind, id),
            Command::TrackDelete { id } => self
                .delete_track(&id)
                .map(|t| format!("Track '{}' deleted", t.name)),
            Command::NodeAdd { parent, name } => self.add_node(&parent, &name),
            Command::NodeDelete { id } => self
                .delete_node(&id)
                .map(|()| format!("Node '{}' deleted", id)),
            Command::NodeRename { id, name } => self
                .rename_node(&id, &name)
                .map(|()| format!("Node '{}' renamed to '{}'", id, name)),
            Command::NodeToggle { node, track } => self.cmd_toggle(&node, &track),
            Command::NodeSet { node, track, value } => self
                .set_quantity(&node, &track, value)
                .map(|()| format!("{} = {} on '{}'", track, value, node)),
            Command::TreeShow => Ok(self.render_tree()),
            Command::Check => Ok(self.cmd_check()),
            Command::Layout => Ok(self.layout().to_json()),
            Command::Export => self.export(),
            Command::Import { text } => self.import(&text).map(|()| self.status()),
        };
        match result {
            Ok(output) => Response::ok(output),
            Err(e) => {
                tracing::warn!(error = %e, "command rejected");
                Response::error(e.to_string())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Track registry
    // -----------------------------------------------------------------------

    /// Register a track and return its id. A missing or empty id is generated.
    pub fn add_track(
        &mut self,
        name: String,
        color: String,
        kind: TrackKind,
        id: Option<String>,
    ) -> Result<String> {
        let id = match id.filter(|s| !s.is_empty()) {
            Some(id) => id,
            None => {
                let registry = &self.registry;
                fresh_id(&mut self.next_id, "track", |id| registry.contains(id))
            }
        };
        let mut registry = self.registry.clone();
        registry.add(Track::new(id.clone(), name, color, kind))?;
        self.registry = registry;
        tracing::info!(track = %id, "track added");
        Ok(id)
    }

    /// Remove a track from the registry and from every node, as one step.
    pub fn delete_track(&mut self, id: &str) -> Result<Track> {
        let mut registry = self.registry.clone();
        let removed = registry.remove(id)?;
        let root = tree::delete_track_everywhere(&self.root, id);
        self.registry = registry;
        self.root = root;
        tracing::info!(track = %id, "track deleted");
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Resource tree
    // -----------------------------------------------------------------------

    /// Append a fresh child under `parent` and return its id.
    pub fn add_node(&mut self, parent: &str, name: &str) -> Result<String> {
        if !tree::contains_id(&self.root, parent) {
            return Err(TreeError::node_not_found(parent));
        }
        let root = &self.root;
        let id = fresh_id(&mut self.next_id, "node", |id| tree::contains_id(root, id));
        self.root = tree::add_child(&self.root, parent, Node::new(id.clone(), name))?;
        tracing::info!(node = %id, parent, "node added");
        Ok(id)
    }

    pub fn delete_node(&mut self, id: &str) -> Result<()> {
        self.root = tree::delete_node(&self.root, id)?;
        tracing::info!(node = id, "node deleted");
        Ok(())
    }

    pub fn rename_node(&mut self, id: &str, name: &str) -> Result<()> {
        self.root = tree::rename_node(&self.root, id, name)?;
        tracing::info!(node = id, name, "node renamed");
        Ok(())
    }

    /// Toggle a track on a node. Returns `false` when the track is not
    /// available at the node and nothing changed.
    pub fn toggle_track(&mut self, node: &str, track: &str) -> Result<bool> {
        if !self.registry.contains(track) {
            return Err(TreeError::UnknownTrack {
                id: track.to_string(),
            });
        }
        let next = tree::toggle_track(&self.root, node, track)?;
        let changed = !Arc::ptr_eq(&next, &self.root);
        if changed {
            self.root = next;
            tracing::info!(node, track, "track toggled");
        }
        Ok(changed)
    }

    pub fn set_quantity(&mut self, node: &str, track: &str, value: f64) -> Result<()> {
        if !self.registry.contains(track) {
            return Err(TreeError::UnknownTrack {
                id: track.to_string(),
            });
        }
        self.root = tree::set_quantity(&self.root, node, track, value)?;
        tracing::info!(node, track, value, "quantity set");
        Ok(())
    }

    /// Invariant violations in the current state. Empty unless a trusted
    /// import brought some in.
    pub fn violations(&self) -> Vec<Violation> {
        validate::violations(&self.registry, &self.root)
    }

    // -----------------------------------------------------------------------
    // Layout / Exchange
    // -----------------------------------------------------------------------

    pub fn layout(&self) -> Layout {
        layout::layout(&self.root)
    }

    pub fn export(&self) -> Result<String> {
        let layout = self.settings.export_layout.then(|| self.layout());
        exchange::export(
            self.registry.list(),
            &self.root,
            layout.as_ref(),
            self.settings.pretty_export,
        )
    }

    /// Replace the whole session state with an exchange document.
    pub fn import(&mut self, text: &str) -> Result<()> {
        let doc = exchange::import(text)?;
        let (registry, root) = match self.settings.import_policy {
            ImportPolicy::Repair => validate::repair(doc.tracks, &doc.tree)?,
            ImportPolicy::Trust => (
                TrackRegistry::from_tracks_unchecked(doc.tracks),
                Arc::new(doc.tree),
            ),
        };
        self.registry = registry;
        self.root = root;
        tracing::info!(
            tracks = self.registry.len(),
            nodes = tree::node_count(&self.root),
            "session imported"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    fn status(&self) -> String {
        format!(
            "tracks: {}, nodes: {}",
            self.registry.len(),
            tree::node_count(&self.root)
        )
    }

    /// Indented text view of the tree with each node's tracks and quantities.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render_node(&self.root, 0, &mut out);
        out.truncate(out.trim_end().len());
        out
    }

    fn render_node(&self, node: &Node, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{} [{}]", node.name, node.id));
        for track_id in &node.active_tracks {
            let (glyph, name) = match self.registry.get(track_id) {
                Some(t) => (t.kind.glyph(), t.name.as_str()),
                None => ("?", track_id.as_str()),
            };
            match node.quantities.get(track_id) {
                Some(v) => out.push_str(&format!("  {} {}={}", glyph, name, v)),
                None => out.push_str(&format!("  {} {}", glyph, name)),
            }
        }
        out.push('\n');
        for child in &node.children {
            self.render_node(child, depth + 1, out);
        }
    }

    fn cmd_toggle(&mut self, node: &str, track: &str) -> Result<String> {
        if !self.toggle_track(node, track)? {
            return Ok(format!(
                "Track '{}' is not available on '{}' (inactive at parent); no change",
                track, node
            ));
        }
        let active = tree::find(&self.root, node).is_some_and(|n| n.is_active(track));
        let verb = if active { "activated" } else { "deactivated" };
        Ok(format!("Track '{}' {} on '{}'", track, verb, node))
    }

    fn cmd_check(&self) -> String {
        let violations = self.violations();
        if violations.is_empty() {
            return "ok: no invariant violations".into();
        }
        violations
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}


impl Default for Sys {
    fn default() -> Self {
        Sys::new(Settings::default())
    }
}
