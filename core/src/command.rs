//! Command — the typed interface for every user action.
//!
//! Each user action maps to exactly one command, executed synchronously by
//! [`Sys::execute`](crate::sys::Sys::execute).

use serde::{Deserialize, Serialize};

use crate::types::track::TrackKind;


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command")]
pub enum Command {
    // -----------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------

    #[serde(rename = "status")]
    Status,

    #[serde(rename = "help")]
    Help {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
    },

    // -----------------------------------------------------------------
    // Track registry
    // -----------------------------------------------------------------

    #[serde(rename = "tracks.list")]
    TracksList,

    #[serde(rename = "track.add")]
    TrackAdd {
        name: String,
        color: String,
        #[serde(default)]
        kind: TrackKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    #[serde(rename = "track.delete")]
    TrackDelete {
        id: String,
    },

    // -----------------------------------------------------------------
    // Resource tree
    // -----------------------------------------------------------------

    #[serde(rename = "node.add")]
    NodeAdd {
        parent: String,
        name: String,
    },

    #[serde(rename = "node.delete")]
    NodeDelete {
        id: String,
    },

    #[serde(rename = "node.rename")]
    NodeRename {
        id: String,
        name: String,
    },

    #[serde(rename = "node.toggle")]
    NodeToggle {
        node: String,
        track: String,
    },

    #[serde(rename = "node.set")]
    NodeSet {
        node: String,
        track: String,
        value: f64,
    },

    #[serde(rename = "tree.show")]
    TreeShow,

    #[serde(rename = "check")]
    Check,

    // -----------------------------------------------------------------
    // Layout / Exchange
    // -----------------------------------------------------------------

    #[serde(rename = "layout")]
    Layout,

    #[serde(rename = "export")]
    Export,

    #[serde(rename = "import")]
    Import {
        text: String,
    },
}


impl Command {
    /// True for commands the shell must confirm before running.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Command::TrackDelete { .. } | Command::NodeDelete { .. })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        let cmd = Command::Status;
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"command\":\"status\""));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn track_add_defaults_kind() {
        let cmd: Command =
            serde_json::from_str(r##"{"command":"track.add","name":"Budget","color":"#22c55e"}"##).unwrap();
        assert_eq!(
            cmd,
            Command::TrackAdd {
                name: "Budget".into(),
                color: "#22c55e".into(),
                kind: TrackKind::Regular,
                id: None,
            }
        );
    }

    #[test]
    fn track_add_limit_kind() {
        let cmd: Command = serde_json::from_str(
            r##"{"command":"track.add","name":"Cap","color":"#f00","kind":"limit","id":"cap"}"##,
        )
        .unwrap();
        match cmd {
            Command::TrackAdd { kind, id, .. } => {
                assert_eq!(kind, TrackKind::Limit);
                assert_eq!(id.as_deref(), Some("cap"));
            }
            other => panic!("expected TrackAdd, got {:?}", other),
        }
    }

    #[test]
    fn node_set_round_trip() {
        let cmd = Command::NodeSet {
            node: "node-2".into(),
            track: "budget".into(),
            value: 12.5,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"command\":\"node.set\""));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn node_toggle_round_trip() {
        let cmd = Command::NodeToggle {
            node: "root".into(),
            track: "a".into(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"command\":\"node.toggle\""));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn destructive_commands() {
        assert!(Command::TrackDelete { id: "a".into() }.is_destructive());
        assert!(Command::NodeDelete { id: "n".into() }.is_destructive());
        assert!(!Command::TreeShow.is_destructive());
    }
}
