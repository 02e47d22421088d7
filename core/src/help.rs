//! Help system for tracktree commands.

pub fn help_text(topic: Option<&str>) -> String {
    match topic {
        None => overview(),
        Some(t) => {
            if let Some(text) = command_help(t) {
                return text;
            }
            if let Some(text) = group_help(t) {
                return text;
            }
            format!("Unknown help topic: '{}'. Run 'help' for a list of commands.", t)
        }
    }
}


fn overview() -> String {
    "\
tracktree — resource tree editor with inherited tracks

Usage: tracktree [--import <file>] [command [args...]]
       With no command, reads one command per line from stdin.

Commands:
  status                       Show track and node counts
  help [topic]                 Show help

Track commands:
  tracks                                   List tracks in legend order
  track add <name> <color> [track|limit] [--id <id>]
                                           Register a track
  track delete <id> [-y]                   Delete a track everywhere

Node commands:
  node add <parent> <name>                 Append a child node
  node delete <id> [-y]                    Delete a node and its subtree
  node rename <id> <name>                  Rename a node
  node toggle <id> <track>                 Activate or deactivate a track
  node set <id> <track> <value>            Set a quantity on an active track
  tree                                     Print the tree
  check                                    Report invariant violations

Layout / exchange:
  layout                                   Print positions and connectors as JSON
  export [file]                            Write {tracks, tree} JSON
  import <file>                            Replace the session from JSON

Run 'help <command>' for detailed help on a specific command."
        .into()
}


fn group_help(group: &str) -> Option<String> {
    let text = match group {
        "track" => "\
Track commands — manage the global track registry

  track add <name> <color> [track|limit] [--id <id>]
    Register a track. The id is generated unless given.

  track delete <id> [-y]
    Remove the track from the registry and from every node.
    Asks for confirmation unless -y is given.",

        "node" => "\
Node commands — edit the resource tree

  node add <parent> <name>
    Append a child with no tracks. Prints the new node id.

  node delete <id> [-y]
    Delete a node and everything under it. The root cannot be deleted.

  node rename <id> <name>
    Change a node's name.

  node toggle <id> <track>
    Activate a track the parent has active, or deactivate a track here
    and in the whole subtree below.

  node set <id> <track> <value>
    Set the node's quantity for an active track.",

        "exchange" => "\
Exchange commands — move a session in and out as JSON

  export [file]
    Print or write {tracks, tree}. Settings control pretty printing and
    whether layout fields are included.

  import <file>
    Replace tracks and tree with the file's contents. On error the
    session is left unchanged.",

        _ => return None,
    };
    Some(text.into())
}


fn command_help(command: &str) -> Option<String> {
    let text = match command {
        "status" => "status — show track and node counts\n\nUsage: status",
        "help" => "help — show help\n\nUsage: help [topic]",
        "tracks" | "tracks.list" => "tracks — list tracks\n\nUsage: tracks",
        "track.add" => "track add — register a track\n\nUsage: track add <name> <color> [track|limit] [--id <id>]",
        "track.delete" => "track delete — delete a track everywhere\n\nUsage: track delete <id> [-y]",
        "node.add" => "node add — append a child node\n\nUsage: node add <parent> <name>",
        "node.delete" => "node delete — delete a subtree\n\nUsage: node delete <id> [-y]",
        "node.rename" => "node rename — rename a node\n\nUsage: node rename <id> <name>",
        "node.toggle" => "node toggle — activate or deactivate a track\n\nUsage: node toggle <id> <track>",
        "node.set" => "node set — set a quantity\n\nUsage: node set <id> <track> <value>",
        "tree" | "tree.show" => "tree — print the tree\n\nUsage: tree",
        "check" => "check — report invariant violations\n\nUsage: check",
        "layout" => "layout — print node positions and connector paths as JSON\n\nUsage: layout",
        "export" => "export — write {tracks, tree} JSON\n\nUsage: export [file]",
        "import" => "import — replace the session from JSON\n\nUsage: import <file>",
        _ => return None,
    };
    Some(text.into())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_lists_groups() {
        let text = help_text(None);
        assert!(text.contains("Track commands:"));
        assert!(text.contains("Node commands:"));
        assert!(text.contains("Layout / exchange:"));
    }

    #[test]
    fn group_help_node() {
        let text = help_text(Some("node"));
        assert!(text.contains("node toggle"));
        assert!(text.contains("node set"));
    }

    #[test]
    fn command_help_node_set() {
        let text = help_text(Some("node.set"));
        assert!(text.contains("Usage:"));
        assert!(text.contains("<value>"));
    }

    #[test]
    fn unknown_topic() {
        let text = help_text(Some("bogus"));
        assert!(text.contains("Unknown help topic"));
    }
}
