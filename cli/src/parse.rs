//! Input parsing — one line (or the process arguments) into one request.

use tracktree_core::command::Command;
use tracktree_core::types::track::TrackKind;


/// What the shell should do with one line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Core(Command),
    /// Read a file and import its contents.
    ImportFile(String),
    /// Export and write the text to a file.
    ExportFile(String),
    Quit,
}


#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub request: Request,
    /// Skip the confirmation prompt for destructive commands.
    pub assume_yes: bool,
}


/// Split a line into words. Double quotes group words; `\"` escapes a quote.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            '\\' if quoted => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err("unterminated quote".into());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}


/// Parse one input line. A line starting with `{` is a JSON command.
/// Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Invocation>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    if trimmed.starts_with('{') {
        let cmd: Command = serde_json::from_str(trimmed)
            .map_err(|e| format!("Failed to parse command JSON: {}", e))?;
        return Ok(Some(Invocation {
            request: Request::Core(cmd),
            assume_yes: false,
        }));
    }
    let words = split_line(trimmed)?;
    let refs: Vec<&str> = words.iter().map(|s| s.as_str()).collect();
    parse_args(&refs).map(Some)
}


pub fn parse_args(args: &[&str]) -> Result<Invocation, String> {
    if args.is_empty() {
        return Err("No command specified. Run 'help' for usage.".into());
    }
    let assume_yes = args.iter().any(|a| *a == "-y" || *a == "--yes");
    let args: Vec<&str> = args
        .iter()
        .copied()
        .filter(|a| *a != "-y" && *a != "--yes")
        .collect();
    if args.is_empty() {
        return Err("No command specified. Run 'help' for usage.".into());
    }

    let core = |cmd: Command| Request::Core(cmd);
    let request = match args[0] {
        "status" => core(Command::Status),
        "help" => core(Command::Help {
            topic: args.get(1).map(|s| s.to_string()),
        }),
        "tracks" => core(Command::TracksList),
        "tree" => core(Command::TreeShow),
        "check" => core(Command::Check),
        "layout" => core(Command::Layout),
        "export" => match args.get(1) {
            Some(path) => Request::ExportFile(path.to_string()),
            None => core(Command::Export),
        },
        "import" => {
            let path = args.get(1).ok_or("Usage: import <file>")?;
            Request::ImportFile(path.to_string())
        }
        "track" => parse_track(&args)?,
        "node" => parse_node(&args)?,
        "quit" | "exit" => Request::Quit,
        _ => return Err(format!("Unknown command: '{}'. Run 'help' for usage.", args[0])),
    };
    Ok(Invocation { request, assume_yes })
}


fn parse_track(args: &[&str]) -> Result<Request, String> {
    if args.len() < 2 {
        return Err("Usage: track <add|delete> ...".into());
    }
    match args[1] {
        "add" => {
            let id = find_flag(args, "--id");
            let positional = positional(&args[2..], "--id");
            if positional.len() < 2 {
                return Err("Usage: track add <name> <color> [track|limit] [--id <id>]".into());
            }
            let kind = match positional.get(2) {
                Some(k) => TrackKind::parse(k)
                    .ok_or_else(|| format!("Unknown track type: '{}' (expected track or limit)", k))?,
                None => TrackKind::Regular,
            };
            Ok(Request::Core(Command::TrackAdd {
                name: positional[0].into(),
                color: positional[1].into(),
                kind,
                id,
            }))
        }
        "delete" => {
            if args.len() < 3 {
                return Err("Usage: track delete <id> [-y]".into());
            }
            Ok(Request::Core(Command::TrackDelete { id: args[2].into() }))
        }
        _ => Err(format!("Unknown track subcommand: '{}'", args[1])),
    }
}


fn parse_node(args: &[&str]) -> Result<Request, String> {
    if args.len() < 2 {
        return Err("Usage: node <add|delete|rename|toggle|set> ...".into());
    }
    let cmd = match args[1] {
        "add" => {
            if args.len() < 4 {
                return Err("Usage: node add <parent> <name>".into());
            }
            Command::NodeAdd {
                parent: args[2].into(),
                name: args[3..].join(" "),
            }
        }
        "delete" => {
            if args.len() < 3 {
                return Err("Usage: node delete <id> [-y]".into());
            }
            Command::NodeDelete { id: args[2].into() }
        }
        "rename" => {
            if args.len() < 4 {
                return Err("Usage: node rename <id> <name>".into());
            }
            Command::NodeRename {
                id: args[2].into(),
                name: args[3..].join(" "),
            }
        }
        "toggle" => {
            if args.len() < 4 {
                return Err("Usage: node toggle <id> <track>".into());
            }
            Command::NodeToggle {
                node: args[2].into(),
                track: args[3].into(),
            }
        }
        "set" => {
            if args.len() < 5 {
                return Err("Usage: node set <id> <track> <value>".into());
            }
            let value = args[4]
                .parse::<f64>()
                .map_err(|_| format!("Not a number: '{}'", args[4]))?;
            Command::NodeSet {
                node: args[2].into(),
                track: args[3].into(),
                value,
            }
        }
        _ => return Err(format!("Unknown node subcommand: '{}'", args[1])),
    };
    Ok(Request::Core(cmd))
}


fn find_flag(args: &[&str], flag: &str) -> Option<String> {
    for (i, arg) in args.iter().enumerate() {
        if *arg == flag {
            return args.get(i + 1).map(|s| s.to_string());
        }
    }
    None
}

/// Arguments with `flag` and its value removed.
fn positional<'a>(args: &[&'a str], flag: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
        } else if *arg == flag {
            skip = true;
        } else {
            out.push(*arg);
        }
    }
    out
}
