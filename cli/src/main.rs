//! Tracktree CLI — a line-oriented shell around one in-memory session.

mod parse;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;
use tracktree_core::command::Command;
use tracktree_core::response::Response;
use tracktree_core::sys::Sys;
use tracktree_core::types::config::Settings;

use parse::{Invocation, Request};


fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let mut arg_refs: Vec<&str> = args[1..].iter().map(|s| s.as_str()).collect();
    let import_path = take_flag(&mut arg_refs, "--import");

    let settings = load_settings(&resolve_config_dir());
    let mut sys = Sys::new(settings);

    if let Some(path) = import_path {
        if let Err(e) = run(&mut sys, Request::ImportFile(path), true, &mut |_| false) {
            eprintln!("tracktree error: {}", e);
            process::exit(1);
        }
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    if !arg_refs.is_empty() {
        let inv = match parse::parse_args(&arg_refs) {
            Ok(inv) => inv,
            Err(e) => {
                eprintln!("tracktree: {}", e);
                process::exit(1);
            }
        };
        let mut confirm = |prompt: &str| ask(prompt, &mut lines);
        match run(&mut sys, inv.request, inv.assume_yes, &mut confirm) {
            Ok(output) => print_output(&output),
            Err(e) => {
                eprintln!("tracktree error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    while let Some(line) = lines.next() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("tracktree: failed to read input: {}", e);
                process::exit(1);
            }
        };
        let inv = match parse::parse_line(&line) {
            Ok(Some(inv)) => inv,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("tracktree: {}", e);
                continue;
            }
        };
        let Invocation { request, assume_yes } = inv;
        if request == Request::Quit {
            break;
        }
        let mut confirm = |prompt: &str| ask(prompt, &mut lines);
        match run(&mut sys, request, assume_yes, &mut confirm) {
            Ok(output) => print_output(&output),
            Err(e) => eprintln!("tracktree error: {}", e),
        }
    }
}


/// Execute one request against the session. Destructive commands go through
/// `confirm` unless `assume_yes` is set.
fn run(
    sys: &mut Sys,
    request: Request,
    assume_yes: bool,
    confirm: &mut dyn FnMut(&str) -> bool,
) -> Result<String, String> {
    let cmd = match request {
        Request::Core(cmd) => cmd,
        Request::ImportFile(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
            Command::Import { text }
        }
        Request::ExportFile(path) => {
            let text = into_result(sys.execute(Command::Export))?;
            std::fs::write(&path, text)
                .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
            return Ok(format!("Exported to {}", path));
        }
        Request::Quit => return Ok(String::new()),
    };

    if cmd.is_destructive() && !assume_yes {
        let prompt = match &cmd {
            Command::TrackDelete { id } => format!(
                "Delete track '{}'? This will remove it from all nodes. [y/N] ",
                id
            ),
            Command::NodeDelete { id } => format!("Delete node '{}' and everything under it? [y/N] ", id),
            _ => "Are you sure? [y/N] ".to_string(),
        };
        if !confirm(&prompt) {
            return Ok("Cancelled".into());
        }
    }

    into_result(sys.execute(cmd))
}


fn into_result(resp: Response) -> Result<String, String> {
    match resp {
        Response::Ok { output } => Ok(output),
        Response::Error { message } => Err(message),
    }
}


fn print_output(output: &str) {
    if !output.is_empty() {
        println!("{}", output);
    }
}


/// Prompt on stderr and read a yes/no answer from the next input line.
fn ask<B: BufRead>(prompt: &str, lines: &mut io::Lines<B>) -> bool {
    eprint!("{}", prompt);
    let _ = io::stderr().flush();
    match lines.next() {
        Some(Ok(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        _ => false,
    }
}


/// Remove `flag` and its value from `args`, returning the value.
fn take_flag(args: &mut Vec<&str>, flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| *a == flag)?;
    args.remove(pos);
    if pos < args.len() {
        Some(args.remove(pos).to_string())
    } else {
        None
    }
}


fn init_tracing() {
    let filter = EnvFilter::try_from_env("TRACKTREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}


fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TRACKTREE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".config").join("tracktree")
}


fn load_settings(config_dir: &std::path::Path) -> Settings {
    let path = config_dir.join("config.yaml");
    match Settings::from_file(&path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("tracktree: {} ({}); using defaults", e, path.display());
            Settings::default()
        }
    }
}
