//! Host command parser.
//!
//! Parses incoming protocol lines into structured `Request` variants that
//! the main loop can dispatch on.

use log::warn;

/// A parsed host-to-bot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Synchronization ping; the bot must reply `readyok`.
    IsReady,

    /// Set a strategy option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Reset session state for a new game.
    NewGame,

    /// Decide one turn. Carries everything after `turn`, which should be a
    /// JSON snapshot.
    Turn { json: String },

    /// Terminate the bot process.
    Quit,
}

/// Parses a single line of input into a `Request`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Request> {
    let trimmed = line.trim();
    let mut tokens = trimmed.split_whitespace();
    let head = tokens.next()?;

    match head {
        "isready" => Some(Request::IsReady),
        "quit" => Some(Request::Quit),
        "newgame" => Some(Request::NewGame),

        "setoption" => parse_setoption(&tokens.collect::<Vec<_>>()),
        "turn" => Some(Request::Turn {
            json: trimmed[head.len()..].trim().to_string(),
        }),

        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

/// Parses the arguments of `setoption name <id> [value <x>]`.
fn parse_setoption(args: &[&str]) -> Option<Request> {
    if args.len() < 2 || args[0] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let (name_parts, value_parts) = match args.iter().position(|&t| t == "value") {
        Some(vi) => (&args[1..vi], Some(&args[vi + 1..])),
        None => (&args[1..], None),
    };
    if name_parts.is_empty() {
        warn!("malformed setoption: empty name");
        return None;
    }

    let value = value_parts
        .filter(|parts| !parts.is_empty())
        .map(|parts| parts.join(" "));
    Some(Request::SetOption {
        name: name_parts.join(" "),
        value,
    })
}
