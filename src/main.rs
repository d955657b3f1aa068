//! elfbot: an Elf Kingdom turn bot speaking a line protocol.
//!
//! Reads requests from stdin and writes responses to stdout. Logs go to
//! stderr and are controlled by `RUST_LOG`.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use elfbot::config::BotConfig;
use elfbot::engine::Engine;
use elfbot::protocol::{parse_command, Request};

/// Elf Kingdom turn bot
#[derive(Parser, Debug)]
#[command(name = "elfbot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file with strategy and rules sections
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    pretty_env_logger::init_timed();
    let args = Args::parse();

    let config = match BotConfig::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(Engine::new(config.strategy)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("i/o error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs the protocol loop until `quit` or end of input.
fn run(mut engine: Engine) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let Some(request) = parse_command(&line?) else {
            continue;
        };

        match request {
            Request::IsReady => engine.handle_isready(&mut out)?,
            Request::SetOption { name, value } => engine.set_option(name, value),
            Request::NewGame => engine.new_game(),
            Request::Turn { json } => engine.handle_turn(&json, &mut out)?,
            Request::Quit => break,
        }
    }
    info!("session over after {} turns", engine.turns_played);
    Ok(())
}
