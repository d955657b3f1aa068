//! Self-play match generation CLI.
//!
//! Plays simulated matches between two strategy configurations and writes
//! one JSON record per match.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- --games 100 --threads 8 --output runs.jsonl

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info};

use elfbot::config::BotConfig;
use elfbot::selfplay::{self, SelfPlayConfig};
use elfbot::strategy::TurnStrategy;

/// Play simulated Elf Kingdom matches
#[derive(Parser, Debug)]
#[command(name = "selfplay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of matches to play
    #[arg(short, long, default_value = "10")]
    games: usize,

    /// Number of parallel threads
    #[arg(short, long, default_value = "4")]
    threads: usize,

    /// Random seed, 0 for entropy
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Override the rules' turn limit
    #[arg(long)]
    max_turns: Option<u32>,

    /// Maximum random offset of each elf's starting position
    #[arg(long, default_value = "200")]
    jitter: i32,

    /// Config for both players (strategy and rules)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Strategy config for the second player; defaults to --config
    #[arg(long)]
    opponent: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suppress per-match progress and summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    pretty_env_logger::init_timed();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = BotConfig::load_or_default(args.config.as_deref())?;
    let opponent = match args.opponent.as_deref() {
        Some(path) => BotConfig::load(path)?.strategy,
        None => config.strategy,
    };
    let strategies = [TurnStrategy::new(config.strategy), TurnStrategy::new(opponent)];

    let selfplay_config = SelfPlayConfig {
        num_games: args.games,
        threads: args.threads,
        seed: args.seed,
        max_turns: args.max_turns,
        jitter: args.jitter,
        quiet: args.quiet,
    };

    if !args.quiet {
        info!(
            "Self-play: {} games, {} threads, seed {}, jitter {}",
            selfplay_config.num_games,
            selfplay_config.threads,
            selfplay_config.seed,
            selfplay_config.jitter
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&selfplay_config, &config.rules, &strategies)?;
    let elapsed = start.elapsed();

    if !args.quiet {
        info!(
            "Completed {} games in {:.1}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        selfplay::print_summary(&games);
    }

    match args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(&path)?);
            selfplay::write_jsonl(&games, &mut writer)?;
            if !args.quiet {
                info!("Wrote {} games to {}", games.len(), path.display());
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(&games, &mut writer)?;
        }
    }
    Ok(())
}
