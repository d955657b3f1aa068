//! Self-play match generation.
//!
//! Plays full matches in the local simulator with a strategy on each side,
//! starting from jittered elf positions. Records the outcome and command
//! statistics per match for comparing strategy configurations.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::sim::{self, CommandResult, Outcome, Player, Rules, World, ALL_PLAYERS};
use crate::strategy::TurnStrategy;
use crate::world::Command;

#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("self-play worker thread panicked")]
    WorkerPanicked,
}

/// Configuration for self-play generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of matches to play.
    pub num_games: usize,
    /// Number of parallel threads for concurrent matches.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Overrides the rules' turn limit when set.
    pub max_turns: Option<u32>,
    /// Maximum offset applied to each elf's starting position.
    pub jitter: i32,
    /// Suppress per-match progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            threads: 4,
            seed: 0,
            max_turns: None,
            jitter: 200,
            quiet: false,
        }
    }
}

/// Per-player command statistics for one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommandStats {
    pub issued: usize,
    pub rejected: usize,
    pub portals_started: usize,
    pub summons: usize,
}

impl CommandStats {
    fn tally(&mut self, results: &[CommandResult]) {
        for result in results {
            self.issued += 1;
            if !result.succeeded() {
                self.rejected += 1;
                continue;
            }
            match result.command {
                Command::BuildPortal { .. } => self.portals_started += 1,
                cmd if cmd.is_summon() => self.summons += 1,
                _ => {}
            }
        }
    }
}

/// A completed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub game_id: usize,
    pub outcome: Outcome,
    pub turns: u32,
    /// Castle health at the end, first player then second.
    pub castle_health: [i32; 2],
    pub commands: [CommandStats; 2],
}

impl MatchRecord {
    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Outcome::Winner(player) => Some(player),
            Outcome::Draw => None,
        }
    }
}

/// Plays one match between `strategies[0]` (first) and `strategies[1]`
/// (second) until the world reports an outcome.
pub fn play_match<R: Rng>(
    config: &SelfPlayConfig,
    rules: &Rules,
    strategies: &[TurnStrategy; 2],
    game_id: usize,
    rng: &mut R,
) -> MatchRecord {
    let mut rules = rules.clone();
    if let Some(max_turns) = config.max_turns {
        rules.max_turns = max_turns;
    }
    let mut world = World::new(rules);
    world.jitter_elves(rng, config.jitter);

    let mut commands = [CommandStats::default(); 2];
    let outcome = loop {
        if let Some(outcome) = world.outcome() {
            break outcome;
        }
        let (_, first) = sim::decide(&world, Player::First, &strategies[0]);
        let (_, second) = sim::decide(&world, Player::Second, &strategies[1]);
        let results = sim::step(&mut world, [&first, &second]);
        for player in ALL_PLAYERS {
            commands[player.index()].tally(&results[player.index()]);
        }
    };

    MatchRecord {
        game_id,
        outcome,
        turns: world.turn,
        castle_health: [world.players[0].castle_health, world.players[1].castle_health],
        commands,
    }
}

fn outcome_text(record: &MatchRecord) -> String {
    match record.winner() {
        Some(player) => format!("{} wins", player),
        None => "draw".to_string(),
    }
}

fn seeded_rng(seed: u64, offset: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(offset as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Runs self-play, producing one record per match.
///
/// When `config.threads > 1`, matches are played concurrently using rayon.
pub fn run_self_play(
    config: &SelfPlayConfig,
    rules: &Rules,
    strategies: &[TurnStrategy; 2],
) -> Result<Vec<MatchRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, rules, strategies, |game| games.push(game))?;
    Ok(games)
}

/// Runs self-play, calling `on_game` with each completed match.
pub fn run_self_play_with_callback<F>(
    config: &SelfPlayConfig,
    rules: &Rules,
    strategies: &[TurnStrategy; 2],
    on_game: F,
) -> Result<(), SelfPlayError>
where
    F: FnMut(MatchRecord) + Send,
{
    if config.threads > 1 {
        run_self_play_parallel(config, rules, strategies, on_game)
    } else {
        run_self_play_sequential(config, rules, strategies, on_game);
        Ok(())
    }
}

/// Sequential self-play: one match at a time, each seeded from `seed + i`.
fn run_self_play_sequential<F>(
    config: &SelfPlayConfig,
    rules: &Rules,
    strategies: &[TurnStrategy; 2],
    mut on_game: F,
) where
    F: FnMut(MatchRecord),
{
    for i in 0..config.num_games {
        let mut rng = seeded_rng(config.seed, i);
        let game_start = Instant::now();
        let game = play_match(config, rules, strategies, i, &mut rng);
        if !config.quiet {
            info!(
                "Game {}/{}: {} after {} turns ({:.2}s)",
                i + 1,
                config.num_games,
                outcome_text(&game),
                game.turns,
                game_start.elapsed().as_secs_f64(),
            );
        }
        on_game(game);
    }
}

/// Parallel self-play on a rayon pool. Completed matches reach the callback
/// on the calling thread through a channel.
fn run_self_play_parallel<F>(
    config: &SelfPlayConfig,
    rules: &Rules,
    strategies: &[TurnStrategy; 2],
    mut on_game: F,
) -> Result<(), SelfPlayError>
where
    F: FnMut(MatchRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<MatchRecord>();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let config = config.clone();
    let rules = rules.clone();
    let strategies = strategies.clone();
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..config.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let mut rng = seeded_rng(config.seed, i);
                    let game_start = Instant::now();
                    let game = play_match(&config, &rules, &strategies, i, &mut rng);
                    if !config.quiet {
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        info!(
                            "Game {}/{}: {} after {} turns ({:.2}s)",
                            n,
                            config.num_games,
                            outcome_text(&game),
                            game.turns,
                            game_start.elapsed().as_secs_f64(),
                        );
                    }
                    let _ = tx.send(game);
                });
        });
    });

    for game in rx {
        on_game(game);
    }

    handle.join().map_err(|_| SelfPlayError::WorkerPanicked)
}

/// Writes match records as JSONL (one JSON object per match, one per line).
pub fn write_jsonl<W: Write>(games: &[MatchRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Logs a summary of self-play results.
pub fn print_summary(games: &[MatchRecord]) {
    let total = games.len().max(1) as f64;
    let mut wins = [0usize; 2];
    let mut draws = 0usize;
    let mut turns = 0u64;
    let mut rejected = 0usize;
    for game in games {
        match game.winner() {
            Some(player) => wins[player.index()] += 1,
            None => draws += 1,
        }
        turns += u64::from(game.turns);
        rejected += game.commands.iter().map(|c| c.rejected).sum::<usize>();
    }

    info!("=== Self-Play Summary ===");
    info!("Games: {}", games.len());
    info!("Avg turns/game: {:.1}", turns as f64 / total);
    info!("Rejected commands: {}", rejected);
    for player in ALL_PLAYERS {
        let n = wins[player.index()];
        info!("  {:>6} wins: {} ({:.1}%)", player, n, 100.0 * n as f64 / total);
    }
    info!("  {:>6}: {} ({:.1}%)", "draws", draws, 100.0 * draws as f64 / total);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config(num_games: usize, threads: usize, seed: u64) -> SelfPlayConfig {
        SelfPlayConfig {
            num_games,
            threads,
            seed,
            max_turns: Some(80),
            quiet: true,
            ..Default::default()
        }
    }

    fn strategies() -> [TurnStrategy; 2] {
        [TurnStrategy::default(), TurnStrategy::default()]
    }

    #[test]
    fn play_single_match_completes() {
        let config = short_config(1, 1, 42);
        let mut rng = SmallRng::seed_from_u64(42);
        let game = play_match(&config, &Rules::default(), &strategies(), 0, &mut rng);
        assert!(game.turns <= 80, "match ran past the limit: {}", game.turns);
        assert!(game.commands.iter().all(|c| c.issued > 0));
    }

    #[test]
    fn same_seed_same_match() {
        let config = short_config(1, 1, 9);
        let rules = Rules::default();
        let a = play_match(&config, &rules, &strategies(), 0, &mut SmallRng::seed_from_u64(9));
        let b = play_match(&config, &rules, &strategies(), 0, &mut SmallRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_turn_limit_is_an_immediate_draw() {
        let config = SelfPlayConfig {
            max_turns: Some(0),
            ..short_config(1, 1, 1)
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let game = play_match(&config, &Rules::default(), &strategies(), 0, &mut rng);
        assert_eq!(game.outcome, Outcome::Draw);
        assert_eq!(game.turns, 0);
        assert_eq!(game.commands, [CommandStats::default(); 2]);
    }

    #[test]
    fn sequential_run_produces_correct_count() {
        let config = short_config(3, 1, 99);
        let games = run_self_play(&config, &Rules::default(), &strategies()).unwrap();
        assert_eq!(games.len(), 3);
        let ids: Vec<usize> = games.iter().map(|g| g.game_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn parallel_run_produces_correct_count() {
        let config = short_config(4, 2, 77);
        let games = run_self_play(&config, &Rules::default(), &strategies()).unwrap();
        assert_eq!(games.len(), 4);
        let mut ids: Vec<usize> = games.iter().map(|g| g.game_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn parallel_matches_equal_sequential_ones() {
        let rules = Rules::default();
        let mut sequential = run_self_play(&short_config(3, 1, 5), &rules, &strategies()).unwrap();
        let mut parallel = run_self_play(&short_config(3, 3, 5), &rules, &strategies()).unwrap();
        sequential.sort_by_key(|g| g.game_id);
        parallel.sort_by_key(|g| g.game_id);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn jsonl_output_is_valid() {
        let config = short_config(2, 1, 3);
        let games = run_self_play(&config, &Rules::default(), &strategies()).unwrap();
        let mut buf = Vec::new();
        write_jsonl(&games, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("outcome").is_some());
            assert_eq!(value["castle_health"].as_array().map(Vec::len), Some(2));
            assert!(value["commands"][0]["issued"].is_u64());
        }
    }
}
