//! Local match simulator.
//!
//! A small deterministic stand-in for the game engine: it hands each player
//! a snapshot, resolves the commands that come back, and runs the engine's
//! own end-of-turn processing.

pub mod phase;
pub mod resolve;
pub mod rules;
pub mod world;

pub use phase::advance_turn;
pub use resolve::{resolve_commands, CommandError, CommandResult};
pub use rules::{CreatureRules, Rules};
pub use world::{Outcome, Player, PlayerState, SimElf, SimPortal, World, ALL_PLAYERS};

use crate::api::OrderBook;
use crate::strategy::{TurnReport, TurnStrategy};
use crate::world::Command;

/// Asks `strategy` for `player`'s commands this turn.
pub fn decide(
    world: &World,
    player: Player,
    strategy: &TurnStrategy,
) -> (TurnReport, Vec<Command>) {
    let snapshot = world.snapshot_for(player);
    let mut book = OrderBook::new(&snapshot);
    let report = match strategy.run_turn(&mut book) {
        Ok(report) => report,
        Err(never) => match never {},
    };
    (report, book.into_commands())
}

/// Plays one full turn: resolves the first player's commands, then the
/// second's, then advances the world.
pub fn step(world: &mut World, orders: [&[Command]; 2]) -> [Vec<CommandResult>; 2] {
    let first = resolve_commands(world, Player::First, orders[0]);
    let second = resolve_commands(world, Player::Second, orders[1]);
    advance_turn(world);
    [first, second]
}
