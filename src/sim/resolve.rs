//! Command resolution.
//!
//! Validates one player's commands against the world and applies the legal
//! ones in the order they were issued. Mana is spent as commands resolve, so
//! a later summon can fail because an earlier one used the mana up.

use std::collections::HashSet;

use log::warn;

use crate::world::{Command, Creature, CreatureKind, Location, ObjectId, Owner};

use super::world::{Player, PlayerState, SimElf, World};

/// Why the engine refused a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{0} is not a living unit of this player")]
    UnknownUnit(ObjectId),

    #[error("{0} already acted this turn")]
    AlreadyActed(ObjectId),

    #[error("{0} is busy building a portal")]
    Busy(ObjectId),

    #[error("target {0} does not exist")]
    UnknownTarget(ObjectId),

    #[error("{unit} cannot reach {target}: distance {distance} exceeds range {range}")]
    OutOfRange {
        unit: ObjectId,
        target: ObjectId,
        distance: i32,
        range: i32,
    },

    #[error("not enough mana: need {needed}, have {available}")]
    NotEnoughMana { needed: i32, available: i32 },

    #[error("{0} is too close to another building to start a portal")]
    TooCrowded(ObjectId),

    #[error("{0} is still cooling down ({1} turns left)")]
    CoolingDown(ObjectId, u32),
}

/// The result of resolving a single command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub command: Command,
    pub result: Result<(), CommandError>,
}

impl CommandResult {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Resolves `player`'s commands in order, applying every legal one.
pub fn resolve_commands(
    world: &mut World,
    player: Player,
    commands: &[Command],
) -> Vec<CommandResult> {
    let mut acted = HashSet::new();
    commands
        .iter()
        .map(|command| {
            let result = apply_command(world, player, command, &mut acted);
            if let Err(e) = &result {
                warn!("turn {}: {} player: rejected '{}': {}", world.turn, player, command, e);
            }
            CommandResult {
                command: *command,
                result,
            }
        })
        .collect()
}

fn apply_command(
    world: &mut World,
    player: Player,
    command: &Command,
    acted: &mut HashSet<ObjectId>,
) -> Result<(), CommandError> {
    let actor = command.actor();
    if acted.contains(&actor) {
        return Err(CommandError::AlreadyActed(actor));
    }

    match *command {
        Command::Attack { elf, target } => {
            let unit = ready_elf(world, player, elf)?;
            let foe = player.opponent();
            let target_at = target_location(world.player(foe), target.id)
                .ok_or(CommandError::UnknownTarget(target.id))?;
            let distance = unit.location.distance(target_at);
            let range = world.rules.elf_attack_range;
            if distance > range {
                return Err(CommandError::OutOfRange {
                    unit: elf,
                    target: target.id,
                    distance,
                    range,
                });
            }
            let amount = world.rules.elf_attack_damage;
            damage(world.player_mut(foe), target.id, amount);
        }
        Command::MoveTo { elf, dest } => {
            let unit = ready_elf(world, player, elf)?;
            let next = unit
                .location
                .towards(dest, world.rules.elf_speed)
                .clamp_to(world.rules.map_rows, world.rules.map_cols);
            set_elf(world.player_mut(player), elf, |e| e.location = next);
        }
        Command::BuildPortal { elf } => {
            let unit = ready_elf(world, player, elf)?;
            let needed = world.rules.portal_cost;
            let available = world.player(player).mana;
            if available < needed {
                return Err(CommandError::NotEnoughMana { needed, available });
            }
            if !world.portal_site_free(unit.location) {
                return Err(CommandError::TooCrowded(elf));
            }
            let turns = world.rules.portal_build_turns.max(1);
            let state = world.player_mut(player);
            state.mana -= needed;
            set_elf(state, elf, |e| e.building = turns);
        }
        Command::SummonLavaGiant { portal } => {
            summon(world, player, portal, CreatureKind::LavaGiant)?
        }
        Command::SummonIceTroll { portal } => {
            summon(world, player, portal, CreatureKind::IceTroll)?
        }
    }

    acted.insert(actor);
    Ok(())
}

/// A living, non-building elf of `player`.
fn ready_elf(world: &World, player: Player, id: ObjectId) -> Result<SimElf, CommandError> {
    let elf = world
        .player(player)
        .elves
        .iter()
        .find(|e| e.id == id && e.is_alive())
        .copied()
        .ok_or(CommandError::UnknownUnit(id))?;
    if elf.building > 0 {
        return Err(CommandError::Busy(id));
    }
    Ok(elf)
}

fn set_elf(state: &mut PlayerState, id: ObjectId, update: impl FnOnce(&mut SimElf)) {
    if let Some(elf) = state.elves.iter_mut().find(|e| e.id == id) {
        update(elf);
    }
}

fn summon(
    world: &mut World,
    player: Player,
    id: ObjectId,
    kind: CreatureKind,
) -> Result<(), CommandError> {
    let portal = world
        .player(player)
        .portals
        .iter()
        .find(|p| p.id == id && p.health > 0)
        .copied()
        .ok_or(CommandError::UnknownUnit(id))?;
    if portal.cooldown > 0 {
        return Err(CommandError::CoolingDown(id, portal.cooldown));
    }
    let rules = *world.rules.creature(kind);
    let available = world.player(player).mana;
    if available < rules.cost {
        return Err(CommandError::NotEnoughMana {
            needed: rules.cost,
            available,
        });
    }

    let creature = Creature {
        id: world.alloc_id(),
        owner: Owner::Me,
        kind,
        location: portal.location,
        health: rules.health,
    };
    let cooldown = world.rules.summon_cooldown;
    let state = world.player_mut(player);
    state.mana -= rules.cost;
    state.creatures.push(creature);
    if let Some(p) = state.portals.iter_mut().find(|p| p.id == id) {
        p.cooldown = cooldown;
    }
    Ok(())
}

/// Where a living object of `state` currently stands.
pub(crate) fn target_location(state: &PlayerState, id: ObjectId) -> Option<Location> {
    if state.castle_id == id {
        return (state.castle_health > 0).then_some(state.castle_location);
    }
    state
        .elves
        .iter()
        .find(|e| e.id == id && e.is_alive())
        .map(|e| e.location)
        .or_else(|| {
            state
                .portals
                .iter()
                .find(|p| p.id == id && p.health > 0)
                .map(|p| p.location)
        })
        .or_else(|| {
            state
                .creatures
                .iter()
                .find(|c| c.id == id && c.health > 0)
                .map(|c| c.location)
        })
}

/// Subtracts `amount` health from the object `id` of `state`.
pub(crate) fn damage(state: &mut PlayerState, id: ObjectId, amount: i32) {
    if state.castle_id == id {
        state.castle_health -= amount;
    } else if let Some(elf) = state.elves.iter_mut().find(|e| e.id == id) {
        elf.health -= amount;
    } else if let Some(portal) = state.portals.iter_mut().find(|p| p.id == id) {
        portal.health -= amount;
    } else if let Some(creature) = state.creatures.iter_mut().find(|c| c.id == id) {
        creature.health -= amount;
    }
}
