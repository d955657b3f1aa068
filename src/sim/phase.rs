//! End-of-turn processing.
//!
//! After both players' commands are resolved the engine runs its own
//! bookkeeping: creatures act, portal builds progress, creatures decay, the
//! dead are cleared (elves start their respawn timer), and mana and
//! cooldowns tick.

use crate::world::{CreatureKind, Location, ObjectId};

use super::resolve::damage;
use super::world::{Player, SimPortal, World, ALL_PLAYERS};

/// What one creature does this turn, planned against the pre-turn state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Strike {
        owner: Player,
        target: ObjectId,
        amount: i32,
    },
    Step {
        owner: Player,
        creature: ObjectId,
        to: Location,
    },
}

/// Runs end-of-turn processing and advances the turn counter.
pub fn advance_turn(world: &mut World) {
    act_creatures(world);
    progress_builds(world);
    decay_creatures(world);
    remove_dead(world);
    collect_income(world);
    world.turn += 1;
}

/// Lava giants march on the enemy castle; ice trolls hunt the nearest enemy
/// elf or creature. All creatures act simultaneously.
fn act_creatures(world: &mut World) {
    let mut intents = Vec::new();
    for player in ALL_PLAYERS {
        let mine = world.player(player);
        let foe = world.player(player.opponent());
        for creature in mine.creatures.iter().filter(|c| c.health > 0) {
            let rules = world.rules.creature(creature.kind);
            let target = match creature.kind {
                CreatureKind::LavaGiant => Some((foe.castle_id, foe.castle_location)),
                CreatureKind::IceTroll => {
                    let elves = foe
                        .elves
                        .iter()
                        .filter(|e| e.is_alive())
                        .map(|e| (e.id, e.location));
                    let creatures = foe
                        .creatures
                        .iter()
                        .filter(|c| c.health > 0)
                        .map(|c| (c.id, c.location));
                    elves
                        .chain(creatures)
                        .min_by_key(|(_, at)| creature.location.distance(*at))
                }
            };
            let Some((target, at)) = target else {
                continue;
            };
            if creature.location.distance(at) <= rules.attack_range {
                intents.push(Intent::Strike {
                    owner: player,
                    target,
                    amount: rules.attack_damage,
                });
            } else {
                intents.push(Intent::Step {
                    owner: player,
                    creature: creature.id,
                    to: creature
                        .location
                        .towards(at, rules.speed)
                        .clamp_to(world.rules.map_rows, world.rules.map_cols),
                });
            }
        }
    }

    for intent in intents {
        match intent {
            Intent::Strike {
                owner,
                target,
                amount,
            } => damage(world.player_mut(owner.opponent()), target, amount),
            Intent::Step {
                owner,
                creature,
                to,
            } => {
                if let Some(c) = world
                    .player_mut(owner)
                    .creatures
                    .iter_mut()
                    .find(|c| c.id == creature)
                {
                    c.location = to;
                }
            }
        }
    }
}

/// Counts down portal builds; a finished build becomes a portal where the
/// elf stands.
fn progress_builds(world: &mut World) {
    for player in ALL_PLAYERS {
        let finished: Vec<Location> = world
            .player_mut(player)
            .elves
            .iter_mut()
            .filter(|e| e.is_alive() && e.building > 0)
            .filter_map(|e| {
                e.building -= 1;
                (e.building == 0).then_some(e.location)
            })
            .collect();
        for location in finished {
            let portal = SimPortal {
                id: world.alloc_id(),
                location,
                health: world.rules.portal_health,
                cooldown: 0,
            };
            world.player_mut(player).portals.push(portal);
        }
    }
}

fn decay_creatures(world: &mut World) {
    let (giant, troll) = (world.rules.lava_giant.decay, world.rules.ice_troll.decay);
    for state in world.players.iter_mut() {
        for creature in state.creatures.iter_mut() {
            creature.health -= match creature.kind {
                CreatureKind::LavaGiant => giant,
                CreatureKind::IceTroll => troll,
            };
        }
    }
}

fn remove_dead(world: &mut World) {
    let respawn_turns = world.rules.elf_respawn_turns;
    let elf_health = world.rules.elf_health;
    for state in world.players.iter_mut() {
        state.creatures.retain(|c| c.health > 0);
        state.portals.retain(|p| p.health > 0);
        let spawn = state.spawn;
        for elf in state.elves.iter_mut() {
            match elf.respawn {
                None if elf.health <= 0 => {
                    elf.respawn = Some(respawn_turns);
                    elf.building = 0;
                }
                None => {}
                Some(left) if left <= 1 => {
                    elf.respawn = None;
                    elf.health = elf_health;
                    elf.location = spawn;
                }
                Some(left) => elf.respawn = Some(left - 1),
            }
        }
    }
}

fn collect_income(world: &mut World) {
    let income = world.rules.mana_per_turn;
    for state in world.players.iter_mut() {
        state.mana += income;
        for portal in state.portals.iter_mut() {
            portal.cooldown = portal.cooldown.saturating_sub(1);
        }
    }
}
