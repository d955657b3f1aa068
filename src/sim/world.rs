//! Simulator-side game state.
//!
//! Unlike a [`Snapshot`], the `World` holds both players in absolute terms,
//! plus the hidden bookkeeping (build timers, cooldowns, respawn timers)
//! the engine uses to answer capability queries.

use rand::Rng;
use serde::Serialize;

use crate::world::{
    Castle, Creature, CreatureKind, Elf, Location, ObjectId, Owner, Portal, Side, Snapshot,
};

use super::rules::Rules;

/// One of the two seats in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    First,
    Second,
}

pub const ALL_PLAYERS: [Player; 2] = [Player::First, Player::Second];

impl Player {
    pub const fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    pub const fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::First => write!(f, "first"),
            Player::Second => write!(f, "second"),
        }
    }
}

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Winner(Player),
    Draw,
}

/// An elf with its engine-side timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimElf {
    pub id: ObjectId,
    pub location: Location,
    pub health: i32,
    /// Turns left on the portal under construction; zero when idle.
    pub building: u32,
    /// Set once the elf dies: turns until it respawns.
    pub respawn: Option<u32>,
}

impl SimElf {
    pub fn is_alive(&self) -> bool {
        self.health > 0 && self.respawn.is_none()
    }
}

/// A portal with its summon cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPortal {
    pub id: ObjectId,
    pub location: Location,
    pub health: i32,
    pub cooldown: u32,
}

/// Everything one player owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub castle_id: ObjectId,
    pub castle_location: Location,
    pub castle_health: i32,
    pub elves: Vec<SimElf>,
    pub portals: Vec<SimPortal>,
    pub creatures: Vec<Creature>,
    pub mana: i32,
    /// Where this player's elves appear.
    pub spawn: Location,
}

impl PlayerState {
    fn setup(rules: &Rules, home: Location, away: Location, next_id: &mut u32) -> Self {
        let mut alloc = || {
            let id = ObjectId(*next_id);
            *next_id += 1;
            id
        };
        let spawn = home
            .towards(away, rules.elf_spawn_offset)
            .clamp_to(rules.map_rows, rules.map_cols);
        let castle_id = alloc();
        let elves = (0..rules.elves_per_player)
            .map(|_| SimElf {
                id: alloc(),
                location: spawn,
                health: rules.elf_health,
                building: 0,
                respawn: None,
            })
            .collect();
        PlayerState {
            castle_id,
            castle_location: home,
            castle_health: rules.castle_health,
            elves,
            portals: Vec::new(),
            creatures: Vec::new(),
            mana: rules.initial_mana,
            spawn,
        }
    }
}

/// The full two-player game state.
#[derive(Debug, Clone)]
pub struct World {
    pub rules: Rules,
    pub turn: u32,
    pub players: [PlayerState; 2],
    next_id: u32,
}

impl World {
    /// Sets up castles and starting elves as described by `rules`.
    pub fn new(rules: Rules) -> Self {
        let mut next_id = 1u32;
        let [home, away] = rules.castles;
        let first = PlayerState::setup(&rules, home, away, &mut next_id);
        let second = PlayerState::setup(&rules, away, home, &mut next_id);
        World {
            rules,
            turn: 0,
            players: [first, second],
            next_id,
        }
    }

    /// Scatters every elf up to `amount` units around its current spot.
    pub fn jitter_elves<R: Rng>(&mut self, rng: &mut R, amount: i32) {
        if amount <= 0 {
            return;
        }
        let (rows, cols) = (self.rules.map_rows, self.rules.map_cols);
        for player in self.players.iter_mut() {
            for elf in player.elves.iter_mut() {
                let shifted = Location::new(
                    elf.location.row.saturating_add(rng.gen_range(-amount..=amount)),
                    elf.location.col.saturating_add(rng.gen_range(-amount..=amount)),
                );
                elf.location = shifted.clamp_to(rows, cols);
            }
        }
    }

    pub fn player(&self, player: Player) -> &PlayerState {
        &self.players[player.index()]
    }

    pub fn player_mut(&mut self, player: Player) -> &mut PlayerState {
        &mut self.players[player.index()]
    }

    pub(crate) fn alloc_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Whether a portal may be placed at `location`.
    ///
    /// Castles, standing portals and portals still under construction all
    /// keep `portal_spacing` clear around them.
    pub fn portal_site_free(&self, location: Location) -> bool {
        let spacing = self.rules.portal_spacing;
        self.players.iter().all(|p| {
            p.castle_location.distance(location) >= spacing
                && p.portals
                    .iter()
                    .all(|portal| portal.location.distance(location) >= spacing)
                && p.elves
                    .iter()
                    .filter(|elf| elf.is_alive() && elf.building > 0)
                    .all(|elf| elf.location.distance(location) >= spacing)
        })
    }

    /// Whether `player`'s elf could start a portal right now.
    pub fn can_build_portal(&self, player: Player, elf: &SimElf) -> bool {
        elf.is_alive()
            && elf.building == 0
            && self.player(player).mana >= self.rules.portal_cost
            && self.portal_site_free(elf.location)
    }

    /// Whether `player`'s portal could summon `kind` right now.
    pub fn can_summon(&self, player: Player, portal: &SimPortal, kind: CreatureKind) -> bool {
        portal.cooldown == 0 && self.player(player).mana >= self.rules.creature(kind).cost
    }

    /// The game as `player` sees it.
    pub fn snapshot_for(&self, player: Player) -> Snapshot {
        Snapshot::new(
            self.turn,
            self.side(player, Owner::Me),
            self.side(player.opponent(), Owner::Enemy),
        )
    }

    fn side(&self, player: Player, owner: Owner) -> Side {
        let state = self.player(player);
        let mut side = Side::new(Castle {
            id: state.castle_id,
            owner,
            location: state.castle_location,
            health: state.castle_health,
        });
        side.mana = state.mana;
        side.elves = state
            .elves
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| Elf {
                id: e.id,
                owner,
                location: e.location,
                health: e.health,
                attack_range: self.rules.elf_attack_range,
                is_building: e.building > 0,
                can_build_portal: self.can_build_portal(player, e),
            })
            .collect();
        side.portals = state
            .portals
            .iter()
            .map(|p| Portal {
                id: p.id,
                owner,
                location: p.location,
                health: p.health,
                can_summon_lava_giant: self.can_summon(player, p, CreatureKind::LavaGiant),
                can_summon_ice_troll: self.can_summon(player, p, CreatureKind::IceTroll),
            })
            .collect();
        side.creatures = state
            .creatures
            .iter()
            .map(|c| Creature { owner, ..*c })
            .collect();
        side
    }

    /// The result of the match so far, if it is over.
    pub fn outcome(&self) -> Option<Outcome> {
        let first = self.players[0].castle_health;
        let second = self.players[1].castle_health;
        match (first <= 0, second <= 0) {
            (true, true) => return Some(Outcome::Draw),
            (true, false) => return Some(Outcome::Winner(Player::Second)),
            (false, true) => return Some(Outcome::Winner(Player::First)),
            (false, false) => {}
        }
        if self.turn >= self.rules.max_turns {
            return Some(match first.cmp(&second) {
                std::cmp::Ordering::Greater => Outcome::Winner(Player::First),
                std::cmp::Ordering::Less => Outcome::Winner(Player::Second),
                std::cmp::Ordering::Equal => Outcome::Draw,
            });
        }
        None
    }
}
