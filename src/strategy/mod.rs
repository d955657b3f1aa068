//! Per-turn decision logic.
//!
//! `TurnStrategy` ranks the player's elves and portals by distance to the
//! enemy castle, assigns each a role, and issues that role's commands. It
//! holds only immutable configuration: every turn is decided from the fresh
//! snapshot alone.

pub mod elves;
pub mod portals;
pub mod roles;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::api::Game;
use crate::world::{AsObject, ObjectId};

pub use roles::{assign_roles, Role};

/// Distance from the enemy castle inside which an offensive elf builds.
pub const DEFAULT_PORTAL_BUILD_RADIUS: i32 = 3000;
/// Distance from my castle inside which enemies trigger ice trolls.
pub const DEFAULT_THREAT_RADIUS: i32 = 3000;
/// Ice trolls kept before defensive portals stop summoning.
pub const DEFAULT_ICE_TROLL_GARRISON: usize = 10;

/// Tunable strategy constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub portal_build_radius: i32,
    pub threat_radius: i32,
    pub ice_troll_garrison: usize,
    /// Role for elves and portals ranked past the second.
    pub reserve_role: Role,
    /// Most portals of mine, built or under way, allowed within
    /// `portal_build_radius` of the enemy castle.
    pub max_attacking_portals: Option<usize>,
    /// Mana offensive portals leave alone while the attacking elf waits
    /// inside the build radius for a portal it cannot start yet.
    pub mana_reserve: i32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            portal_build_radius: DEFAULT_PORTAL_BUILD_RADIUS,
            threat_radius: DEFAULT_THREAT_RADIUS,
            ice_troll_garrison: DEFAULT_ICE_TROLL_GARRISON,
            reserve_role: Role::Idle,
            max_attacking_portals: None,
            mana_reserve: 0,
        }
    }
}

/// Roles handed out during one turn, in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub elves: Vec<(ObjectId, Role)>,
    pub portals: Vec<(ObjectId, Role)>,
    /// Mana held back from lava giants this turn.
    pub mana_reserved: i32,
}

impl TurnReport {
    /// The role given to a unit this turn, if it was ranked.
    pub fn role_of(&self, id: ObjectId) -> Option<Role> {
        self.elves
            .iter()
            .chain(self.portals.iter())
            .find(|(unit, _)| *unit == id)
            .map(|(_, role)| *role)
    }
}

/// The turn-by-turn bot.
#[derive(Debug, Clone, Default)]
pub struct TurnStrategy {
    config: StrategyConfig,
}

impl TurnStrategy {
    pub fn new(config: StrategyConfig) -> Self {
        TurnStrategy { config }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Decides and issues this turn's commands: elves first, then portals.
    ///
    /// Errors from the command sink are passed through untouched.
    pub fn run_turn<G: Game + ?Sized>(&self, game: &mut G) -> Result<TurnReport, G::Error> {
        let (elves, saving) = self.handle_elves(game)?;
        let mana_reserved = if saving { self.config.mana_reserve } else { 0 };
        let portals = self.handle_portals(game, mana_reserved)?;
        Ok(TurnReport {
            elves,
            portals,
            mana_reserved,
        })
    }

    /// Returns the elf roles and whether the attacker is saving for a portal.
    fn handle_elves<G: Game + ?Sized>(
        &self,
        game: &mut G,
    ) -> Result<(Vec<(ObjectId, Role)>, bool), G::Error> {
        let castle = game.enemy_castle().object();
        let ranked = assign_roles(
            game.my_living_elves(),
            |elf| game.distance(&elf.object(), &castle),
            self.config.reserve_role,
        );

        // Defenders act before the attacker.
        let mut saving = false;
        for wanted in [Role::Defensive, Role::Offensive] {
            for (elf, _) in ranked.iter().filter(|(_, role)| *role == wanted) {
                match wanted {
                    Role::Defensive => elves::defend(game, elf)?,
                    Role::Offensive => saving |= elves::attack(game, elf, &self.config)?,
                    Role::Idle => {}
                }
            }
        }

        let roles: Vec<(ObjectId, Role)> = ranked.iter().map(|(e, r)| (e.id, *r)).collect();
        debug!("elf roles: {:?}", roles);
        Ok((roles, saving))
    }

    fn handle_portals<G: Game + ?Sized>(
        &self,
        game: &mut G,
        mana_reserved: i32,
    ) -> Result<Vec<(ObjectId, Role)>, G::Error> {
        let castle = game.enemy_castle().object();
        let ranked = assign_roles(
            game.my_portals(),
            |portal| game.distance(&portal.object(), &castle),
            self.config.reserve_role,
        );

        for wanted in [Role::Defensive, Role::Offensive] {
            for (portal, _) in ranked.iter().filter(|(_, role)| *role == wanted) {
                match wanted {
                    Role::Defensive => portals::defend(game, portal, &self.config)?,
                    Role::Offensive => portals::attack(game, portal, mana_reserved)?,
                    Role::Idle => {}
                }
            }
        }

        let roles: Vec<(ObjectId, Role)> = ranked.iter().map(|(p, r)| (p.id, *r)).collect();
        debug!("portal roles: {:?}", roles);
        Ok(roles)
    }
}
