//! Per-turn world snapshot.
//!
//! A `Snapshot` is everything one player may see at the start of a turn,
//! split into that player's side and the enemy's side. It is what the host
//! sends over the protocol and what the simulator hands to each bot.

use serde::{Deserialize, Serialize};

use super::object::{Castle, Creature, CreatureKind, Elf, Portal};

/// One player's units and resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Side {
    pub castle: Castle,
    #[serde(default)]
    pub elves: Vec<Elf>,
    #[serde(default)]
    pub portals: Vec<Portal>,
    #[serde(default)]
    pub creatures: Vec<Creature>,
    #[serde(default)]
    pub mana: i32,
}

impl Side {
    /// Creates a side holding only its castle.
    pub fn new(castle: Castle) -> Self {
        Self {
            castle,
            elves: Vec::new(),
            portals: Vec::new(),
            creatures: Vec::new(),
            mana: 0,
        }
    }

    /// Elves with positive health.
    pub fn living_elves(&self) -> impl Iterator<Item = &Elf> {
        self.elves.iter().filter(|e| e.health > 0)
    }

    /// Creatures of the given kind.
    pub fn creatures_of(&self, kind: CreatureKind) -> impl Iterator<Item = &Creature> {
        self.creatures.iter().filter(move |c| c.kind == kind)
    }
}

/// The state of the game as seen by one player at the start of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub turn: u32,
    pub me: Side,
    pub enemy: Side,
}

impl Snapshot {
    pub fn new(turn: u32, me: Side, enemy: Side) -> Self {
        Self { turn, me, enemy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::location::Location;
    use crate::world::object::{ObjectId, Owner};

    fn castle(id: u32, owner: Owner) -> Castle {
        Castle {
            id: ObjectId(id),
            owner,
            location: Location::new(0, 0),
            health: 80,
        }
    }

    #[test]
    fn living_elves_skip_dead() {
        let mut side = Side::new(castle(1, Owner::Me));
        for (id, health) in [(10, 5), (11, 0), (12, 3)] {
            side.elves.push(Elf {
                id: ObjectId(id),
                owner: Owner::Me,
                location: Location::new(0, 0),
                health,
                attack_range: 200,
                is_building: false,
                can_build_portal: false,
            });
        }
        let ids: Vec<u32> = side.living_elves().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![10, 12]);
    }

    #[test]
    fn minimal_json_parses() {
        let json = r#"{
            "me": {"castle": {
                "id": 1, "owner": "me", "location": {"row": 0, "col": 0}, "health": 80
            }},
            "enemy": {"castle": {
                "id": 2, "owner": "enemy", "location": {"row": 0, "col": 5000}, "health": 80
            }}
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.turn, 0);
        assert!(snapshot.me.elves.is_empty());
        assert_eq!(snapshot.enemy.castle.location, Location::new(0, 5000));
    }
}
