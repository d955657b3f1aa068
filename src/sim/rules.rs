//! Simulation rules.
//!
//! Every constant the local simulator uses. The defaults describe a small
//! two-castle map where a match lasts a few hundred turns.

use serde::{Deserialize, Serialize};

use crate::world::{CreatureKind, Location};

/// Tunable constants for the local simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub map_rows: i32,
    pub map_cols: i32,
    /// Castle positions for the first and second player.
    pub castles: [Location; 2],
    pub castle_health: i32,

    pub elves_per_player: usize,
    pub elf_health: i32,
    pub elf_speed: i32,
    pub elf_attack_range: i32,
    pub elf_attack_damage: i32,
    /// Distance from the castle, toward the enemy, where elves (re)spawn.
    pub elf_spawn_offset: i32,
    pub elf_respawn_turns: u32,

    pub initial_mana: i32,
    pub mana_per_turn: i32,

    pub portal_cost: i32,
    pub portal_health: i32,
    pub portal_build_turns: u32,
    /// Minimum distance between a new portal and any portal or castle.
    pub portal_spacing: i32,
    pub summon_cooldown: u32,

    pub lava_giant: CreatureRules,
    pub ice_troll: CreatureRules,

    pub max_turns: u32,
}

/// Constants for one creature kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRules {
    pub cost: i32,
    pub health: i32,
    pub speed: i32,
    pub attack_range: i32,
    pub attack_damage: i32,
    /// Health lost every turn.
    pub decay: i32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            map_rows: 4000,
            map_cols: 6400,
            castles: [Location::new(2000, 600), Location::new(2000, 5800)],
            castle_health: 80,

            elves_per_player: 2,
            elf_health: 10,
            elf_speed: 100,
            elf_attack_range: 200,
            elf_attack_damage: 1,
            elf_spawn_offset: 300,
            elf_respawn_turns: 30,

            initial_mana: 100,
            mana_per_turn: 5,

            portal_cost: 50,
            portal_health: 10,
            portal_build_turns: 10,
            portal_spacing: 500,
            summon_cooldown: 5,

            lava_giant: CreatureRules {
                cost: 40,
                health: 30,
                speed: 200,
                attack_range: 200,
                attack_damage: 3,
                decay: 1,
            },
            ice_troll: CreatureRules {
                cost: 50,
                health: 30,
                speed: 100,
                attack_range: 150,
                attack_damage: 1,
                decay: 1,
            },

            max_turns: 600,
        }
    }
}

impl Rules {
    pub fn creature(&self, kind: CreatureKind) -> &CreatureRules {
        match kind {
            CreatureKind::LavaGiant => &self.lava_giant,
            CreatureKind::IceTroll => &self.ice_troll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castles_sit_inside_the_map() {
        let rules = Rules::default();
        for castle in rules.castles {
            assert_eq!(castle.clamp_to(rules.map_rows, rules.map_cols), castle);
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{"max_turns": 50, "mana_per_turn": 20}"#;
        let rules: Rules = serde_json::from_str(json).unwrap();
        assert_eq!(rules.max_turns, 50);
        assert_eq!(rules.mana_per_turn, 20);
        assert_eq!(rules.portal_cost, Rules::default().portal_cost);
        assert_eq!(rules.creature(CreatureKind::IceTroll).cost, 50);
    }
}
