//! Bot session state.
//!
//! Holds the strategy configuration and options between protocol requests
//! and runs the strategy for each `turn`. Turns are decided from the
//! snapshot alone; the session only keeps configuration and a turn count.

use std::collections::HashMap;
use std::io::{self, Write};

use log::{debug, info, warn};

use crate::api::OrderBook;
use crate::protocol::{format_orders, parse_snapshot, ProtocolError};
use crate::strategy::{Role, StrategyConfig, TurnStrategy};
use crate::world::{format_commands, Command};

/// Holds the mutable state of the bot between requests.
pub struct Engine {
    strategy: TurnStrategy,
    pub options: HashMap<String, String>,
    pub turns_played: u32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(StrategyConfig::default())
    }
}

impl Engine {
    pub fn new(config: StrategyConfig) -> Self {
        Engine {
            strategy: TurnStrategy::new(config),
            options: HashMap::new(),
            turns_played: 0,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        self.strategy.config()
    }

    /// Starts a new game. Options survive.
    pub fn new_game(&mut self) {
        info!("new game after {} turns", self.turns_played);
        self.turns_played = 0;
    }

    /// Sets a strategy option. Unknown names and unparsable values are
    /// logged and leave the configuration unchanged.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        let raw = value.unwrap_or_default();
        let mut config = *self.strategy.config();
        let applied = match name.as_str() {
            "PortalBuildRadius" => parse_into(&raw, &mut config.portal_build_radius),
            "ThreatRadius" => parse_into(&raw, &mut config.threat_radius),
            "IceTrollGarrison" => parse_into(&raw, &mut config.ice_troll_garrison),
            "ManaReserve" => parse_into(&raw, &mut config.mana_reserve),
            "MaxAttackingPortals" => match raw.trim() {
                "" | "none" => {
                    config.max_attacking_portals = None;
                    true
                }
                value => match value.parse::<usize>() {
                    Ok(cap) => {
                        config.max_attacking_portals = Some(cap);
                        true
                    }
                    Err(_) => false,
                },
            },
            "ReserveRole" => match Role::from_name(&raw) {
                Some(role) => {
                    config.reserve_role = role;
                    true
                }
                None => false,
            },
            _ => {
                warn!("unknown option: {}", name);
                return;
            }
        };
        if !applied {
            warn!("invalid value for {}: '{}'", name, raw);
            return;
        }
        debug!("option {} = {}", name, raw);
        self.strategy = TurnStrategy::new(config);
        self.options.insert(name, raw);
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Decides the commands for one turn from a JSON snapshot.
    pub fn decide(&mut self, json: &str) -> Result<Vec<Command>, ProtocolError> {
        let snapshot = parse_snapshot(json)?;
        let mut book = OrderBook::new(&snapshot);
        let report = match self.strategy.run_turn(&mut book) {
            Ok(report) => report,
            Err(never) => match never {},
        };
        self.turns_played += 1;
        let commands = book.into_commands();
        debug!(
            "turn {}: {} elves, {} portals ranked; {}",
            snapshot.turn,
            report.elves.len(),
            report.portals.len(),
            format_commands(&commands)
        );
        Ok(commands)
    }

    /// Handles the `turn` command: writes `orders <json array>`.
    ///
    /// A snapshot that cannot be decoded is answered with no orders.
    pub fn handle_turn<W: Write>(&mut self, json: &str, out: &mut W) -> io::Result<()> {
        let orders = match self.decide(json).and_then(|commands| format_orders(&commands)) {
            Ok(orders) => orders,
            Err(e) => {
                warn!("turn: {}", e);
                "[]".to_string()
            }
        };
        writeln!(out, "orders {}", orders)?;
        out.flush()
    }
}

fn parse_into<T: std::str::FromStr>(raw: &str, slot: &mut T) -> bool {
    match raw.trim().parse() {
        Ok(v) => {
            *slot = v;
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "turn": 1,
        "me": {
            "castle": {
                "id": 1, "owner": "me", "location": {"row": 2000, "col": 600}, "health": 80
            },
            "elves": [
                {
                    "id": 3, "owner": "me", "location": {"row": 2000, "col": 3500},
                    "health": 10, "attack_range": 200, "can_build_portal": true
                },
                {
                    "id": 4, "owner": "me", "location": {"row": 2000, "col": 900},
                    "health": 10, "attack_range": 200
                }
            ]
        },
        "enemy": {
            "castle": {
                "id": 2, "owner": "enemy", "location": {"row": 2000, "col": 5800}, "health": 80
            }
        }
    }"#;

    fn output_of(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut output = Vec::new();
        f(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn new_engine_has_default_config() {
        let engine = Engine::default();
        assert_eq!(*engine.config(), StrategyConfig::default());
        assert!(engine.options.is_empty());
        assert_eq!(engine.turns_played, 0);
    }

    #[test]
    fn set_option_updates_config() {
        let mut engine = Engine::default();
        engine.set_option("ThreatRadius".to_string(), Some("1200".to_string()));
        engine.set_option("IceTrollGarrison".to_string(), Some("4".to_string()));
        engine.set_option("ReserveRole".to_string(), Some("defensive".to_string()));
        engine.set_option("PortalBuildRadius".to_string(), Some("2500".to_string()));
        engine.set_option("ManaReserve".to_string(), Some("90".to_string()));
        engine.set_option("MaxAttackingPortals".to_string(), Some("2".to_string()));
        let config = engine.config();
        assert_eq!(config.mana_reserve, 90);
        assert_eq!(config.max_attacking_portals, Some(2));
        assert_eq!(config.threat_radius, 1200);
        assert_eq!(config.ice_troll_garrison, 4);
        assert_eq!(config.reserve_role, Role::Defensive);
        assert_eq!(config.portal_build_radius, 2500);
        assert_eq!(engine.options.get("ThreatRadius"), Some(&"1200".to_string()));
    }

    #[test]
    fn attacking_portal_cap_can_be_cleared() {
        let mut engine = Engine::default();
        engine.set_option("MaxAttackingPortals".to_string(), Some("1".to_string()));
        engine.set_option("MaxAttackingPortals".to_string(), Some("lots".to_string()));
        assert_eq!(engine.config().max_attacking_portals, Some(1));
        engine.set_option("MaxAttackingPortals".to_string(), Some("none".to_string()));
        assert_eq!(engine.config().max_attacking_portals, None);
    }

    #[test]
    fn bad_options_are_ignored() {
        let mut engine = Engine::default();
        engine.set_option("Threads".to_string(), Some("8".to_string()));
        engine.set_option("ThreatRadius".to_string(), Some("far".to_string()));
        engine.set_option("ReserveRole".to_string(), None);
        assert_eq!(*engine.config(), StrategyConfig::default());
        assert!(engine.options.is_empty());
    }

    #[test]
    fn handle_isready_outputs_readyok() {
        let engine = Engine::default();
        let output = output_of(|out| engine.handle_isready(out));
        assert_eq!(output.trim(), "readyok");
    }

    #[test]
    fn handle_turn_outputs_orders() {
        let mut engine = Engine::default();
        let output = output_of(|out| engine.handle_turn(SNAPSHOT, out));
        let orders = output.trim().strip_prefix("orders ").unwrap();
        let commands: Vec<Command> = serde_json::from_str(orders).unwrap();
        assert_eq!(commands.len(), 2);
        assert!(commands.contains(&Command::BuildPortal {
            elf: crate::world::ObjectId(3)
        }));
        assert_eq!(engine.turns_played, 1);
    }

    #[test]
    fn far_flung_coordinates_still_get_orders() {
        let json = r#"{
            "me": {
                "castle": {
                    "id": 1, "owner": "me", "location": {"row": -2000000000, "col": 0},
                    "health": 80
                },
                "elves": [{
                    "id": 3, "owner": "me", "location": {"row": -2000000000, "col": 100},
                    "health": 10, "attack_range": 200
                }],
                "portals": [{
                    "id": 5, "owner": "me", "location": {"row": -2000000000, "col": 900},
                    "health": 10, "can_summon_ice_troll": true
                }]
            },
            "enemy": {
                "castle": {
                    "id": 2, "owner": "enemy", "location": {"row": 2000000000, "col": 0},
                    "health": 80
                },
                "elves": [{
                    "id": 4, "owner": "enemy", "location": {"row": 2000000000, "col": 100},
                    "health": 10, "attack_range": 200
                }]
            }
        }"#;
        let mut engine = Engine::default();
        let output = output_of(|out| engine.handle_turn(json, out));
        let orders = output.trim().strip_prefix("orders ").unwrap();
        let commands: Vec<Command> = serde_json::from_str(orders).unwrap();
        assert_eq!(
            commands,
            vec![Command::MoveTo {
                elf: crate::world::ObjectId(3),
                dest: crate::world::Location::new(2_000_000_000, 0),
            }]
        );
        assert_eq!(engine.turns_played, 1);
    }

    #[test]
    fn malformed_turn_outputs_no_orders() {
        let mut engine = Engine::default();
        let output = output_of(|out| engine.handle_turn("{broken", out));
        assert_eq!(output.trim(), "orders []");
        let output = output_of(|out| engine.handle_turn("", out));
        assert_eq!(output.trim(), "orders []");
        assert_eq!(engine.turns_played, 0);
    }

    #[test]
    fn new_game_resets_turns_keeps_options() {
        let mut engine = Engine::default();
        engine.set_option("ThreatRadius".to_string(), Some("1000".to_string()));
        engine.decide(SNAPSHOT).unwrap();
        engine.new_game();
        assert_eq!(engine.turns_played, 0);
        assert_eq!(engine.config().threat_radius, 1000);
    }
}
