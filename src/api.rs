//! The query/command surface a bot plays through.
//!
//! `GameView` is the read-only snapshot side of the engine and
//! `GameCommands` the mutating side. The strategy is generic over both, so
//! it runs unchanged against a live host, the protocol session, or the
//! local simulator.

use std::convert::Infallible;

use crate::world::{
    AsObject, Castle, Command, Creature, CreatureKind, Elf, GameObject, Portal, Snapshot,
};

/// Read-only queries, valid for the current turn.
pub trait GameView {
    fn my_living_elves(&self) -> Vec<Elf>;
    fn enemy_living_elves(&self) -> Vec<Elf>;
    fn enemy_creatures(&self) -> Vec<Creature>;
    fn enemy_lava_giants(&self) -> Vec<Creature>;
    fn my_ice_trolls(&self) -> Vec<Creature>;
    fn enemy_portals(&self) -> Vec<Portal>;
    fn my_portals(&self) -> Vec<Portal>;
    fn enemy_castle(&self) -> Castle;
    fn my_castle(&self) -> Castle;
    fn my_mana(&self) -> i32;

    fn distance(&self, a: &GameObject, b: &GameObject) -> i32 {
        a.location.distance(b.location)
    }

    fn in_attack_range(&self, elf: &Elf, target: &GameObject) -> bool {
        self.distance(&elf.object(), target) <= elf.attack_range
    }

    fn can_build_portal(&self, elf: &Elf) -> bool {
        elf.can_build_portal
    }

    fn can_summon_lava_giant(&self, portal: &Portal) -> bool {
        portal.can_summon_lava_giant
    }

    fn can_summon_ice_troll(&self, portal: &Portal) -> bool {
        portal.can_summon_ice_troll
    }
}

/// Mutating commands. Legality is enforced by the implementor.
pub trait GameCommands {
    type Error: std::error::Error;

    fn attack(&mut self, elf: &Elf, target: &GameObject) -> Result<(), Self::Error>;
    fn move_to(&mut self, elf: &Elf, dest: &GameObject) -> Result<(), Self::Error>;
    fn build_portal(&mut self, elf: &Elf) -> Result<(), Self::Error>;
    fn summon_lava_giant(&mut self, portal: &Portal) -> Result<(), Self::Error>;
    fn summon_ice_troll(&mut self, portal: &Portal) -> Result<(), Self::Error>;
}

/// A full game handle: queries plus commands.
pub trait Game: GameView + GameCommands {}

impl<T: GameView + GameCommands> Game for T {}

impl GameView for Snapshot {
    fn my_living_elves(&self) -> Vec<Elf> {
        self.me.living_elves().copied().collect()
    }

    fn enemy_living_elves(&self) -> Vec<Elf> {
        self.enemy.living_elves().copied().collect()
    }

    fn enemy_creatures(&self) -> Vec<Creature> {
        self.enemy.creatures.clone()
    }

    fn enemy_lava_giants(&self) -> Vec<Creature> {
        self.enemy
            .creatures_of(CreatureKind::LavaGiant)
            .copied()
            .collect()
    }

    fn my_ice_trolls(&self) -> Vec<Creature> {
        self.me.creatures_of(CreatureKind::IceTroll).copied().collect()
    }

    fn enemy_portals(&self) -> Vec<Portal> {
        self.enemy.portals.clone()
    }

    fn my_portals(&self) -> Vec<Portal> {
        self.me.portals.clone()
    }

    fn enemy_castle(&self) -> Castle {
        self.enemy.castle
    }

    fn my_castle(&self) -> Castle {
        self.me.castle
    }

    fn my_mana(&self) -> i32 {
        self.me.mana
    }
}

/// Records the commands issued against a snapshot.
///
/// Accepts everything; legality is left to whoever consumes the commands
/// (the remote host or the simulator's resolver).
#[derive(Debug)]
pub struct OrderBook<'a> {
    snapshot: &'a Snapshot,
    commands: Vec<Command>,
}

impl<'a> OrderBook<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

impl GameView for OrderBook<'_> {
    fn my_living_elves(&self) -> Vec<Elf> {
        self.snapshot.my_living_elves()
    }

    fn enemy_living_elves(&self) -> Vec<Elf> {
        self.snapshot.enemy_living_elves()
    }

    fn enemy_creatures(&self) -> Vec<Creature> {
        self.snapshot.enemy_creatures()
    }

    fn enemy_lava_giants(&self) -> Vec<Creature> {
        self.snapshot.enemy_lava_giants()
    }

    fn my_ice_trolls(&self) -> Vec<Creature> {
        self.snapshot.my_ice_trolls()
    }

    fn enemy_portals(&self) -> Vec<Portal> {
        self.snapshot.enemy_portals()
    }

    fn my_portals(&self) -> Vec<Portal> {
        self.snapshot.my_portals()
    }

    fn enemy_castle(&self) -> Castle {
        self.snapshot.enemy_castle()
    }

    fn my_castle(&self) -> Castle {
        self.snapshot.my_castle()
    }

    fn my_mana(&self) -> i32 {
        self.snapshot.my_mana()
    }
}

impl GameCommands for OrderBook<'_> {
    type Error = Infallible;

    fn attack(&mut self, elf: &Elf, target: &GameObject) -> Result<(), Infallible> {
        self.commands.push(Command::Attack {
            elf: elf.id,
            target: *target,
        });
        Ok(())
    }

    fn move_to(&mut self, elf: &Elf, dest: &GameObject) -> Result<(), Infallible> {
        self.commands.push(Command::MoveTo {
            elf: elf.id,
            dest: dest.location,
        });
        Ok(())
    }

    fn build_portal(&mut self, elf: &Elf) -> Result<(), Infallible> {
        self.commands.push(Command::BuildPortal { elf: elf.id });
        Ok(())
    }

    fn summon_lava_giant(&mut self, portal: &Portal) -> Result<(), Infallible> {
        self.commands
            .push(Command::SummonLavaGiant { portal: portal.id });
        Ok(())
    }

    fn summon_ice_troll(&mut self, portal: &Portal) -> Result<(), Infallible> {
        self.commands.push(Command::SummonIceTroll { portal: portal.id });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Location, ObjectId, Owner, Side};

    fn snapshot() -> Snapshot {
        let mut me = Side::new(Castle {
            id: ObjectId(1),
            owner: Owner::Me,
            location: Location::new(2000, 600),
            health: 80,
        });
        me.elves.push(Elf {
            id: ObjectId(3),
            owner: Owner::Me,
            location: Location::new(2000, 1000),
            health: 10,
            attack_range: 200,
            is_building: false,
            can_build_portal: true,
        });
        me.creatures.push(Creature {
            id: ObjectId(5),
            owner: Owner::Me,
            kind: CreatureKind::IceTroll,
            location: Location::new(2000, 700),
            health: 20,
        });
        me.creatures.push(Creature {
            id: ObjectId(6),
            owner: Owner::Me,
            kind: CreatureKind::LavaGiant,
            location: Location::new(2000, 700),
            health: 20,
        });
        let mut enemy = Side::new(Castle {
            id: ObjectId(2),
            owner: Owner::Enemy,
            location: Location::new(2000, 5800),
            health: 80,
        });
        enemy.elves.push(Elf {
            id: ObjectId(4),
            owner: Owner::Enemy,
            location: Location::new(2000, 1150),
            health: 10,
            attack_range: 200,
            is_building: false,
            can_build_portal: false,
        });
        Snapshot::new(0, me, enemy)
    }

    #[test]
    fn snapshot_filters_creatures_by_kind() {
        let s = snapshot();
        assert_eq!(s.my_ice_trolls().len(), 1);
        assert_eq!(s.my_ice_trolls()[0].id, ObjectId(5));
        assert!(s.enemy_lava_giants().is_empty());
    }

    #[test]
    fn attack_range_uses_elf_range() {
        let s = snapshot();
        let elf = s.my_living_elves()[0];
        let enemy = s.enemy_living_elves()[0];
        assert!(s.in_attack_range(&elf, &enemy.object()));
        assert!(!s.in_attack_range(&elf, &s.enemy_castle().object()));
    }

    #[test]
    fn order_book_records_commands_in_order() {
        let s = snapshot();
        let mut book = OrderBook::new(&s);
        let elf = book.my_living_elves()[0];
        let castle = book.enemy_castle().object();
        book.move_to(&elf, &castle).unwrap();
        book.build_portal(&elf).unwrap();
        assert_eq!(
            book.into_commands(),
            vec![
                Command::MoveTo {
                    elf: ObjectId(3),
                    dest: Location::new(2000, 5800),
                },
                Command::BuildPortal { elf: ObjectId(3) },
            ]
        );
    }
}
