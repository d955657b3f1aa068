//! Game objects: elves, portals, castles and creatures.
//!
//! These are plain snapshot copies of engine-owned entities. Ownership is
//! expressed relative to the player whose turn the snapshot describes.

use serde::{Deserialize, Serialize};

use super::location::Location;

/// Engine-assigned identifier, unique across all objects in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side an object belongs to, from the snapshot's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    Me,
    Enemy,
}

/// The kind of a game object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Elf,
    Portal,
    Castle,
    LavaGiant,
    IceTroll,
}

impl ObjectKind {
    /// Single-character prefix used in the text form of commands.
    pub const fn prefix(self) -> char {
        match self {
            ObjectKind::Elf => 'e',
            ObjectKind::Portal => 'p',
            ObjectKind::Castle => 'c',
            ObjectKind::LavaGiant => 'l',
            ObjectKind::IceTroll => 't',
        }
    }
}

/// The creature kinds a portal can summon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureKind {
    LavaGiant,
    IceTroll,
}

impl From<CreatureKind> for ObjectKind {
    fn from(kind: CreatureKind) -> Self {
        match kind {
            CreatureKind::LavaGiant => ObjectKind::LavaGiant,
            CreatureKind::IceTroll => ObjectKind::IceTroll,
        }
    }
}

/// The common, targetable view of any entity on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub owner: Owner,
    pub location: Location,
}

impl std::fmt::Display for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.id.0)
    }
}

/// Anything that can be viewed as a [`GameObject`].
pub trait AsObject {
    fn object(&self) -> GameObject;
}

impl AsObject for GameObject {
    fn object(&self) -> GameObject {
        *self
    }
}

/// An elf: the mobile unit that attacks, moves and builds portals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elf {
    pub id: ObjectId,
    pub owner: Owner,
    pub location: Location,
    pub health: i32,
    pub attack_range: i32,
    #[serde(default)]
    pub is_building: bool,
    #[serde(default)]
    pub can_build_portal: bool,
}

impl AsObject for Elf {
    fn object(&self) -> GameObject {
        GameObject {
            id: self.id,
            kind: ObjectKind::Elf,
            owner: self.owner,
            location: self.location,
        }
    }
}

/// A stationary structure that summons creatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub id: ObjectId,
    pub owner: Owner,
    pub location: Location,
    pub health: i32,
    #[serde(default)]
    pub can_summon_lava_giant: bool,
    #[serde(default)]
    pub can_summon_ice_troll: bool,
}

impl AsObject for Portal {
    fn object(&self) -> GameObject {
        GameObject {
            id: self.id,
            kind: ObjectKind::Portal,
            owner: self.owner,
            location: self.location,
        }
    }
}

/// A castle. Cannot act; losing it loses the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Castle {
    pub id: ObjectId,
    pub owner: Owner,
    pub location: Location,
    pub health: i32,
}

impl AsObject for Castle {
    fn object(&self) -> GameObject {
        GameObject {
            id: self.id,
            kind: ObjectKind::Castle,
            owner: self.owner,
            location: self.location,
        }
    }
}

/// A summoned creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub id: ObjectId,
    pub owner: Owner,
    pub kind: CreatureKind,
    pub location: Location,
    pub health: i32,
}

impl AsObject for Creature {
    fn object(&self) -> GameObject {
        GameObject {
            id: self.id,
            kind: self.kind.into(),
            owner: self.owner,
            location: self.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creature_object_kind_follows_creature_kind() {
        let troll = Creature {
            id: ObjectId(4),
            owner: Owner::Me,
            kind: CreatureKind::IceTroll,
            location: Location::new(10, 10),
            health: 20,
        };
        assert_eq!(troll.object().kind, ObjectKind::IceTroll);
        assert_eq!(troll.object().to_string(), "t4");
    }

    #[test]
    fn elf_flags_default_when_missing_from_json() {
        let json = r#"{
            "id": 3, "owner": "me", "location": {"row": 1, "col": 2},
            "health": 10, "attack_range": 200
        }"#;
        let elf: Elf = serde_json::from_str(json).unwrap();
        assert_eq!(elf.id, ObjectId(3));
        assert!(!elf.is_building);
        assert!(!elf.can_build_portal);
    }
}
