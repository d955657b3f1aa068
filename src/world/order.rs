//! Commands a player issues to its elves and portals.
//!
//! One command per unit per turn. The serde form is what the host protocol
//! emits; the `Display` form is a compact notation used in logs and match
//! records:
//!
//! - `e3 attack p7`
//! - `e3 move 1200,3400`
//! - `e3 build`
//! - `p7 lava`
//! - `p7 troll`

use serde::{Deserialize, Serialize};

use super::location::Location;
use super::object::{GameObject, ObjectId};

/// A single command issued to an elf or portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Elf attacks a target in range.
    Attack { elf: ObjectId, target: GameObject },

    /// Elf moves toward a destination at full speed.
    MoveTo { elf: ObjectId, dest: Location },

    /// Elf starts building a portal at its current location.
    BuildPortal { elf: ObjectId },

    /// Portal summons a lava giant.
    SummonLavaGiant { portal: ObjectId },

    /// Portal summons an ice troll.
    SummonIceTroll { portal: ObjectId },
}

impl Command {
    /// The unit carrying out the command.
    pub const fn actor(&self) -> ObjectId {
        match *self {
            Command::Attack { elf, .. }
            | Command::MoveTo { elf, .. }
            | Command::BuildPortal { elf } => elf,
            Command::SummonLavaGiant { portal } | Command::SummonIceTroll { portal } => portal,
        }
    }

    /// Whether the command is carried out by a portal.
    pub const fn is_summon(&self) -> bool {
        matches!(
            self,
            Command::SummonLavaGiant { .. } | Command::SummonIceTroll { .. }
        )
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Attack { elf, target } => write!(f, "e{} attack {}", elf.0, target),
            Command::MoveTo { elf, dest } => write!(f, "e{} move {}", elf.0, dest),
            Command::BuildPortal { elf } => write!(f, "e{} build", elf.0),
            Command::SummonLavaGiant { portal } => write!(f, "p{} lava", portal.0),
            Command::SummonIceTroll { portal } => write!(f, "p{} troll", portal.0),
        }
    }
}

/// Formats a list of commands as a single `" ; "`-separated line.
pub fn format_commands(commands: &[Command]) -> String {
    commands
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ; ")
}
