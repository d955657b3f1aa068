//! World representation.
//!
//! Contains the snapshot data model: locations, game objects, commands and
//! the per-player view of a turn.

pub mod location;
pub mod object;
pub mod order;
pub mod snapshot;

pub use location::Location;
pub use object::{
    AsObject, Castle, Creature, CreatureKind, Elf, GameObject, ObjectId, ObjectKind, Owner, Portal,
};
pub use order::{format_commands, Command};
pub use snapshot::{Side, Snapshot};
