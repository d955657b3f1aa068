//! Role ranking.
//!
//! Units are ranked by distance to the enemy castle and handed a tagged
//! role per rank, instead of being picked out of a sorted list by index.

use serde::{Deserialize, Serialize};

/// What a unit is asked to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Offensive,
    Defensive,
    Idle,
}

impl Role {
    /// Parses a role from its lowercase name.
    pub fn from_name(name: &str) -> Option<Role> {
        let name = name.trim().to_ascii_lowercase();
        [Role::Offensive, Role::Defensive, Role::Idle]
            .into_iter()
            .find(|role| role.name() == name)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Role::Offensive => "offensive",
            Role::Defensive => "defensive",
            Role::Idle => "idle",
        }
    }
}

/// Ranks `units` ascending by `distance` and assigns one role per unit.
///
/// - a lone unit defends;
/// - otherwise the closest unit attacks and the second closest defends;
/// - every unit past the second gets `reserve`.
///
/// The sort is stable, so units at equal distance keep their input order.
/// The result is in rank order.
pub fn assign_roles<T, F>(units: Vec<T>, mut distance: F, reserve: Role) -> Vec<(T, Role)>
where
    F: FnMut(&T) -> i32,
{
    let mut ranked: Vec<(i32, T)> = units.into_iter().map(|u| (distance(&u), u)).collect();
    ranked.sort_by_key(|(d, _)| *d);

    let single = ranked.len() == 1;
    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, (_, unit))| {
            let role = match (single, rank) {
                (true, _) => Role::Defensive,
                (false, 0) => Role::Offensive,
                (false, 1) => Role::Defensive,
                _ => reserve,
            };
            (unit, role)
        })
        .collect()
}
