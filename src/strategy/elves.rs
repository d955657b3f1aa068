//! Elf behaviors.

use log::debug;

use crate::api::{Game, GameView};
use crate::world::{AsObject, Elf, GameObject};

use super::StrategyConfig;

/// Attacks the first target in `targets` that is in range of `elf`.
/// Returns whether an attack was issued.
pub(crate) fn try_attack<G: Game + ?Sized>(
    game: &mut G,
    elf: &Elf,
    targets: &[GameObject],
) -> Result<bool, G::Error> {
    let target = targets
        .iter()
        .find(|target| game.in_attack_range(elf, target))
        .copied();
    match target {
        Some(target) => {
            debug!("e{} attacks {}", elf.id.0, target);
            game.attack(elf, &target)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Defensive elf.
///
/// Attacks by priority: enemy elves, then enemy portals, then anything among
/// enemy creatures, portals and castle. With nothing in range it walks to
/// the nearest of those creatures, portals and castle.
pub(crate) fn defend<G: Game + ?Sized>(game: &mut G, elf: &Elf) -> Result<(), G::Error> {
    let enemy_elves: Vec<GameObject> = game
        .enemy_living_elves()
        .iter()
        .map(AsObject::object)
        .collect();
    let enemy_portals: Vec<GameObject> =
        game.enemy_portals().iter().map(AsObject::object).collect();

    let mut fallback: Vec<GameObject> = game
        .enemy_creatures()
        .iter()
        .map(AsObject::object)
        .collect();
    fallback.extend(enemy_portals.iter().copied());
    fallback.push(game.enemy_castle().object());

    for targets in [&enemy_elves, &enemy_portals, &fallback] {
        if try_attack(game, elf, targets)? {
            return Ok(());
        }
    }

    let here = elf.object();
    let nearest = fallback
        .iter()
        .min_by_key(|target| game.distance(&here, target))
        .copied();
    if let Some(dest) = nearest {
        debug!("e{} moves toward {}", elf.id.0, dest);
        game.move_to(elf, &dest)?;
    }
    Ok(())
}

/// My portals within `radius` of the enemy castle, counting the ones my
/// elves are still building.
pub(crate) fn attacking_portals<G: GameView + ?Sized>(game: &G, radius: i32) -> usize {
    let castle = game.enemy_castle().object();
    let near = |object: GameObject| game.distance(&object, &castle) < radius;
    let standing = game
        .my_portals()
        .iter()
        .filter(|portal| near(portal.object()))
        .count();
    let underway = game
        .my_living_elves()
        .iter()
        .filter(|elf| elf.is_building && near(elf.object()))
        .count();
    standing + underway
}

/// Offensive elf.
///
/// Builds a portal when close enough to the enemy castle and able to,
/// otherwise heads for the castle unless it is busy building. No more
/// portals are started once `max_attacking_portals` are standing or under
/// way near the castle.
///
/// Returns whether the elf is inside the build radius waiting for a portal
/// it cannot start yet.
pub(crate) fn attack<G: Game + ?Sized>(
    game: &mut G,
    elf: &Elf,
    config: &StrategyConfig,
) -> Result<bool, G::Error> {
    let castle = game.enemy_castle().object();
    let in_reach = game.distance(&elf.object(), &castle) < config.portal_build_radius;
    let capped = config
        .max_attacking_portals
        .is_some_and(|cap| attacking_portals(&*game, config.portal_build_radius) >= cap);
    if in_reach && !capped && game.can_build_portal(elf) {
        debug!("e{} builds a portal", elf.id.0);
        game.build_portal(elf)?;
        return Ok(false);
    }
    if elf.is_building {
        return Ok(false);
    }
    debug!("e{} advances on {}", elf.id.0, castle);
    game.move_to(elf, &castle)?;
    Ok(in_reach && !capped)
}
