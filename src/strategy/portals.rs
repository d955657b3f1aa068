//! Portal behaviors.

use log::debug;

use crate::api::Game;
use crate::world::{AsObject, GameObject, Portal};

use super::StrategyConfig;

/// Offensive portal: one lava giant whenever the engine allows it and my
/// mana is at least `mana_reserved`.
pub(crate) fn attack<G: Game + ?Sized>(
    game: &mut G,
    portal: &Portal,
    mana_reserved: i32,
) -> Result<(), G::Error> {
    let mana = game.my_mana();
    if mana_reserved > 0 && mana < mana_reserved {
        debug!("p{} holds {} mana for a portal", portal.id.0, mana);
        return Ok(());
    }
    if game.can_summon_lava_giant(portal) {
        debug!("p{} summons a lava giant", portal.id.0);
        game.summon_lava_giant(portal)?;
    }
    Ok(())
}

/// Defensive portal: one ice troll when the garrison is short and an enemy
/// elf or lava giant is inside the threat radius around my castle.
pub(crate) fn defend<G: Game + ?Sized>(
    game: &mut G,
    portal: &Portal,
    config: &StrategyConfig,
) -> Result<(), G::Error> {
    let garrison = game.my_ice_trolls().len();
    if garrison >= config.ice_troll_garrison {
        return Ok(());
    }

    let castle = game.my_castle().object();
    let intruders: Vec<GameObject> = game
        .enemy_living_elves()
        .iter()
        .map(AsObject::object)
        .chain(game.enemy_lava_giants().iter().map(AsObject::object))
        .collect();
    let threat = intruders
        .iter()
        .find(|enemy| game.distance(enemy, &castle) < config.threat_radius)
        .copied();

    if let Some(enemy) = threat {
        if game.can_summon_ice_troll(portal) {
            debug!(
                "p{} summons an ice troll against {} (garrison {})",
                portal.id.0, enemy, garrison
            );
            game.summon_ice_troll(portal)?;
        }
    }
    Ok(())
}
