//! Power-up drops and pickup lookup.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use threatsim_core::components::PowerUp;
use threatsim_core::constants::{POWER_UP_DROP_CHANCE, POWER_UP_LIFETIME_MS};
use threatsim_core::enums::PowerUpKind;
use threatsim_core::types::{Position, PowerUpId};

use crate::world_setup::{self, IdAllocator};

/// Roll for a drop where a threat went down.
pub fn roll_drop(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    ids: &mut IdAllocator,
    position: Position,
    now_ms: f64,
) -> Option<(PowerUpId, PowerUpKind)> {
    if !rng.gen_bool(POWER_UP_DROP_CHANCE) {
        return None;
    }
    let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
    let id = ids.power_up();
    world_setup::spawn_power_up(
        world,
        PowerUp {
            id,
            kind,
            spawned_at_ms: now_ms,
            expires_at_ms: now_ms + POWER_UP_LIFETIME_MS,
        },
        position,
    );
    Some((id, kind))
}

/// Unexpired power-up by id.
pub fn find(world: &World, id: PowerUpId, now_ms: f64) -> Option<(Entity, PowerUpKind)> {
    world
        .query::<&PowerUp>()
        .iter()
        .find(|(_, p)| p.id == id && now_ms < p.expires_at_ms)
        .map(|(e, p)| (e, p.kind))
}

/// Unexpired power-up nearest a ground point, within `radius`.
pub fn nearest(world: &World, at: &Position, radius: f64, now_ms: f64) -> Option<PowerUpId> {
    world
        .query::<(&PowerUp, &Position)>()
        .iter()
        .filter(|(_, (p, pos))| now_ms < p.expires_at_ms && pos.horizontal_range_to(at) <= radius)
        .min_by(|(_, (_, a)), (_, (_, b))| a.horizontal_range_to(at).total_cmp(&b.horizontal_range_to(at)))
        .map(|(_, (p, _))| p.id)
}
