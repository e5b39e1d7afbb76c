//! Cleanup system: removes craters, faded wrecks, strays and expired pickups.

use hecs::{Entity, World};

use threatsim_core::components::{PowerUp, ThreatInfo};
use threatsim_core::constants::WORLD_RADIUS;
use threatsim_core::enums::ThreatStatus;
use threatsim_core::types::{Position, ThreatId};

use crate::systems::lifecycle;

/// Remove dead entities. Uses a pre-allocated buffer to avoid per-tick
/// allocation. Returns ids of threats that left the world while still active.
pub fn run(
    world: &mut World,
    despawn_buffer: &mut Vec<Entity>,
    now_ms: f64,
    fade_duration_ms: f64,
) -> Vec<ThreatId> {
    despawn_buffer.clear();
    let mut strays = Vec::new();

    let radius_sq = WORLD_RADIUS * WORLD_RADIUS;

    for (entity, (info, pos)) in world.query::<(&ThreatInfo, &Position)>().iter() {
        let gone = match info.status {
            ThreatStatus::Crater => true,
            ThreatStatus::Neutralized => lifecycle::opacity(info, now_ms, fade_duration_ms) <= 0.0,
            ThreatStatus::Active => {
                let out = pos.x * pos.x + pos.y * pos.y > radius_sq;
                if out {
                    strays.push(info.id);
                }
                out
            }
        };
        if gone {
            despawn_buffer.push(entity);
        }
    }

    for (entity, power_up) in world.query::<&PowerUp>().iter() {
        if now_ms >= power_up.expires_at_ms {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    strays
}
