//! Threat lifecycle: damage, neutralization, stealth reveal and fade-out.
//!
//! active -> neutralized -> (fading) -> removed, or active -> crater -> removed.
//! Opacity is a pure function of `(now, fade_start, fade_duration)`.

use hecs::{Entity, World};

use threatsim_core::components::{Health, ThreatInfo};
use threatsim_core::constants::STEALTH_REVEAL_RANGE;
use threatsim_core::enums::{ThreatKind, ThreatStatus};
use threatsim_core::types::{Position, ThreatId, Velocity};

/// `1 − (now − fade_start) / duration`, clamped to `[0, 1]`.
pub fn fade_opacity(now_ms: f64, fade_start_ms: f64, fade_duration_ms: f64) -> f64 {
    (1.0 - (now_ms - fade_start_ms) / fade_duration_ms).clamp(0.0, 1.0)
}

/// Display opacity of a threat at `now_ms`.
pub fn opacity(info: &ThreatInfo, now_ms: f64, fade_duration_ms: f64) -> f64 {
    match (info.status, info.fade_start_ms) {
        (ThreatStatus::Neutralized, Some(start)) => fade_opacity(now_ms, start, fade_duration_ms),
        (ThreatStatus::Active, _) => 1.0,
        _ => 0.0,
    }
}

/// A threat that just went from active to neutralized.
#[derive(Debug, Clone, Copy)]
pub struct Neutralization {
    pub id: ThreatId,
    pub kind: ThreatKind,
    pub position: Position,
}

/// Apply damage to a threat entity. Inactive threats ignore hits.
/// Returns the neutralization if this hit finished it.
pub fn apply_damage(world: &mut World, entity: Entity, damage: f64, now_ms: f64) -> Option<Neutralization> {
    let mut query = world
        .query_one::<(&mut ThreatInfo, &mut Health, &mut Velocity, &Position)>(entity)
        .ok()?;
    let (info, health, velocity, position) = query.get()?;
    if !info.is_active() {
        return None;
    }
    if health.apply_damage(damage) && info.neutralize(now_ms) {
        // Wrecks drift no further while fading.
        *velocity = Velocity::default();
        return Some(Neutralization {
            id: info.id,
            kind: info.kind,
            position: *position,
        });
    }
    None
}

/// Find the entity of a threat by id.
pub fn find_threat(world: &World, id: ThreatId) -> Option<Entity> {
    world
        .query::<&ThreatInfo>()
        .iter()
        .find(|(_, info)| info.id == id)
        .map(|(entity, _)| entity)
}

/// Reveal stealth threats inside the asset's reveal range or any reveal zone.
/// Reveal is permanent.
pub fn reveal(world: &mut World, reveal_zones: &[(Position, f64)]) -> Vec<ThreatId> {
    let mut revealed = Vec::new();
    for (_entity, (info, pos)) in world.query_mut::<(&mut ThreatInfo, &Position)>() {
        if info.revealed || !info.is_active() {
            continue;
        }
        let in_zone = reveal_zones
            .iter()
            .any(|(center, range)| pos.horizontal_range_to(center) <= *range);
        if pos.range_from_origin() <= STEALTH_REVEAL_RANGE || in_zone {
            info.revealed = true;
            revealed.push(info.id);
        }
    }
    revealed
}
