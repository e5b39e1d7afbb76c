//! Snapshot builders: query the ECS world and produce the entity views of a
//! `GameStateSnapshot`.
//!
//! Read-only: never modifies the world.

use hecs::World;

use threatsim_core::components::*;
use threatsim_core::state::{BayView, DroneView, PowerUpView, ThreatView};
use threatsim_core::types::{Position, Velocity};

use crate::selection::SelectionState;
use crate::systems::lifecycle;

/// Every threat still in the world, sorted by id. Hidden stealth contacts
/// are included with `revealed: false`; the presentation layer decides.
pub fn build_threats(
    world: &World,
    selection: &SelectionState,
    now_ms: f64,
    fade_duration_ms: f64,
) -> Vec<ThreatView> {
    let origin = Position::default();
    let mut threats: Vec<ThreatView> = world
        .query::<(
            &ThreatInfo,
            &Position,
            &Velocity,
            &Health,
            &PositionHistory,
            &ThreatBehavior,
        )>()
        .iter()
        .map(|(_, (info, pos, vel, health, history, behavior))| ThreatView {
            id: info.id,
            kind: info.kind,
            status: info.status,
            phase: behavior.phase,
            position: *pos,
            range: pos.range_from_origin(),
            bearing: origin.bearing_to(pos),
            speed: vel.speed(),
            heading: vel.heading(),
            health: health.current,
            max_health: health.max,
            opacity: lifecycle::opacity(info, now_ms, fade_duration_ms),
            revealed: info.revealed,
            selected: selection.is_selected(info.id),
            priority: selection.priority(info.id),
            trail: history.positions.iter().copied().collect(),
        })
        .collect();

    threats.sort_by_key(|t| t.id);
    threats
}

pub fn build_drones(world: &World) -> Vec<DroneView> {
    let mut drones: Vec<DroneView> = world
        .query::<(&DroneUnit, &Position)>()
        .iter()
        .map(|(_, (drone, pos))| DroneView {
            id: drone.id,
            role: drone.role,
            status: drone.status,
            position: *pos,
            station: drone.station,
            energy: drone.energy,
            max_energy: drone.max_energy,
            bay_id: drone.bay_id,
        })
        .collect();

    drones.sort_by_key(|d| d.id);
    drones
}

pub fn build_bays(bays: &[DeploymentBay]) -> Vec<BayView> {
    bays.iter()
        .map(|bay| BayView {
            id: bay.id,
            position: bay.position,
            capacity: bay.capacity,
            occupied: bay.occupied,
        })
        .collect()
}

/// Unexpired power-ups, sorted by id.
pub fn build_power_ups(world: &World, now_ms: f64) -> Vec<PowerUpView> {
    let mut power_ups: Vec<PowerUpView> = world
        .query::<(&PowerUp, &Position)>()
        .iter()
        .filter(|(_, (p, _))| now_ms < p.expires_at_ms)
        .map(|(_, (p, pos))| PowerUpView {
            id: p.id,
            kind: p.kind,
            position: *pos,
            remaining_ms: p.expires_at_ms - now_ms,
        })
        .collect();

    power_ups.sort_by_key(|p| p.id);
    power_ups
}
