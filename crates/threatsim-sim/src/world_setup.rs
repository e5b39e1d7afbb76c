//! Entity spawn factories for setting up the simulation world.
//!
//! Creates threat, drone and power-up entities with their component bundles,
//! and lays out the deployment bays.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use threatsim_core::components::*;
use threatsim_core::constants::*;
use threatsim_core::enums::*;
use threatsim_core::types::{DroneId, Position, PowerUpId, ThreatId, Velocity};

use threatsim_threat_ai::profiles::get_profile;

use crate::config::SpawnBounds;

/// Monotonic id counters. Ids are never reused within a session.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_threat: ThreatId,
    next_drone: DroneId,
    next_power_up: PowerUpId,
}

impl IdAllocator {
    pub fn threat(&mut self) -> ThreatId {
        self.next_threat += 1;
        self.next_threat
    }

    pub fn drone(&mut self) -> DroneId {
        self.next_drone += 1;
        self.next_drone
    }

    pub fn power_up(&mut self) -> PowerUpId {
        self.next_power_up += 1;
        self.next_power_up
    }
}

/// Bays on the four compass points around the asset.
pub fn build_bays() -> Vec<DeploymentBay> {
    (0..BAY_COUNT)
        .map(|i| {
            let bearing = i as f64 * std::f64::consts::TAU / BAY_COUNT as f64;
            DeploymentBay {
                id: i,
                position: Position::new(BAY_RADIUS * bearing.sin(), BAY_RADIUS * bearing.cos(), 0.0),
                capacity: BAY_CAPACITY,
                occupied: 0,
            }
        })
        .collect()
}

/// Spawn a threat with explicit kinematics. Used by scripted scenarios and
/// by the random spawner below.
#[allow(clippy::too_many_arguments)]
pub fn spawn_threat_at(
    world: &mut World,
    id: ThreatId,
    kind: ThreatKind,
    position: Position,
    velocity: Velocity,
    now_ms: f64,
    trail_capacity: usize,
    weave_offset: f64,
) -> Entity {
    let profile = get_profile(kind);
    let cruise_speed = match velocity.horizontal_speed() {
        s if s > 0.0 => s,
        _ => profile.cruise_speed,
    };
    let mut trail = PositionHistory::with_capacity(trail_capacity);
    trail.record(position);

    world.spawn((
        ThreatInfo::new(id, kind, now_ms),
        position,
        velocity,
        Health {
            current: profile.max_health,
            max: profile.max_health,
        },
        trail,
        ThreatBehavior {
            phase: ThreatPhase::Inbound,
            target: Position::default(),
            phase_started_ms: now_ms,
            weave_offset,
            cruise_speed,
        },
    ))
}

/// Spawn one threat on a random bearing inside the spawn ring, heading for the asset.
pub fn spawn_threat(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    id: ThreatId,
    kind: ThreatKind,
    bounds: &SpawnBounds,
    now_ms: f64,
    trail_capacity: usize,
) -> Entity {
    let bearing = rng.gen_range(0.0..std::f64::consts::TAU);
    let radius = rng.gen_range(bounds.min_radius..bounds.max_radius);
    spawn_on_bearing(world, rng, id, kind, bearing, radius, 0.0, bounds, now_ms, trail_capacity)
}

/// Spawn a swarm group abreast on one bearing. Returns the new ids.
pub fn spawn_swarm(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    ids: &mut IdAllocator,
    count: u32,
    bounds: &SpawnBounds,
    now_ms: f64,
    trail_capacity: usize,
) -> Vec<ThreatId> {
    let bearing = rng.gen_range(0.0..std::f64::consts::TAU);
    let radius = rng.gen_range(bounds.min_radius..bounds.max_radius);
    let center = (count as f64 - 1.0) / 2.0;
    (0..count)
        .map(|i| {
            let id = ids.threat();
            let lateral = (i as f64 - center) * SWARM_SPACING;
            spawn_on_bearing(
                world,
                rng,
                id,
                ThreatKind::SwarmMember,
                bearing,
                radius,
                lateral,
                bounds,
                now_ms,
                trail_capacity,
            );
            id
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn spawn_on_bearing(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    id: ThreatId,
    kind: ThreatKind,
    bearing: f64,
    radius: f64,
    lateral_offset: f64,
    bounds: &SpawnBounds,
    now_ms: f64,
    trail_capacity: usize,
) -> Entity {
    let profile = get_profile(kind);
    // Lateral offset runs perpendicular to the bearing.
    let x = radius * bearing.sin() + lateral_offset * bearing.cos();
    let y = radius * bearing.cos() - lateral_offset * bearing.sin();
    let position = Position::new(x, y, profile.cruise_altitude);

    let jitter = if bounds.speed_jitter > 0.0 {
        rng.gen_range(-bounds.speed_jitter..bounds.speed_jitter)
    } else {
        0.0
    };
    let speed = profile.cruise_speed * (1.0 + jitter);
    let heading = (bearing + std::f64::consts::PI)
        + rng.gen_range(-SPAWN_HEADING_JITTER..SPAWN_HEADING_JITTER);
    let velocity = Velocity::new(speed * heading.sin(), speed * heading.cos(), 0.0);
    let weave_offset = rng.gen_range(0.0..std::f64::consts::TAU);

    spawn_threat_at(world, id, kind, position, velocity, now_ms, trail_capacity, weave_offset)
}

/// Launch a drone from its bay toward a station.
pub fn spawn_drone(world: &mut World, drone: DroneUnit, bay_position: Position) -> Entity {
    let start = Position::new(bay_position.x, bay_position.y, DRONE_ALTITUDE);
    world.spawn((drone, start))
}

pub fn spawn_power_up(world: &mut World, power_up: PowerUp, position: Position) -> Entity {
    world.spawn((power_up, Position::new(position.x, position.y, 0.0)))
}
