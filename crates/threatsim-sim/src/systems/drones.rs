//! Drone system: flight, energy drain, role effects, collisions and recovery.
//!
//! Drones launch from a bay, fly to their station, act while on station, and
//! fly home when drained or recalled. A drone that lands back at its bay, or
//! is disabled, is removed and its bay slot freed.

use hecs::{Entity, World};

use threatsim_core::catalog::{drone_spec, RoleEffect};
use threatsim_core::components::{DeploymentBay, DroneUnit, ThreatBehavior, ThreatInfo};
use threatsim_core::constants::*;
use threatsim_core::enums::{DroneRole, DroneStatus};
use threatsim_core::types::{DroneId, Position};

use crate::systems::movement::SlowZone;

/// Aggregate effect of all drones on station this tick.
#[derive(Debug, Clone, Default)]
pub struct DroneEffects {
    pub slow_zones: Vec<SlowZone>,
    pub reveal_zones: Vec<(Position, f64)>,
    pub energy_regen_bonus: f64,
    pub cooling_regen_bonus: f64,
}

#[derive(Debug, Default)]
pub struct DroneTick {
    pub effects: DroneEffects,
    /// Threat entity and damage dealt by strike drones.
    pub strikes: Vec<(Entity, f64)>,
    /// Threat entity and damage dealt by colliding drones.
    pub collisions: Vec<(Entity, f64)>,
    pub returned: Vec<(DroneId, DroneRole)>,
    pub disabled: Vec<(DroneId, DroneRole)>,
    /// Drones that ran dry and turned for home.
    pub depleted: Vec<(DroneId, DroneRole)>,
}

/// Airborne drones of a role (anything not yet removed or disabled).
pub fn count_airborne(world: &World, role: DroneRole) -> u32 {
    world
        .query::<&DroneUnit>()
        .iter()
        .filter(|(_, d)| d.role == role && d.is_airborne())
        .count() as u32
}

/// Nearest bay with a free slot.
pub fn nearest_free_bay(bays: &[DeploymentBay], to: &Position) -> Option<usize> {
    bays.iter()
        .enumerate()
        .filter(|(_, bay)| bay.has_free_slot())
        .min_by(|(_, a), (_, b)| {
            a.position
                .horizontal_range_to(to)
                .total_cmp(&b.position.horizontal_range_to(to))
        })
        .map(|(i, _)| i)
}

/// Disable the decoy drone nearest `pos` within `radius`. It is removed on
/// the next drone pass.
pub fn disable_decoy_near(world: &mut World, pos: &Position, radius: f64) -> Option<DroneId> {
    let mut best: Option<(f64, &mut DroneUnit)> = None;
    for (_entity, (drone, dpos)) in world.query_mut::<(&mut DroneUnit, &Position)>() {
        if drone.role != DroneRole::Deception || !drone.is_airborne() {
            continue;
        }
        let d = dpos.horizontal_range_to(pos);
        if d <= radius && best.as_ref().map_or(true, |(bd, _)| d < *bd) {
            best = Some((d, drone));
        }
    }
    best.map(|(_, drone)| {
        drone.status = DroneStatus::Disabled;
        drone.id
    })
}

/// Move `pos` toward `dest` by at most `step`. Returns true on arrival.
fn fly_toward(pos: &mut Position, dest: &Position, step: f64) -> bool {
    let dist = pos.range_to(dest);
    if dist <= DRONE_ARRIVAL_RADIUS.max(step) {
        *pos = *dest;
        return true;
    }
    let f = step / dist;
    pos.x += (dest.x - pos.x) * f;
    pos.y += (dest.y - pos.y) * f;
    pos.z += (dest.z - pos.z) * f;
    false
}

/// Run one drone pass.
pub fn run(world: &mut World, bays: &mut [DeploymentBay], dt_secs: f64) -> DroneTick {
    let mut tick = DroneTick::default();
    let mut decoys: Vec<(Position, f64)> = Vec::new();
    let mut remove: Vec<(Entity, u32)> = Vec::new();

    let threats: Vec<(Entity, Position)> = world
        .query::<(&ThreatInfo, &Position)>()
        .iter()
        .filter(|(_, (info, _))| info.is_active())
        .map(|(e, (_, pos))| (e, *pos))
        .collect();
    let bay_positions: Vec<(u32, Position)> = bays
        .iter()
        .map(|b| (b.id, Position::new(b.position.x, b.position.y, DRONE_ALTITUDE)))
        .collect();

    for (entity, (drone, pos)) in world.query_mut::<(&mut DroneUnit, &mut Position)>() {
        if drone.status == DroneStatus::Disabled {
            remove.push((entity, drone.bay_id));
            continue;
        }

        if let Some((threat, _)) = threats
            .iter()
            .find(|(_, tpos)| tpos.range_to(pos) <= DRONE_COLLISION_RADIUS)
        {
            drone.status = DroneStatus::Disabled;
            tick.collisions.push((*threat, DRONE_COLLISION_DAMAGE));
            tick.disabled.push((drone.id, drone.role));
            remove.push((entity, drone.bay_id));
            continue;
        }

        let spec = drone_spec(drone.role);
        let step = DRONE_SPEED * dt_secs;

        if drone.status == DroneStatus::Returning {
            let home = bay_positions
                .iter()
                .find(|(id, _)| *id == drone.bay_id)
                .map_or(Position::new(0.0, 0.0, DRONE_ALTITUDE), |(_, p)| *p);
            if fly_toward(pos, &home, step) {
                tick.returned.push((drone.id, drone.role));
                remove.push((entity, drone.bay_id));
            }
            continue;
        }

        drone.energy = (drone.energy - spec.drain_per_sec * dt_secs).max(0.0);
        if drone.energy <= 0.0 {
            drone.status = DroneStatus::Returning;
            tick.depleted.push((drone.id, drone.role));
            continue;
        }

        if !fly_toward(pos, &drone.station, step) {
            drone.status = DroneStatus::Idle;
            continue;
        }

        let here = *pos;
        let nearby = &threats;
        let in_range = move |range: f64| {
            nearby
                .iter()
                .filter(move |(_, tpos)| tpos.horizontal_range_to(&here) <= range)
        };
        let acting = match spec.effect {
            RoleEffect::Strike { damage_per_sec } => {
                let nearest = in_range(spec.effect_range).min_by(|(_, a), (_, b)| {
                    a.horizontal_range_to(&here).total_cmp(&b.horizontal_range_to(&here))
                });
                match nearest {
                    Some((threat, _)) => {
                        tick.strikes.push((*threat, damage_per_sec * dt_secs));
                        true
                    }
                    None => false,
                }
            }
            RoleEffect::Slow { factor } => {
                tick.effects.slow_zones.push(SlowZone {
                    center: here,
                    range: spec.effect_range,
                    factor,
                });
                in_range(spec.effect_range).next().is_some()
            }
            RoleEffect::Reveal => {
                tick.effects.reveal_zones.push((here, spec.effect_range));
                true
            }
            RoleEffect::EnergyRegen { per_sec } => {
                tick.effects.energy_regen_bonus += per_sec;
                true
            }
            RoleEffect::CoolingRegen { per_sec } => {
                tick.effects.cooling_regen_bonus += per_sec;
                true
            }
            RoleEffect::Decoy => {
                decoys.push((here, spec.effect_range));
                true
            }
        };
        drone.status = if acting { DroneStatus::Active } else { DroneStatus::Idle };
    }

    for (entity, bay_id) in remove {
        if world.despawn(entity).is_ok() {
            if let Some(bay) = bays.iter_mut().find(|b| b.id == bay_id) {
                bay.occupied = bay.occupied.saturating_sub(1);
            }
        }
    }

    retarget(world, &decoys);
    tick
}

/// Point each active threat at the nearest decoy in range, or back at the asset.
fn retarget(world: &mut World, decoys: &[(Position, f64)]) {
    for (_entity, (info, pos, behavior)) in
        world.query_mut::<(&ThreatInfo, &Position, &mut ThreatBehavior)>()
    {
        if !info.is_active() {
            continue;
        }
        behavior.target = decoys
            .iter()
            .filter(|(dpos, range)| dpos.horizontal_range_to(pos) <= *range)
            .min_by(|(a, _), (b, _)| a.horizontal_range_to(pos).total_cmp(&b.horizontal_range_to(pos)))
            .map_or(Position::default(), |(dpos, _)| *dpos);
    }
}

#[cfg(test)]
mod tests {
    use threatsim_core::components::Health;
    use threatsim_core::enums::{ThreatKind, ThreatPhase};

    use super::*;
    use crate::world_setup::{build_bays, spawn_drone};

    fn launch(world: &mut World, bays: &mut [DeploymentBay], id: DroneId, role: DroneRole, station: Position) -> Entity {
        let idx = nearest_free_bay(bays, &station).unwrap();
        bays[idx].occupied += 1;
        let spec = drone_spec(role);
        let drone = DroneUnit::new(id, role, spec.max_energy, station, bays[idx].id, 0.0);
        spawn_drone(world, drone, bays[idx].position)
    }

    fn threat_at(world: &mut World, id: u32, pos: Position) -> Entity {
        world.spawn((
            ThreatInfo::new(id, ThreatKind::SingleDrone, 0.0),
            pos,
            Health::new(50.0).unwrap(),
            ThreatBehavior {
                phase: ThreatPhase::Inbound,
                target: Position::default(),
                phase_started_ms: 0.0,
                weave_offset: 0.0,
                cruise_speed: 40.0,
            },
        ))
    }

    #[test]
    fn test_nearest_free_bay() {
        let mut bays = build_bays();
        let north = Position::new(0.0, 500.0, 0.0);
        assert_eq!(bays[nearest_free_bay(&bays, &north).unwrap()].id, 0);
        for bay in bays.iter_mut() {
            bay.occupied = bay.capacity;
        }
        assert!(nearest_free_bay(&bays, &north).is_none());
    }

    #[test]
    fn test_drone_reaches_station_and_strikes() {
        let mut world = World::new();
        let mut bays = build_bays();
        let station = Position::new(0.0, 120.0, DRONE_ALTITUDE);
        launch(&mut world, &mut bays, 1, DroneRole::Guard, station);
        let threat = threat_at(&mut world, 9, Position::new(0.0, 200.0, 120.0));

        let mut struck = false;
        for _ in 0..40 {
            let tick = run(&mut world, &mut bays, 0.1);
            if let Some((e, dmg)) = tick.strikes.first() {
                assert_eq!(*e, threat);
                assert!(*dmg > 0.0);
                struck = true;
                break;
            }
        }
        assert!(struck, "guard drone should engage a threat in range");
    }

    #[test]
    fn test_collision_disables_and_frees_bay() {
        let mut world = World::new();
        let mut bays = build_bays();
        let station = Position::new(0.0, 300.0, DRONE_ALTITUDE);
        launch(&mut world, &mut bays, 1, DroneRole::Recon, station);
        // Threat sitting right on top of the launch point.
        threat_at(&mut world, 9, Position::new(0.0, BAY_RADIUS, DRONE_ALTITUDE));
        let tick = run(&mut world, &mut bays, 0.016);
        assert_eq!(tick.disabled, vec![(1, DroneRole::Recon)]);
        assert_eq!(tick.collisions.len(), 1);
        assert_eq!(count_airborne(&world, DroneRole::Recon), 0);
        assert_eq!(bays[0].occupied, 0);
    }

    #[test]
    fn test_drained_drone_returns_home() {
        let mut world = World::new();
        let mut bays = build_bays();
        let station = Position::new(0.0, 100.0, DRONE_ALTITUDE);
        let e = launch(&mut world, &mut bays, 1, DroneRole::Support, station);
        world.get::<&mut DroneUnit>(e).unwrap().energy = 0.1;

        let tick = run(&mut world, &mut bays, 0.1);
        assert_eq!(tick.depleted, vec![(1, DroneRole::Support)]);

        let mut landed = false;
        for _ in 0..100 {
            if !run(&mut world, &mut bays, 0.1).returned.is_empty() {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(bays.iter().map(|b| b.occupied).sum::<u32>(), 0);
    }

    #[test]
    fn test_decoy_pulls_threats() {
        let mut world = World::new();
        let mut bays = build_bays();
        let station = Position::new(200.0, 0.0, DRONE_ALTITUDE);
        let e = launch(&mut world, &mut bays, 1, DroneRole::Deception, station);
        // Skip the transit.
        *world.get::<&mut Position>(e).unwrap() = station;
        let near = threat_at(&mut world, 5, Position::new(300.0, 50.0, 100.0));
        let far = threat_at(&mut world, 6, Position::new(-600.0, 0.0, 100.0));

        run(&mut world, &mut bays, 0.016);
        assert_eq!(world.get::<&ThreatBehavior>(near).unwrap().target, station);
        assert_eq!(world.get::<&ThreatBehavior>(far).unwrap().target, Position::default());

        assert_eq!(disable_decoy_near(&mut world, &station, IMPACT_RANGE), Some(1));
        run(&mut world, &mut bays, 0.016);
        assert_eq!(world.get::<&ThreatBehavior>(near).unwrap().target, Position::default());
    }
}
