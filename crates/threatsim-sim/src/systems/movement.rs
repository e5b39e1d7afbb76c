//! Kinematic integration system.
//!
//! Updates Position from Velocity each tick: position += velocity × dt, with
//! dt already clamped by the clock. Slow zones scale threat motion. Also
//! records the position trail.

use hecs::World;

use threatsim_core::components::{PositionHistory, ThreatInfo};
use threatsim_core::types::{Position, Velocity};

/// Zone in which threats move at `factor` of their speed.
#[derive(Debug, Clone, Copy)]
pub struct SlowZone {
    pub center: Position,
    pub range: f64,
    pub factor: f64,
}

/// Strongest slow factor affecting `pos` (1.0 when none).
pub fn slow_factor(pos: &Position, zones: &[SlowZone]) -> f64 {
    zones
        .iter()
        .filter(|z| pos.horizontal_range_to(&z.center) <= z.range)
        .map(|z| z.factor)
        .fold(1.0, f64::min)
}

/// Integrate active threats. Altitude never goes below ground.
pub fn run(world: &mut World, dt_secs: f64, slow_zones: &[SlowZone]) {
    for (_entity, (info, pos, vel)) in world.query_mut::<(&ThreatInfo, &mut Position, &Velocity)>() {
        if !info.is_active() {
            continue;
        }
        let step = dt_secs * slow_factor(pos, slow_zones);
        pos.x += vel.x * step;
        pos.y += vel.y * step;
        pos.z = (pos.z + vel.z * step).max(0.0);
    }
}

/// Append the current position to each active threat's trail.
pub fn update_history(world: &mut World) {
    for (_entity, (info, pos, history)) in
        world.query_mut::<(&ThreatInfo, &Position, &mut PositionHistory)>()
    {
        if info.is_active() {
            history.record(*pos);
        }
    }
}
