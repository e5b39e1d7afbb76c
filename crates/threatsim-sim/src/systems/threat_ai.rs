//! Threat AI system: updates threat behavior each tick.
//!
//! Calls the threat FSM from threatsim-threat-ai to steer each active threat
//! and compute phase transitions. Threats reaching Impact become craters.

use hecs::World;

use threatsim_core::components::{ThreatBehavior, ThreatInfo};
use threatsim_core::enums::{ThreatKind, ThreatPhase};
use threatsim_core::types::{Position, ThreatId, Velocity};

use threatsim_threat_ai::fsm::{evaluate, ThreatContext};

/// A threat that reached its target this tick.
#[derive(Debug, Clone, Copy)]
pub struct Impact {
    pub id: ThreatId,
    pub kind: ThreatKind,
    pub position: Position,
    /// What it was flying at: the asset, or a decoy.
    pub target: Position,
}

/// Run the threat AI system: evaluate the FSM for each active threat, apply updates.
pub fn run(world: &mut World, now_ms: f64) -> Vec<Impact> {
    let mut impacts = Vec::new();

    for (_entity, (info, pos, vel, behavior)) in
        world.query_mut::<(&mut ThreatInfo, &Position, &mut Velocity, &mut ThreatBehavior)>()
    {
        if !info.is_active() {
            continue;
        }

        let ctx = ThreatContext {
            kind: info.kind,
            phase: behavior.phase,
            position: *pos,
            velocity: *vel,
            target: behavior.target,
            cruise_speed: behavior.cruise_speed,
            age_secs: (now_ms - info.spawned_at_ms).max(0.0) / 1000.0,
            weave_offset: behavior.weave_offset,
        };

        let update = evaluate(&ctx);
        *vel = update.new_velocity;
        if update.phase_changed {
            behavior.phase = update.new_phase;
            behavior.phase_started_ms = now_ms;
        }

        if update.new_phase == ThreatPhase::Impact && info.crater() {
            impacts.push(Impact {
                id: info.id,
                kind: info.kind,
                position: *pos,
                target: behavior.target,
            });
        }
    }

    impacts
}
