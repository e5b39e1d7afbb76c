//! Threat behavior finite state machine.
//!
//! Pure functions that compute phase transitions and steering for threat
//! entities based on their kind, current phase, and situation.
//! No ECS dependency; operates on plain data.

use glam::DVec2;

use threatsim_core::constants::IMPACT_RANGE;
use threatsim_core::enums::{ThreatKind, ThreatPhase};
use threatsim_core::types::{Position, Velocity};

use crate::profiles::{get_profile, ThreatBehaviorProfile};

/// Input to the threat FSM for a single entity.
pub struct ThreatContext {
    pub kind: ThreatKind,
    pub phase: ThreatPhase,
    pub position: Position,
    pub velocity: Velocity,
    /// Point the threat is flying at (asset or decoy).
    pub target: Position,
    /// Speed after spawn jitter.
    pub cruise_speed: f64,
    /// Seconds since spawn, drives the weave.
    pub age_secs: f64,
    pub weave_offset: f64,
}

/// Output from the threat FSM.
pub struct ThreatUpdate {
    pub new_phase: ThreatPhase,
    pub new_velocity: Velocity,
    pub phase_changed: bool,
}

/// Evaluate the FSM for one threat. Returns the updated phase and velocity.
pub fn evaluate(ctx: &ThreatContext) -> ThreatUpdate {
    if ctx.phase == ThreatPhase::Impact {
        return ThreatUpdate {
            new_phase: ThreatPhase::Impact,
            new_velocity: Velocity::default(),
            phase_changed: false,
        };
    }

    let profile = get_profile(ctx.kind);
    let range = ctx.position.horizontal_range_to(&ctx.target);

    if range <= IMPACT_RANGE {
        return ThreatUpdate {
            new_phase: ThreatPhase::Impact,
            new_velocity: Velocity::default(),
            phase_changed: true,
        };
    }

    let new_phase = match ctx.phase {
        ThreatPhase::Inbound if range <= profile.terminal_range => ThreatPhase::Terminal,
        phase => phase,
    };

    ThreatUpdate {
        new_phase,
        new_velocity: steer(ctx, &profile, new_phase, range),
        phase_changed: new_phase != ctx.phase,
    }
}

/// Head for the target at phase speed, with weave and descent applied.
fn steer(ctx: &ThreatContext, profile: &ThreatBehaviorProfile, phase: ThreatPhase, range: f64) -> Velocity {
    let to_target = DVec2::new(ctx.target.x - ctx.position.x, ctx.target.y - ctx.position.y);
    let Some(dir) = to_target.try_normalize() else {
        return Velocity::default();
    };

    let speed = match phase {
        ThreatPhase::Terminal => ctx.cruise_speed * profile.terminal_speed_factor,
        _ => ctx.cruise_speed,
    };

    let mut horizontal = dir * speed;
    if profile.weave_speed > 0.0 && phase == ThreatPhase::Inbound {
        let omega = std::f64::consts::TAU * profile.weave_frequency_hz;
        let lateral = profile.weave_speed * (omega * ctx.age_secs + ctx.weave_offset).sin();
        horizontal += dir.perp() * lateral;
    }

    let vz = match phase {
        ThreatPhase::Terminal => descent_rate(ctx.position.z, speed, range, profile.terminal_dive),
        _ => 0.0,
    };

    Velocity::new(horizontal.x, horizontal.y, vz)
}

/// Vertical speed that brings the threat down to the ground by the time it
/// reaches impact range. A dive gets there in half the distance.
fn descent_rate(altitude: f64, speed: f64, range: f64, dive: bool) -> f64 {
    if altitude <= 0.0 {
        return 0.0;
    }
    let mut run = (range - IMPACT_RANGE).max(1.0);
    if dive {
        run *= 0.5;
    }
    -(altitude * speed / run)
}
