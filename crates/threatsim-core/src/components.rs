//! ECS components for hecs entities.
//!
//! Components are plain data. The only methods are validating constructors
//! and the guarded status transitions; game logic lives in systems.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::error::ConfigError;
use crate::types::{DroneId, Position, PowerUpId, ThreatId};

/// Identity and lifecycle status of a threat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatInfo {
    pub id: ThreatId,
    pub kind: ThreatKind,
    pub status: ThreatStatus,
    /// Sim time at spawn (ms).
    pub spawned_at_ms: f64,
    /// Sim time of neutralization. Set once, never cleared.
    pub fade_start_ms: Option<f64>,
    /// Visible to direct targeting. Always true for non-stealth kinds.
    pub revealed: bool,
}

impl ThreatInfo {
    pub fn new(id: ThreatId, kind: ThreatKind, spawned_at_ms: f64) -> Self {
        Self {
            id,
            kind,
            status: ThreatStatus::Active,
            spawned_at_ms,
            fade_start_ms: None,
            revealed: kind != ThreatKind::Stealth,
        }
    }

    /// Active -> Neutralized. Returns false (and changes nothing) otherwise.
    pub fn neutralize(&mut self, now_ms: f64) -> bool {
        if !self.status.can_transition_to(ThreatStatus::Neutralized) {
            return false;
        }
        self.status = ThreatStatus::Neutralized;
        self.fade_start_ms = Some(now_ms);
        true
    }

    /// Active -> Crater. Returns false (and changes nothing) otherwise.
    pub fn crater(&mut self) -> bool {
        if !self.status.can_transition_to(ThreatStatus::Crater) {
            return false;
        }
        self.status = ThreatStatus::Crater;
        true
    }

    pub fn is_active(&self) -> bool {
        self.status == ThreatStatus::Active
    }

    /// Whether selection and fire-at may reference this threat.
    pub fn is_targetable(&self) -> bool {
        self.is_active() && self.revealed
    }
}

/// Hit points in `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    /// Full health. Rejects a non-positive or non-finite maximum.
    pub fn new(max: f64) -> Result<Self, ConfigError> {
        Self::with_current(max, max)
    }

    pub fn with_current(current: f64, max: f64) -> Result<Self, ConfigError> {
        if !max.is_finite() || max <= 0.0 || !(0.0..=max).contains(&current) {
            return Err(ConfigError::InvalidHealth { value: current, max });
        }
        Ok(Self { current, max })
    }

    /// Subtract damage, flooring at zero. Returns true if this depleted it.
    pub fn apply_damage(&mut self, amount: f64) -> bool {
        let was_alive = self.current > 0.0;
        self.current = (self.current - amount.max(0.0)).max(0.0);
        was_alive && self.current <= 0.0
    }

    pub fn fraction(&self) -> f64 {
        self.current / self.max
    }
}

/// Bounded trail of recent positions, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionHistory {
    pub positions: VecDeque<Position>,
    pub capacity: usize,
}

impl PositionHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest once full.
    pub fn record(&mut self, pos: Position) {
        if self.capacity == 0 {
            return;
        }
        while self.positions.len() >= self.capacity {
            self.positions.pop_front();
        }
        self.positions.push_back(pos);
    }
}

/// Scripted flight state of a threat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatBehavior {
    pub phase: ThreatPhase,
    /// Point the threat is flying at. The asset, or a decoy drone.
    pub target: Position,
    /// Sim time the current phase began (ms).
    pub phase_started_ms: f64,
    /// Per-threat offset into the weave cycle (radians).
    pub weave_offset: f64,
    /// Cruise speed after spawn jitter.
    pub cruise_speed: f64,
}

/// A friendly drone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneUnit {
    pub id: DroneId,
    pub role: DroneRole,
    pub status: DroneStatus,
    pub energy: f64,
    pub max_energy: f64,
    /// Assigned station (ground-plane target at deploy altitude).
    pub station: Position,
    /// Bay the drone launched from and returns to.
    pub bay_id: u32,
    pub deployed_at_ms: f64,
}

impl DroneUnit {
    pub fn new(
        id: DroneId,
        role: DroneRole,
        max_energy: f64,
        station: Position,
        bay_id: u32,
        deployed_at_ms: f64,
    ) -> Self {
        Self {
            id,
            role,
            status: DroneStatus::Idle,
            energy: max_energy,
            max_energy,
            station,
            bay_id,
            deployed_at_ms,
        }
    }

    /// Still flying and able to act or return.
    pub fn is_airborne(&self) -> bool {
        self.status != DroneStatus::Disabled
    }
}

/// A launch point for drones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentBay {
    pub id: u32,
    pub position: Position,
    pub capacity: u32,
    /// Drones currently out from this bay.
    pub occupied: u32,
}

impl DeploymentBay {
    pub fn has_free_slot(&self) -> bool {
        self.occupied < self.capacity
    }
}

/// A pickup dropped by a neutralized threat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: PowerUpId,
    pub kind: PowerUpKind,
    pub spawned_at_ms: f64,
    pub expires_at_ms: f64,
}

/// Per-weapon state. The cooldown clock survives weapon switches and unequips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponState {
    pub kind: WeaponKind,
    pub phase: WeaponPhase,
    /// Sim time of the last successful shot (ms).
    pub last_fired_ms: Option<f64>,
}

impl WeaponState {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            phase: WeaponPhase::Ready,
            last_fired_ms: None,
        }
    }
}
