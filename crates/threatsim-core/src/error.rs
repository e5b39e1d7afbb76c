//! Error types.
//!
//! `ConfigError` covers bad configuration or data and is raised once, at
//! initialization. `Rejection` is the reason a runtime command did nothing;
//! it is returned as a value and the simulation state is left untouched.

use thiserror::Error;

use crate::enums::{DroneRole, GamePhase, WeaponKind};
use crate::types::{DroneId, PowerUpId, ThreatId};

/// Configuration and data errors. Fatal at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown effector id `{0}`")]
    UnknownEffector(String),
    #[error("unknown drone role `{0}`")]
    UnknownDroneRole(String),
    #[error("synergy `{synergy}` references unknown effector `{effector}`")]
    UnknownSynergyEffector { synergy: String, effector: String },
    #[error("synergy `{0}` requires no effectors")]
    EmptySynergy(String),
    #[error("synergy id `{0}` is declared twice")]
    DuplicateSynergy(String),
    #[error("synergy `{synergy}` has {field} bonus {value} outside [0, 1]")]
    BonusOutOfRange {
        synergy: String,
        field: &'static str,
        value: f64,
    },
    #[error("spawn bounds are malformed: min radius {min} must be positive and below max radius {max}")]
    InvalidSpawnBounds { min: f64, max: f64 },
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("`{field}` is out of bounds: {value}")]
    OutOfBounds { field: &'static str, value: f64 },
    #[error("initial loadout is empty")]
    EmptyLoadout,
    #[error("initial loadout has {count} effectors but only {slots} slots")]
    LoadoutTooLarge { count: usize, slots: usize },
    #[error("effector `{0:?}` appears twice in the initial loadout")]
    DuplicateLoadoutEntry(WeaponKind),
    #[error("health must be within [0, {max}], got {value}")]
    InvalidHealth { value: f64, max: f64 },
    #[error("a simulation session is already active in this process")]
    SessionActive,
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a command was a no-op.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("simulation is not active")]
    NotActive,
    #[error("not allowed while {0:?}")]
    WrongPhase(GamePhase),
    #[error("{0:?} is not equipped")]
    WeaponNotEquipped(WeaponKind),
    #[error("{kind:?} is cooling down ({remaining_ms:.0} ms left)")]
    CoolingDown { kind: WeaponKind, remaining_ms: f64 },
    #[error("insufficient energy: need {required:.1}, have {available:.1}")]
    InsufficientEnergy { required: f64, available: f64 },
    #[error("overheated: need {required:.1} cooling, have {available:.1}")]
    Overheated { required: f64, available: f64 },
    #[error("target out of range ({distance:.0} > {range:.0})")]
    OutOfRange { distance: f64, range: f64 },
    #[error("no such threat #{0}")]
    UnknownThreat(ThreatId),
    #[error("threat #{0} cannot be targeted")]
    NotTargetable(ThreatId),
    #[error("{role:?} limit of {limit} drones reached")]
    DroneLimitReached { role: DroneRole, limit: u32 },
    #[error("no deployment bay has a free slot")]
    NoBayAvailable,
    #[error("no such drone #{0}")]
    UnknownDrone(DroneId),
    #[error("drone #{0} is already returning or disabled")]
    DroneNotRecallable(DroneId),
    #[error("no such power-up #{0}")]
    UnknownPowerUp(PowerUpId),
    #[error("loadout is full ({0} slots)")]
    LoadoutFull(usize),
    #[error("{0:?} is already equipped")]
    AlreadyEquipped(WeaponKind),
    #[error("cannot unequip the last effector")]
    LoadoutEmpty,
    #[error("pointer released without a press")]
    NoActiveGesture,
}
