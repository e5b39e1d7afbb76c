//! Game state snapshot: the complete visible state handed to the host each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{CommandOutcome, FeedEntry};
use crate::synergy::SynergyBonus;
use crate::types::{DroneId, Position, PowerUpId, Rect, SimTime, ThreatId};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub wave: WaveView,
    pub threats: Vec<ThreatView>,
    pub drones: Vec<DroneView>,
    pub bays: Vec<BayView>,
    /// Every weapon in the roster, equipped or not.
    pub weapons: Vec<WeaponView>,
    pub selected_weapon: Option<WeaponKind>,
    pub equipped: Vec<WeaponKind>,
    pub synergies: Vec<SynergyView>,
    /// Per-axis totals of the active synergies.
    pub bonuses: SynergyBonus,
    pub resources: ResourceView,
    pub selection: SelectionView,
    pub power_ups: Vec<PowerUpView>,
    pub score: ScoreView,
    /// Most recent first.
    pub feed: Vec<FeedEntry>,
    /// Outcomes of commands queued for this tick.
    pub outcomes: Vec<CommandOutcome>,
    pub auto_targeting: bool,
    pub damage_boost_remaining_ms: f64,
}

/// A threat as shown on the radar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatView {
    pub id: ThreatId,
    pub kind: ThreatKind,
    pub status: ThreatStatus,
    pub phase: ThreatPhase,
    pub position: Position,
    /// Horizontal range from the asset.
    pub range: f64,
    /// Bearing from the asset (radians, 0 = North).
    pub bearing: f64,
    pub speed: f64,
    pub heading: f64,
    pub health: f64,
    pub max_health: f64,
    /// 1.0 while active, falling to 0.0 across the fade.
    pub opacity: f64,
    pub revealed: bool,
    pub selected: bool,
    pub priority: Option<PriorityLevel>,
    /// Oldest first.
    pub trail: Vec<Position>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneView {
    pub id: DroneId,
    pub role: DroneRole,
    pub status: DroneStatus,
    pub position: Position,
    pub station: Position,
    pub energy: f64,
    pub max_energy: f64,
    pub bay_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BayView {
    pub id: u32,
    pub position: Position,
    pub capacity: u32,
    pub occupied: u32,
}

/// Weapon bar entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponView {
    pub kind: WeaponKind,
    pub label: String,
    pub hotkey: char,
    pub equipped: bool,
    pub phase: WeaponPhase,
    pub ready: bool,
    /// 0.0 just fired, 1.0 ready.
    pub cooldown_progress: f64,
    pub effective_cooldown_ms: f64,
    pub effective_damage: f64,
    pub effective_range: f64,
    pub energy_cost: f64,
    pub heat: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub visual_effect: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResourceView {
    pub energy: f64,
    pub energy_max: f64,
    /// Absent when the cooling budget is disabled.
    pub cooling: Option<f64>,
    pub cooling_max: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionView {
    pub selected: Vec<ThreatId>,
    pub drag_box: Option<Rect>,
    /// Threats inside the drag box while it is open.
    pub preview: Vec<ThreatId>,
    pub priorities: Vec<(ThreatId, PriorityLevel)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub id: PowerUpId,
    pub kind: PowerUpKind,
    pub position: Position,
    pub remaining_ms: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub number: u32,
    pub remaining_to_spawn: u32,
    /// Counting down to the next wave.
    pub in_intermission: bool,
}

/// Running score for display.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub points: u64,
    pub threats_neutralized: u32,
    pub threats_spawned: u32,
    pub impacts: u32,
    pub shots_fired: u32,
    pub drones_deployed: u32,
    pub base_integrity: f64,
    pub mission_time_secs: f64,
}
