//! Player commands sent from the host to the simulation.
//!
//! Commands are either applied immediately through the engine's entry points
//! or queued and applied at the start of the next tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{DroneId, PowerUpId, Rect, ThreatId};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Session control ---
    StartMission,
    Pause,
    Resume,
    /// Discard the session and return to standby with a fresh world.
    Reset,

    // --- Weapons ---
    /// Fire the selected weapon at a world point.
    Fire { x: f64, y: f64 },
    /// Fire the selected weapon at a specific threat.
    FireAt { threat_id: ThreatId },
    SwitchWeapon { kind: WeaponKind },
    EquipWeapon { kind: WeaponKind },
    UnequipWeapon { kind: WeaponKind },
    SetAutoTargeting { enabled: bool },

    // --- Drones ---
    DeployDrone { role: DroneRole, x: f64, y: f64 },
    RecallDrone { drone_id: DroneId },

    // --- Selection ---
    /// Select a threat. `additive` toggles membership instead of replacing.
    SelectThreat { threat_id: ThreatId, additive: bool },
    /// Update the drag box, or commit and clear it with `None`.
    SetSelectionBox { rect: Option<Rect> },
    SetPriority {
        threat_id: ThreatId,
        level: PriorityLevel,
    },
    ClearSelection,

    // --- Raw pointer input (world coordinates) ---
    PointerDown { x: f64, y: f64, modifier: bool },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },

    // --- Pickups ---
    CollectPowerUp { power_up_id: PowerUpId },
}

impl PlayerCommand {
    /// Variant name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            PlayerCommand::StartMission => "StartMission",
            PlayerCommand::Pause => "Pause",
            PlayerCommand::Resume => "Resume",
            PlayerCommand::Reset => "Reset",
            PlayerCommand::Fire { .. } => "Fire",
            PlayerCommand::FireAt { .. } => "FireAt",
            PlayerCommand::SwitchWeapon { .. } => "SwitchWeapon",
            PlayerCommand::EquipWeapon { .. } => "EquipWeapon",
            PlayerCommand::UnequipWeapon { .. } => "UnequipWeapon",
            PlayerCommand::SetAutoTargeting { .. } => "SetAutoTargeting",
            PlayerCommand::DeployDrone { .. } => "DeployDrone",
            PlayerCommand::RecallDrone { .. } => "RecallDrone",
            PlayerCommand::SelectThreat { .. } => "SelectThreat",
            PlayerCommand::SetSelectionBox { .. } => "SetSelectionBox",
            PlayerCommand::SetPriority { .. } => "SetPriority",
            PlayerCommand::ClearSelection => "ClearSelection",
            PlayerCommand::PointerDown { .. } => "PointerDown",
            PlayerCommand::PointerMove { .. } => "PointerMove",
            PlayerCommand::PointerUp { .. } => "PointerUp",
            PlayerCommand::CollectPowerUp { .. } => "CollectPowerUp",
        }
    }
}
