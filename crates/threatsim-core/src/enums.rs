//! Enumeration types used throughout the simulation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Threat kind. Drives the behavior profile and score value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    /// Lone commercial-class drone flying straight at the asset.
    SingleDrone,
    /// Member of a coordinated swarm; weaves laterally.
    SwarmMember,
    /// Low-signature contact, hidden until close or revealed.
    Stealth,
    /// Fast loitering munition that dives in its terminal phase.
    Kamikaze,
}

impl ThreatKind {
    pub const ALL: [ThreatKind; 4] = [
        ThreatKind::SingleDrone,
        ThreatKind::SwarmMember,
        ThreatKind::Stealth,
        ThreatKind::Kamikaze,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatKind::SingleDrone => "single_drone",
            ThreatKind::SwarmMember => "swarm_member",
            ThreatKind::Stealth => "stealth",
            ThreatKind::Kamikaze => "kamikaze",
        }
    }
}

/// Threat lifecycle status. Transitions only move forward:
/// `Active -> Neutralized` or `Active -> Crater`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatStatus {
    #[default]
    Active,
    /// Defeated by an effector; fading out.
    Neutralized,
    /// Exhausted itself on impact.
    Crater,
}

impl ThreatStatus {
    /// Whether moving from `self` to `next` is a legal forward transition.
    pub fn can_transition_to(self, next: ThreatStatus) -> bool {
        matches!(
            (self, next),
            (ThreatStatus::Active, ThreatStatus::Neutralized)
                | (ThreatStatus::Active, ThreatStatus::Crater)
        )
    }
}

/// Threat behavior phase (scripted flight profile).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatPhase {
    /// Inbound at cruise altitude/speed.
    #[default]
    Inbound,
    /// Final attack run.
    Terminal,
    /// Reached its target.
    Impact,
}

/// Friendly drone role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroneRole {
    Guard,
    Recon,
    Ecm,
    Support,
    Deception,
    Capture,
    Sensor,
    Logistics,
    Directed,
}

impl DroneRole {
    pub const ALL: [DroneRole; 9] = [
        DroneRole::Guard,
        DroneRole::Recon,
        DroneRole::Ecm,
        DroneRole::Support,
        DroneRole::Deception,
        DroneRole::Capture,
        DroneRole::Sensor,
        DroneRole::Logistics,
        DroneRole::Directed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DroneRole::Guard => "guard",
            DroneRole::Recon => "recon",
            DroneRole::Ecm => "ecm",
            DroneRole::Support => "support",
            DroneRole::Deception => "deception",
            DroneRole::Capture => "capture",
            DroneRole::Sensor => "sensor",
            DroneRole::Logistics => "logistics",
            DroneRole::Directed => "directed",
        }
    }
}

impl FromStr for DroneRole {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        DroneRole::ALL
            .into_iter()
            .find(|role| role.as_str() == needle)
            .ok_or_else(|| ConfigError::UnknownDroneRole(s.to_string()))
    }
}

/// Drone status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroneStatus {
    /// On station and applying its role effect.
    Active,
    /// Airborne with nothing to act on (en route or no contact in range).
    #[default]
    Idle,
    /// Flying back to its bay; removed on arrival.
    Returning,
    /// Knocked out; removed at the end of the tick.
    Disabled,
}

/// Effector roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Kinetic,
    Electronic,
    Laser,
    Net,
    Hpm,
    RfTakeover,
    GnssDeny,
    OpticalDazzle,
    Acoustic,
    DecoyBeacon,
    Chaff,
    SmartSlug,
    AiDeception,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 13] = [
        WeaponKind::Kinetic,
        WeaponKind::Electronic,
        WeaponKind::Laser,
        WeaponKind::Net,
        WeaponKind::Hpm,
        WeaponKind::RfTakeover,
        WeaponKind::GnssDeny,
        WeaponKind::OpticalDazzle,
        WeaponKind::Acoustic,
        WeaponKind::DecoyBeacon,
        WeaponKind::Chaff,
        WeaponKind::SmartSlug,
        WeaponKind::AiDeception,
    ];

    /// Identifier used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Kinetic => "kinetic",
            WeaponKind::Electronic => "electronic",
            WeaponKind::Laser => "laser",
            WeaponKind::Net => "net",
            WeaponKind::Hpm => "hpm",
            WeaponKind::RfTakeover => "rf_takeover",
            WeaponKind::GnssDeny => "gnss_deny",
            WeaponKind::OpticalDazzle => "optical_dazzle",
            WeaponKind::Acoustic => "acoustic",
            WeaponKind::DecoyBeacon => "decoy_beacon",
            WeaponKind::Chaff => "chaff",
            WeaponKind::SmartSlug => "smart_slug",
            WeaponKind::AiDeception => "ai_deception",
        }
    }

    /// Short label for the weapon bar.
    pub fn label(&self) -> &'static str {
        match self {
            WeaponKind::Kinetic => "Kinetic",
            WeaponKind::Electronic => "EW",
            WeaponKind::Laser => "Laser",
            WeaponKind::Net => "Net",
            WeaponKind::Hpm => "HPM",
            WeaponKind::RfTakeover => "RF-Take",
            WeaponKind::GnssDeny => "GNSS",
            WeaponKind::OpticalDazzle => "Dazzle",
            WeaponKind::Acoustic => "Acoustic",
            WeaponKind::DecoyBeacon => "Decoy",
            WeaponKind::Chaff => "Chaff",
            WeaponKind::SmartSlug => "Smart",
            WeaponKind::AiDeception => "AI-Decept",
        }
    }

    /// Keyboard shortcut shown next to the label.
    pub fn hotkey(&self) -> char {
        match self {
            WeaponKind::Kinetic => '1',
            WeaponKind::Electronic => '2',
            WeaponKind::Laser => '3',
            WeaponKind::Net => '4',
            WeaponKind::Hpm => '5',
            WeaponKind::RfTakeover => '6',
            WeaponKind::GnssDeny => '7',
            WeaponKind::OpticalDazzle => '8',
            WeaponKind::Acoustic => '9',
            WeaponKind::DecoyBeacon => '0',
            WeaponKind::Chaff => 'C',
            WeaponKind::SmartSlug => 'S',
            WeaponKind::AiDeception => 'A',
        }
    }

    /// Look up a weapon by its hotkey (case-insensitive).
    pub fn from_hotkey(key: char) -> Option<WeaponKind> {
        let key = key.to_ascii_uppercase();
        WeaponKind::ALL.into_iter().find(|w| w.hotkey() == key)
    }
}

impl FromStr for WeaponKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        WeaponKind::ALL
            .into_iter()
            .find(|w| w.as_str() == needle)
            .ok_or_else(|| ConfigError::UnknownEffector(s.to_string()))
    }
}

/// Weapon state machine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponPhase {
    #[default]
    Ready,
    /// Fired during the current tick.
    Firing,
    /// Waiting for the effective cooldown to elapse.
    Cooling,
}

/// Targeting priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
}

/// Power-up pickup kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Instant energy credit.
    EnergyCell,
    /// Instant cooling credit.
    CoolantFlush,
    /// Timed damage multiplier.
    DamageBoost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::EnergyCell,
        PowerUpKind::CoolantFlush,
        PowerUpKind::DamageBoost,
    ];
}

/// What a plain (unmodified) click does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickMode {
    /// Fire the selected weapon at the clicked point.
    #[default]
    FireOnClick,
    /// Select the threat under the pointer (replacing the selection).
    SelectOnClick,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Standby,
    Active,
    Paused,
    /// Defended asset destroyed.
    Defeated,
}

/// Event feed severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Critical,
    /// Host-side failures reported through the engine, e.g. a broken renderer.
    Error,
}
