//! Kind-specific behavioral profiles.
//!
//! Consolidates per-kind parameters for the threat FSM and the lifecycle
//! controller (health, score value, impact damage).

use threatsim_core::enums::ThreatKind;

/// Behavioral profile for a threat kind.
#[derive(Debug, Clone, Copy)]
pub struct ThreatBehaviorProfile {
    pub max_health: f64,
    /// Cruise speed (units/s) before spawn jitter.
    pub cruise_speed: f64,
    /// Spawn altitude.
    pub cruise_altitude: f64,
    /// Horizontal range to target at which the terminal run begins.
    pub terminal_range: f64,
    /// Speed multiplier during the terminal run.
    pub terminal_speed_factor: f64,
    /// Score for neutralizing one.
    pub points: u64,
    /// Base integrity lost when it reaches the asset.
    pub impact_damage: f64,
    /// Peak lateral speed of the weave (0 = straight line).
    pub weave_speed: f64,
    pub weave_frequency_hz: f64,
    /// Hidden from direct targeting until revealed.
    pub stealth: bool,
    /// Terminal run is a steep dive rather than a glide.
    pub terminal_dive: bool,
}

/// Get the behavioral profile for a given kind.
pub fn get_profile(kind: ThreatKind) -> ThreatBehaviorProfile {
    match kind {
        ThreatKind::SingleDrone => ThreatBehaviorProfile {
            max_health: 50.0,
            cruise_speed: 40.0,
            cruise_altitude: 120.0,
            terminal_range: 150.0,
            terminal_speed_factor: 1.3,
            points: 100,
            impact_damage: 10.0,
            weave_speed: 0.0,
            weave_frequency_hz: 0.0,
            stealth: false,
            terminal_dive: false,
        },
        ThreatKind::SwarmMember => ThreatBehaviorProfile {
            max_health: 25.0,
            cruise_speed: 55.0,
            cruise_altitude: 80.0,
            terminal_range: 120.0,
            terminal_speed_factor: 1.2,
            points: 50,
            impact_damage: 5.0,
            weave_speed: 20.0,
            weave_frequency_hz: 0.5,
            stealth: false,
            terminal_dive: false,
        },
        ThreatKind::Stealth => ThreatBehaviorProfile {
            max_health: 75.0,
            cruise_speed: 35.0,
            cruise_altitude: 200.0,
            terminal_range: 200.0,
            terminal_speed_factor: 1.5,
            points: 200,
            impact_damage: 20.0,
            weave_speed: 0.0,
            weave_frequency_hz: 0.0,
            stealth: true,
            terminal_dive: false,
        },
        ThreatKind::Kamikaze => ThreatBehaviorProfile {
            max_health: 40.0,
            cruise_speed: 70.0,
            cruise_altitude: 300.0,
            terminal_range: 250.0,
            terminal_speed_factor: 1.8,
            points: 150,
            impact_damage: 25.0,
            weave_speed: 0.0,
            weave_frequency_hz: 0.0,
            stealth: false,
            terminal_dive: true,
        },
    }
}
