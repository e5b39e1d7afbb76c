//! Static equipment tables: the effector roster and drone role specs.

use serde::{Deserialize, Serialize};

use crate::enums::{DroneRole, WeaponKind};

/// Base stats of an effector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    /// Base cooldown between shots (ms).
    pub cooldown_ms: f64,
    /// Energy debited per shot.
    pub energy_cost: f64,
    /// Cooling debited per shot.
    pub heat: f64,
    /// Damage applied to each threat hit.
    pub damage: f64,
    /// Maximum engagement range from the asset.
    pub range: f64,
    /// Radius around the aim point inside which threats are hit by point fire.
    pub effect_radius: f64,
}

/// Look up the base stats for an effector.
pub fn weapon_spec(kind: WeaponKind) -> WeaponSpec {
    let (cooldown_ms, energy_cost, heat, damage, range, effect_radius) = match kind {
        WeaponKind::Kinetic => (500.0, 5.0, 4.0, 25.0, 500.0, 15.0),
        WeaponKind::Electronic => (1_000.0, 15.0, 6.0, 50.0, 600.0, 40.0),
        WeaponKind::Laser => (300.0, 20.0, 12.0, 40.0, 800.0, 8.0),
        WeaponKind::Net => (1_500.0, 10.0, 2.0, 60.0, 250.0, 20.0),
        WeaponKind::Hpm => (2_000.0, 30.0, 18.0, 70.0, 400.0, 60.0),
        WeaponKind::RfTakeover => (2_500.0, 25.0, 5.0, 80.0, 650.0, 10.0),
        WeaponKind::GnssDeny => (3_000.0, 20.0, 4.0, 30.0, 700.0, 80.0),
        WeaponKind::OpticalDazzle => (800.0, 8.0, 6.0, 20.0, 550.0, 25.0),
        WeaponKind::Acoustic => (1_200.0, 12.0, 3.0, 25.0, 300.0, 50.0),
        WeaponKind::DecoyBeacon => (4_000.0, 15.0, 2.0, 15.0, 600.0, 100.0),
        WeaponKind::Chaff => (2_000.0, 5.0, 1.0, 10.0, 350.0, 90.0),
        WeaponKind::SmartSlug => (1_000.0, 12.0, 8.0, 55.0, 700.0, 5.0),
        WeaponKind::AiDeception => (5_000.0, 35.0, 10.0, 45.0, 900.0, 120.0),
    };
    WeaponSpec {
        kind,
        cooldown_ms,
        energy_cost,
        heat,
        damage,
        range,
        effect_radius,
    }
}

/// What a drone does while on station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoleEffect {
    /// Continuous damage to the nearest active threat in range.
    Strike { damage_per_sec: f64 },
    /// Threats in range move at this fraction of their speed.
    Slow { factor: f64 },
    /// Stealth threats in range become targetable.
    Reveal,
    /// Extra energy regeneration for the ledger.
    EnergyRegen { per_sec: f64 },
    /// Extra cooling regeneration for the ledger.
    CoolingRegen { per_sec: f64 },
    /// Threats in range retarget onto the drone.
    Decoy,
}

/// Deployment parameters for a drone role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroneSpec {
    pub role: DroneRole,
    /// Energy debited from the ledger on deployment.
    pub deploy_cost: f64,
    /// Maximum drones of this role airborne at once.
    pub max_concurrent: u32,
    /// Onboard energy at launch.
    pub max_energy: f64,
    /// Onboard energy drained per second while airborne.
    pub drain_per_sec: f64,
    /// Radius of the role effect.
    pub effect_range: f64,
    pub effect: RoleEffect,
}

/// Look up the deployment parameters for a role.
pub fn drone_spec(role: DroneRole) -> DroneSpec {
    let (deploy_cost, max_concurrent, drain_per_sec, effect_range, effect) = match role {
        DroneRole::Guard => (10.0, 4, 4.0, 120.0, RoleEffect::Strike { damage_per_sec: 15.0 }),
        DroneRole::Recon => (5.0, 2, 2.0, 250.0, RoleEffect::Reveal),
        DroneRole::Ecm => (15.0, 2, 5.0, 150.0, RoleEffect::Slow { factor: 0.6 }),
        DroneRole::Support => (8.0, 2, 3.0, 0.0, RoleEffect::EnergyRegen { per_sec: 2.0 }),
        DroneRole::Deception => (12.0, 2, 4.0, 200.0, RoleEffect::Decoy),
        DroneRole::Capture => (12.0, 3, 5.0, 60.0, RoleEffect::Strike { damage_per_sec: 25.0 }),
        DroneRole::Sensor => (8.0, 2, 2.0, 350.0, RoleEffect::Reveal),
        DroneRole::Logistics => (10.0, 1, 3.0, 0.0, RoleEffect::CoolingRegen { per_sec: 3.0 }),
        DroneRole::Directed => (20.0, 2, 6.0, 200.0, RoleEffect::Strike { damage_per_sec: 30.0 }),
    };
    DroneSpec {
        role,
        deploy_cost,
        max_concurrent,
        max_energy: 100.0,
        drain_per_sec,
        effect_range,
        effect,
    }
}
