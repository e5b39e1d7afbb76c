//! Simulation configuration.
//!
//! Every field has a default, so a partial JSON document is a valid config.
//! `validate` runs at engine construction and any error aborts it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use threatsim_core::constants::*;
use threatsim_core::enums::{ClickMode, WeaponKind};
use threatsim_core::error::ConfigError;
use threatsim_core::synergy::SynergyDefinition;

use crate::synergy::SynergyTable;

/// Capacity and regeneration of one resource budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub max: f64,
    pub regen_per_sec: f64,
}

/// Where and how fast threats appear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnBounds {
    pub min_radius: f64,
    pub max_radius: f64,
    /// Fractional speed jitter in `[0, 1)`.
    pub speed_jitter: f64,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self {
            min_radius: SPAWN_MIN_RADIUS,
            max_radius: SPAWN_MAX_RADIUS,
            speed_jitter: SPAWN_SPEED_JITTER,
        }
    }
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Run the wave spawner. Off for scripted scenarios.
    pub auto_spawn: bool,
    pub fade_duration_ms: f64,
    pub trail_capacity: usize,
    pub energy: BudgetConfig,
    /// `None` disables the cooling budget entirely.
    pub cooling: Option<BudgetConfig>,
    pub spawn: SpawnBounds,
    pub loadout_slots: usize,
    /// Effector ids equipped at start; the first one is selected.
    pub initial_loadout: Vec<String>,
    pub click_mode: ClickMode,
    pub feed_capacity: usize,
    /// Replaces the built-in synergy table when present.
    pub synergies: Option<Vec<SynergyDefinition>>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            auto_spawn: true,
            fade_duration_ms: FADE_DURATION_MS,
            trail_capacity: TRAIL_CAPACITY,
            energy: BudgetConfig {
                max: ENERGY_MAX,
                regen_per_sec: ENERGY_REGEN_PER_SEC,
            },
            cooling: Some(BudgetConfig {
                max: COOLING_MAX,
                regen_per_sec: COOLING_REGEN_PER_SEC,
            }),
            spawn: SpawnBounds::default(),
            loadout_slots: LOADOUT_SLOTS,
            initial_loadout: vec![
                WeaponKind::Kinetic.as_str().to_string(),
                WeaponKind::Electronic.as_str().to_string(),
                WeaponKind::Laser.as_str().to_string(),
            ],
            click_mode: ClickMode::default(),
            feed_capacity: FEED_CAPACITY,
            synergies: None,
        }
    }
}

impl SimConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field. Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let SpawnBounds {
            min_radius,
            max_radius,
            speed_jitter,
        } = self.spawn;
        if !(min_radius > 0.0 && min_radius < max_radius && max_radius <= WORLD_RADIUS) {
            return Err(ConfigError::InvalidSpawnBounds {
                min: min_radius,
                max: max_radius,
            });
        }
        if !(0.0..1.0).contains(&speed_jitter) {
            return Err(ConfigError::OutOfBounds {
                field: "spawn.speed_jitter",
                value: speed_jitter,
            });
        }

        positive("fade_duration_ms", self.fade_duration_ms)?;
        positive("trail_capacity", self.trail_capacity as f64)?;
        positive("feed_capacity", self.feed_capacity as f64)?;
        positive("loadout_slots", self.loadout_slots as f64)?;
        check_budget("energy.max", "energy.regen_per_sec", &self.energy)?;
        if let Some(cooling) = &self.cooling {
            check_budget("cooling.max", "cooling.regen_per_sec", cooling)?;
        }

        self.resolve_loadout()?;
        self.synergy_table()?;
        Ok(())
    }

    /// Initial loadout as weapon kinds, in slot order.
    pub fn resolve_loadout(&self) -> Result<Vec<WeaponKind>, ConfigError> {
        if self.initial_loadout.is_empty() {
            return Err(ConfigError::EmptyLoadout);
        }
        if self.initial_loadout.len() > self.loadout_slots {
            return Err(ConfigError::LoadoutTooLarge {
                count: self.initial_loadout.len(),
                slots: self.loadout_slots,
            });
        }
        let mut seen = BTreeSet::new();
        let mut loadout = Vec::with_capacity(self.initial_loadout.len());
        for name in &self.initial_loadout {
            let kind: WeaponKind = name.parse()?;
            if !seen.insert(kind) {
                return Err(ConfigError::DuplicateLoadoutEntry(kind));
            }
            loadout.push(kind);
        }
        Ok(loadout)
    }

    /// The configured synergy table, or the built-in one.
    pub fn synergy_table(&self) -> Result<SynergyTable, ConfigError> {
        match &self.synergies {
            Some(defs) => SynergyTable::from_definitions(defs),
            None => Ok(SynergyTable::builtin()),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn check_budget(
    max_field: &'static str,
    regen_field: &'static str,
    budget: &BudgetConfig,
) -> Result<(), ConfigError> {
    positive(max_field, budget.max)?;
    if !(budget.regen_per_sec.is_finite() && budget.regen_per_sec >= 0.0) {
        return Err(ConfigError::OutOfBounds {
            field: regen_field,
            value: budget.regen_per_sec,
        });
    }
    Ok(())
}
