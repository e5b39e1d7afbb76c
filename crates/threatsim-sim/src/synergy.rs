//! Synergy calculator.
//!
//! `compute_synergies` is a pure function of the table and the equipped set:
//! an entry is active iff every effector it requires is equipped. Results keep
//! table declaration order.

use std::collections::{BTreeSet, HashSet};

use threatsim_core::enums::WeaponKind;
use threatsim_core::error::ConfigError;
use threatsim_core::synergy::{builtin_synergies, SynergyBonus, SynergyDefinition, SynergyEffect};

/// Validated, ordered synergy table.
#[derive(Debug, Clone)]
pub struct SynergyTable {
    entries: Vec<SynergyEffect>,
}

impl SynergyTable {
    pub fn builtin() -> Self {
        Self {
            entries: builtin_synergies(),
        }
    }

    /// Build from configuration. Fails on unknown effectors, empty requirement
    /// sets, out-of-range bonuses and repeated ids.
    pub fn from_definitions(defs: &[SynergyDefinition]) -> Result<Self, ConfigError> {
        let mut ids = HashSet::new();
        let mut entries = Vec::with_capacity(defs.len());
        for def in defs {
            if !ids.insert(def.id.as_str()) {
                return Err(ConfigError::DuplicateSynergy(def.id.clone()));
            }
            entries.push(def.resolve()?);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SynergyEffect] {
        &self.entries
    }
}

/// Active synergies for an equipped set, in declaration order.
pub fn compute_synergies(table: &SynergyTable, equipped: &BTreeSet<WeaponKind>) -> Vec<SynergyEffect> {
    table
        .entries
        .iter()
        .filter(|s| s.required.is_subset(equipped))
        .cloned()
        .collect()
}

/// Per-axis sum of the active bonuses.
pub fn total_bonus(active: &[SynergyEffect]) -> SynergyBonus {
    active
        .iter()
        .fold(SynergyBonus::default(), |acc, s| acc.combine(&s.bonus))
}

/// `base × (1 + Σ damage bonuses)`.
pub fn boosted_damage(base: f64, bonus: &SynergyBonus) -> f64 {
    base * (1.0 + bonus.damage.unwrap_or(0.0))
}
