//! Weapon/cooldown system.
//!
//! Each weapon cycles Ready -> Firing -> Cooling -> Ready. Readiness is a pure
//! function of the clock: `now - last_fired >= effective_cooldown`. The roster
//! keeps state for every weapon, so switching or unequipping never resets a
//! cooldown clock.

use std::collections::{BTreeMap, BTreeSet};

use threatsim_core::catalog::{weapon_spec, WeaponSpec};
use threatsim_core::components::WeaponState;
use threatsim_core::constants::MIN_EFFECTIVE_COOLDOWN_MS;
use threatsim_core::enums::{WeaponKind, WeaponPhase};
use threatsim_core::error::Rejection;
use threatsim_core::state::WeaponView;
use threatsim_core::synergy::SynergyBonus;

use crate::synergy::boosted_damage;

/// `base × (1 − cooldown bonus)`, floored at a positive minimum.
pub fn effective_cooldown(base_ms: f64, bonus: &SynergyBonus) -> f64 {
    (base_ms * (1.0 - bonus.cooldown.unwrap_or(0.0))).max(MIN_EFFECTIVE_COOLDOWN_MS)
}

/// Fraction of the cooldown elapsed, in `[0, 1]`. A weapon that never fired is at 1.
pub fn cooldown_progress(now_ms: f64, last_fired_ms: Option<f64>, effective_cooldown_ms: f64) -> f64 {
    match last_fired_ms {
        None => 1.0,
        Some(last) => ((now_ms - last) / effective_cooldown_ms).clamp(0.0, 1.0),
    }
}

pub fn is_ready(now_ms: f64, last_fired_ms: Option<f64>, effective_cooldown_ms: f64) -> bool {
    match last_fired_ms {
        None => true,
        Some(last) => now_ms - last >= effective_cooldown_ms,
    }
}

/// Stats after synergy bonuses and any damage boost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveStats {
    pub cooldown_ms: f64,
    pub damage: f64,
    pub range: f64,
    pub effect_radius: f64,
    pub energy_cost: f64,
    pub heat: f64,
}

pub fn effective_stats(spec: &WeaponSpec, bonus: &SynergyBonus, damage_multiplier: f64) -> EffectiveStats {
    EffectiveStats {
        cooldown_ms: effective_cooldown(spec.cooldown_ms, bonus),
        damage: boosted_damage(spec.damage, bonus) * damage_multiplier,
        range: spec.range * (1.0 + bonus.range.unwrap_or(0.0)),
        effect_radius: spec.effect_radius * (1.0 + bonus.accuracy.unwrap_or(0.0)),
        energy_cost: spec.energy_cost,
        heat: spec.heat,
    }
}

/// Roster state, loadout and the selected weapon.
#[derive(Debug, Clone)]
pub struct Armory {
    states: BTreeMap<WeaponKind, WeaponState>,
    /// Equipped weapons in slot order. Never empty.
    loadout: Vec<WeaponKind>,
    slots: usize,
    selected: WeaponKind,
}

impl Armory {
    /// `loadout` must be non-empty and fit in `slots` (checked by config validation).
    pub fn new(loadout: Vec<WeaponKind>, slots: usize) -> Self {
        let selected = loadout.first().copied().unwrap_or(WeaponKind::Kinetic);
        let loadout = if loadout.is_empty() { vec![selected] } else { loadout };
        Self {
            states: WeaponKind::ALL.into_iter().map(|k| (k, WeaponState::new(k))).collect(),
            loadout,
            slots,
            selected,
        }
    }

    pub fn selected(&self) -> WeaponKind {
        self.selected
    }

    pub fn loadout(&self) -> &[WeaponKind] {
        &self.loadout
    }

    pub fn equipped_set(&self) -> BTreeSet<WeaponKind> {
        self.loadout.iter().copied().collect()
    }

    pub fn is_equipped(&self, kind: WeaponKind) -> bool {
        self.loadout.contains(&kind)
    }

    pub fn last_fired(&self, kind: WeaponKind) -> Option<f64> {
        self.states.get(&kind).and_then(|s| s.last_fired_ms)
    }

    pub fn phase(&self, kind: WeaponKind) -> WeaponPhase {
        self.states.get(&kind).map_or(WeaponPhase::Ready, |s| s.phase)
    }

    /// Make an equipped weapon the active one. Its cooldown clock is untouched.
    pub fn switch_to(&mut self, kind: WeaponKind) -> Result<(), Rejection> {
        if !self.is_equipped(kind) {
            return Err(Rejection::WeaponNotEquipped(kind));
        }
        self.selected = kind;
        Ok(())
    }

    pub fn equip(&mut self, kind: WeaponKind) -> Result<(), Rejection> {
        if self.is_equipped(kind) {
            return Err(Rejection::AlreadyEquipped(kind));
        }
        if self.loadout.len() >= self.slots {
            return Err(Rejection::LoadoutFull(self.slots));
        }
        self.loadout.push(kind);
        Ok(())
    }

    /// Remove a weapon from the loadout. If it was selected, the first
    /// remaining weapon takes over.
    pub fn unequip(&mut self, kind: WeaponKind) -> Result<(), Rejection> {
        if !self.is_equipped(kind) {
            return Err(Rejection::WeaponNotEquipped(kind));
        }
        if self.loadout.len() == 1 {
            return Err(Rejection::LoadoutEmpty);
        }
        self.loadout.retain(|k| *k != kind);
        if self.selected == kind {
            self.selected = self.loadout[0];
        }
        Ok(())
    }

    /// Readiness gate for a shot at `now_ms`.
    pub fn check_ready(&self, kind: WeaponKind, now_ms: f64, effective_cooldown_ms: f64) -> Result<(), Rejection> {
        if !self.is_equipped(kind) {
            return Err(Rejection::WeaponNotEquipped(kind));
        }
        let last = self.last_fired(kind);
        if is_ready(now_ms, last, effective_cooldown_ms) {
            Ok(())
        } else {
            let elapsed = last.map_or(0.0, |l| now_ms - l);
            Err(Rejection::CoolingDown {
                kind,
                remaining_ms: effective_cooldown_ms - elapsed,
            })
        }
    }

    /// Record a successful shot.
    pub fn record_shot(&mut self, kind: WeaponKind, now_ms: f64) {
        if let Some(state) = self.states.get_mut(&kind) {
            state.last_fired_ms = Some(now_ms);
            state.phase = WeaponPhase::Firing;
        }
    }

    /// Settle every weapon's phase against the clock. A weapon that fired at
    /// `now_ms` stays Firing for the rest of this tick.
    pub fn refresh(&mut self, now_ms: f64, bonus: &SynergyBonus) {
        for state in self.states.values_mut() {
            let cooldown = effective_cooldown(weapon_spec(state.kind).cooldown_ms, bonus);
            state.phase = if state.last_fired_ms == Some(now_ms) {
                WeaponPhase::Firing
            } else if is_ready(now_ms, state.last_fired_ms, cooldown) {
                WeaponPhase::Ready
            } else {
                WeaponPhase::Cooling
            };
        }
    }

    /// Weapon bar entries for the whole roster, in roster order.
    pub fn views(&self, now_ms: f64, bonus: &SynergyBonus, damage_multiplier: f64) -> Vec<WeaponView> {
        WeaponKind::ALL
            .into_iter()
            .map(|kind| {
                let stats = effective_stats(&weapon_spec(kind), bonus, damage_multiplier);
                let last = self.last_fired(kind);
                WeaponView {
                    kind,
                    label: kind.label().to_string(),
                    hotkey: kind.hotkey(),
                    equipped: self.is_equipped(kind),
                    phase: self.phase(kind),
                    ready: is_ready(now_ms, last, stats.cooldown_ms),
                    cooldown_progress: cooldown_progress(now_ms, last, stats.cooldown_ms),
                    effective_cooldown_ms: stats.cooldown_ms,
                    effective_damage: stats.damage,
                    effective_range: stats.range,
                    energy_cost: stats.energy_cost,
                    heat: stats.heat,
                }
            })
            .collect()
    }
}
