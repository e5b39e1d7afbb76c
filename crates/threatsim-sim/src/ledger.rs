//! Resource ledger: the energy and cooling budgets.
//!
//! Balances never go negative and never exceed their maximum. Debits are
//! all-or-nothing; a failed debit leaves every balance untouched.

use serde::{Deserialize, Serialize};

use threatsim_core::error::{ConfigError, Rejection};
use threatsim_core::state::ResourceView;

use crate::config::BudgetConfig;

/// One bounded balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reserve {
    current: f64,
    max: f64,
}

impl Reserve {
    /// A full reserve.
    pub fn new(max: f64) -> Result<Self, ConfigError> {
        if !max.is_finite() || max <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "reserve max",
                value: max,
            });
        }
        Ok(Self { current: max, max })
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn can_afford(&self, amount: f64) -> bool {
        amount <= self.current
    }

    /// Subtract `amount`. Returns false and changes nothing if it exceeds the balance.
    pub fn debit(&mut self, amount: f64) -> bool {
        if !amount.is_finite() || amount < 0.0 || amount > self.current {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Add `amount`, clamped to the maximum.
    pub fn credit(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.current = (self.current + amount).min(self.max);
        }
    }

    /// Passive regeneration for one frame.
    pub fn tick(&mut self, regen_per_sec: f64, dt_secs: f64) {
        self.credit(regen_per_sec * dt_secs);
    }
}

/// Energy plus optional cooling, with their regeneration rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub energy: Reserve,
    pub cooling: Option<Reserve>,
    energy_regen_per_sec: f64,
    cooling_regen_per_sec: f64,
}

impl ResourceLedger {
    pub fn new(energy: &BudgetConfig, cooling: Option<&BudgetConfig>) -> Result<Self, ConfigError> {
        Ok(Self {
            energy: Reserve::new(energy.max)?,
            cooling: cooling.map(|c| Reserve::new(c.max)).transpose()?,
            energy_regen_per_sec: energy.regen_per_sec,
            cooling_regen_per_sec: cooling.map_or(0.0, |c| c.regen_per_sec),
        })
    }

    /// Debit energy only.
    pub fn debit_energy(&mut self, amount: f64) -> Result<(), Rejection> {
        if self.energy.debit(amount) {
            Ok(())
        } else {
            Err(Rejection::InsufficientEnergy {
                required: amount,
                available: self.energy.current(),
            })
        }
    }

    /// Debit energy and heat together. Either shortfall rejects both.
    pub fn try_debit(&mut self, energy: f64, heat: f64) -> Result<(), Rejection> {
        if !self.energy.can_afford(energy) {
            return Err(Rejection::InsufficientEnergy {
                required: energy,
                available: self.energy.current(),
            });
        }
        if let Some(cooling) = &self.cooling {
            if !cooling.can_afford(heat) {
                return Err(Rejection::Overheated {
                    required: heat,
                    available: cooling.current(),
                });
            }
        }
        self.energy.debit(energy);
        if let Some(cooling) = &mut self.cooling {
            cooling.debit(heat);
        }
        Ok(())
    }

    pub fn credit_energy(&mut self, amount: f64) {
        self.energy.credit(amount);
    }

    /// Credit cooling. A no-op when the cooling budget is disabled.
    pub fn credit_cooling(&mut self, amount: f64) {
        if let Some(cooling) = &mut self.cooling {
            cooling.credit(amount);
        }
    }

    /// Once per frame. `bonus_*` are extra rates from support drones.
    pub fn tick(&mut self, dt_secs: f64, bonus_energy_per_sec: f64, bonus_cooling_per_sec: f64) {
        self.energy
            .tick(self.energy_regen_per_sec + bonus_energy_per_sec, dt_secs);
        if let Some(cooling) = &mut self.cooling {
            cooling.tick(self.cooling_regen_per_sec + bonus_cooling_per_sec, dt_secs);
        }
    }

    pub fn view(&self) -> ResourceView {
        ResourceView {
            energy: self.energy.current(),
            energy_max: self.energy.max(),
            cooling: self.cooling.map(|c| c.current()),
            cooling_max: self.cooling.map(|c| c.max()),
        }
    }
}
