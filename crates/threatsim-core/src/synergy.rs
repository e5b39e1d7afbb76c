//! Synergy definitions: bonuses unlocked by equipping effector combinations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::enums::WeaponKind;
use crate::error::ConfigError;

/// Fractional bonus deltas. `None` means the synergy does not touch that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SynergyBonus {
    #[serde(default)]
    pub damage: Option<f64>,
    #[serde(default)]
    pub range: Option<f64>,
    #[serde(default)]
    pub cooldown: Option<f64>,
    #[serde(default)]
    pub accuracy: Option<f64>,
}

/// A validated synergy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyEffect {
    pub id: String,
    pub name: String,
    pub description: String,
    /// All of these must be equipped for the synergy to apply.
    pub required: BTreeSet<WeaponKind>,
    pub bonus: SynergyBonus,
    pub visual_effect: String,
    pub color: String,
}

/// A synergy as written in configuration, with effectors named by string id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub effectors: Vec<String>,
    #[serde(default)]
    pub bonus: SynergyBonus,
    #[serde(default)]
    pub visual_effect: String,
    #[serde(default)]
    pub color: String,
}

impl SynergyBonus {
    /// Sum of two bonuses, axis by axis. An axis stays `None` only if both are.
    pub fn combine(&self, other: &SynergyBonus) -> SynergyBonus {
        fn add(a: Option<f64>, b: Option<f64>) -> Option<f64> {
            match (a, b) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
            }
        }
        SynergyBonus {
            damage: add(self.damage, other.damage),
            range: add(self.range, other.range),
            cooldown: add(self.cooldown, other.cooldown),
            accuracy: add(self.accuracy, other.accuracy),
        }
    }

    fn axes(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("damage", self.damage),
            ("range", self.range),
            ("cooldown", self.cooldown),
            ("accuracy", self.accuracy),
        ]
    }
}

impl SynergyDefinition {
    /// Resolve effector names and check bonus bounds.
    pub fn resolve(&self) -> Result<SynergyEffect, ConfigError> {
        if self.effectors.is_empty() {
            return Err(ConfigError::EmptySynergy(self.id.clone()));
        }

        let mut required = BTreeSet::new();
        for name in &self.effectors {
            let kind = name
                .parse::<WeaponKind>()
                .map_err(|_| ConfigError::UnknownSynergyEffector {
                    synergy: self.id.clone(),
                    effector: name.clone(),
                })?;
            required.insert(kind);
        }

        for (field, value) in self.bonus.axes() {
            if let Some(value) = value {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::BonusOutOfRange {
                        synergy: self.id.clone(),
                        field,
                        value,
                    });
                }
            }
        }

        Ok(SynergyEffect {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            required,
            bonus: self.bonus,
            visual_effect: self.visual_effect.clone(),
            color: self.color.clone(),
        })
    }
}

fn builtin(
    id: &str,
    name: &str,
    description: &str,
    required: &[WeaponKind],
    bonus: SynergyBonus,
    visual_effect: &str,
    color: &str,
) -> SynergyEffect {
    SynergyEffect {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        required: required.iter().copied().collect(),
        bonus,
        visual_effect: visual_effect.to_string(),
        color: color.to_string(),
    }
}

/// The built-in synergy table, in declaration order.
pub fn builtin_synergies() -> Vec<SynergyEffect> {
    vec![
        builtin(
            "gnss_rf_combo",
            "Navigation Disruption",
            "GNSS denial and RF takeover together scramble drone navigation",
            &[WeaponKind::GnssDeny, WeaponKind::RfTakeover],
            SynergyBonus {
                range: Some(0.2),
                cooldown: Some(0.15),
                ..Default::default()
            },
            "navigation confusion",
            "#8b5cf6",
        ),
        builtin(
            "optical_net_combo",
            "Blind and Capture",
            "The dazzler blinds cameras while the net captures the disabled drone",
            &[WeaponKind::OpticalDazzle, WeaponKind::Net],
            SynergyBonus {
                range: Some(0.15),
                accuracy: Some(0.25),
                ..Default::default()
            },
            "blind capture",
            "#70a1ff",
        ),
        builtin(
            "kinetic_laser_combo",
            "Overwhelming Force",
            "Kinetic and laser fire combine for maximum destruction",
            &[WeaponKind::Kinetic, WeaponKind::Laser],
            SynergyBonus {
                damage: Some(0.3),
                range: Some(0.1),
                ..Default::default()
            },
            "destruction field",
            "#ff6b6b",
        ),
        builtin(
            "decoy_capture",
            "Decoy and Capture",
            "The decoy beacon lures threats into net capture zones",
            &[WeaponKind::DecoyBeacon, WeaponKind::Net],
            SynergyBonus {
                range: Some(0.25),
                cooldown: Some(0.2),
                ..Default::default()
            },
            "attraction field",
            "#4ecdc4",
        ),
        builtin(
            "electronic_dominance",
            "Electronic Dominance",
            "Layered electronic warfare systems reinforce each other",
            &[WeaponKind::Electronic, WeaponKind::Hpm, WeaponKind::RfTakeover],
            SynergyBonus {
                damage: Some(0.2),
                range: Some(0.3),
                cooldown: Some(0.1),
                accuracy: None,
            },
            "EM field",
            "#a29bfe",
        ),
        builtin(
            "ai_deception_combo",
            "Cognitive Warfare",
            "AI deception with decoys and chaff saturates the threat's sensors",
            &[WeaponKind::AiDeception, WeaponKind::DecoyBeacon, WeaponKind::Chaff],
            SynergyBonus {
                damage: Some(0.15),
                range: Some(0.2),
                cooldown: Some(0.25),
                accuracy: Some(0.1),
            },
            "cognitive disruption",
            "#fdcb6e",
        ),
    ]
}
