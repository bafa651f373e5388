//! Tunable battle constants.
//!
//! `BattleConfig::default()` is the canonical rule set. A RON file may
//! override any subset of fields; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read battle config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse battle config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Per-status numbers. Percentages are of max HP; chances are out of 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub burn_damage_percent: u8,
    pub badly_burn_damage_percent: u8,
    pub poison_damage_percent: u8,
    pub badly_poisoned_damage_percent: u8,
    pub frostbite_damage_percent: u8,
    /// Multiplier applied to the stats a status weakens.
    pub stat_penalty: f64,
    pub paralysis_skip_chance: u8,
    pub frostbite_skip_chance: u8,
    pub sleep_wake_chance: u8,
    pub confusion_self_hit_chance: u8,
    /// Turns confusion lasts before it wears off.
    pub confusion_turns: u8,
    pub confusion_self_hit_power: u16,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            burn_damage_percent: 5,
            badly_burn_damage_percent: 10,
            poison_damage_percent: 5,
            badly_poisoned_damage_percent: 10,
            frostbite_damage_percent: 5,
            stat_penalty: 0.9,
            paralysis_skip_chance: 40,
            frostbite_skip_chance: 30,
            sleep_wake_chance: 40,
            confusion_self_hit_chance: 30,
            confusion_turns: 3,
            confusion_self_hit_power: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    pub critical_chance: u8,
    pub critical_multiplier: f64,
    pub stab_multiplier: f64,
    /// Lowest random variance percentage; the highest is always 100.
    pub variance_floor: u8,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            critical_chance: 6,
            critical_multiplier: 1.5,
            stab_multiplier: 1.5,
            variance_floor: 85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub default_turns: u8,
    pub boost_multiplier: f64,
    pub weaken_multiplier: f64,
    /// Chip damage is max HP divided by this.
    pub chip_divisor: u16,
    pub fog_accuracy_multiplier: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            default_turns: 5,
            boost_multiplier: 1.5,
            weaken_multiplier: 0.5,
            chip_divisor: 16,
            fog_accuracy_multiplier: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiTurnConfig {
    pub bind_turns: u8,
    pub bind_chip_divisor: u16,
    pub rampage_min_turns: u8,
    pub rampage_max_turns: u8,
}

impl Default for MultiTurnConfig {
    fn default() -> Self {
        Self {
            bind_turns: 4,
            bind_chip_divisor: 8,
            rampage_min_turns: 2,
            rampage_max_turns: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub exp_divisor: u32,
    pub trainer_exp_multiplier: f64,
    pub max_level: u8,
    pub max_moves: usize,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            exp_divisor: 7,
            trainer_exp_multiplier: 1.5,
            max_level: 100,
            max_moves: 4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub status: StatusConfig,
    pub damage: DamageConfig,
    pub weather: WeatherConfig,
    pub multi_turn: MultiTurnConfig,
    pub progression: ProgressionConfig,
}

impl BattleConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded battle config");
        Ok(config)
    }
}
