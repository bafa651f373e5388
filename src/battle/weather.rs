use crate::config::WeatherConfig;
use schema::{MonsterType, StatusEffect, Weather};
use serde::{Deserialize, Serialize};

/// The battle-wide weather slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherCondition {
    pub weather: Weather,
    /// `None` means the weather lasts until replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turns_remaining: Option<u8>,
}

impl Default for WeatherCondition {
    fn default() -> Self {
        Self {
            weather: Weather::Clear,
            turns_remaining: None,
        }
    }
}

impl WeatherCondition {
    pub fn is_clear(&self) -> bool {
        self.weather == Weather::Clear
    }

    /// Overwrite the current weather and restart its countdown.
    pub fn set(&mut self, weather: Weather, duration: Option<u8>) {
        self.weather = weather;
        self.turns_remaining = if weather == Weather::Clear {
            None
        } else {
            duration
        };
    }

    /// Count one turn down. Returns the weather that just ended, if any.
    pub fn tick(&mut self) -> Option<Weather> {
        let remaining = self.turns_remaining?;
        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            let ended = self.weather;
            *self = WeatherCondition::default();
            Some(ended)
        } else {
            self.turns_remaining = Some(remaining);
            None
        }
    }

    /// Damage multiplier for a move of `move_type`.
    pub fn damage_multiplier(&self, move_type: MonsterType, config: &WeatherConfig) -> f64 {
        match (self.weather, move_type) {
            (Weather::Sun, MonsterType::Fire) | (Weather::Rain, MonsterType::Water) => {
                config.boost_multiplier
            }
            (Weather::Sun, MonsterType::Water) | (Weather::Rain, MonsterType::Fire) => {
                config.weaken_multiplier
            }
            _ => 1.0,
        }
    }

    pub fn accuracy_multiplier(&self, config: &WeatherConfig) -> f64 {
        match self.weather {
            Weather::Fog => config.fog_accuracy_multiplier,
            _ => 1.0,
        }
    }

    /// End-of-turn chip damage for a monster with `types`, if it is not immune.
    pub fn chip_damage(&self, types: &[MonsterType], max_hp: u16, config: &WeatherConfig) -> Option<u16> {
        let immune = match self.weather {
            Weather::Sandstorm => types
                .iter()
                .any(|t| matches!(t, MonsterType::Rock | MonsterType::Ground | MonsterType::Steel)),
            Weather::Snow => types.contains(&MonsterType::Ice),
            _ => return None,
        };
        if immune || max_hp == 0 {
            return None;
        }
        Some((max_hp / config.chip_divisor.max(1)).max(1))
    }

    pub fn prevents_status(&self, status: StatusEffect) -> bool {
        matches!((self.weather, status), (Weather::Sun, StatusEffect::Frostbite))
    }
}
