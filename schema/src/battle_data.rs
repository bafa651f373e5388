use crate::{AbilityId, ItemId, StatKind, StatusEffect, Weather};
use serde::{Deserialize, Serialize};

/// What an ability does. Abilities fire once when their holder enters battle,
/// except `StatusImmunity` which is checked whenever a status would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AbilityEffect {
    SetWeather { weather: Weather },
    LowerOpponentStat { stat: StatKind, stages: i8 },
    StatusImmunity { status: StatusEffect },
    /// Flavour-only ability.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityData {
    pub id: AbilityId,
    pub name: String,
    pub effect: AbilityEffect,
}

impl AbilityData {
    pub fn blocks_status(&self, status: StatusEffect) -> bool {
        matches!(self.effect, AbilityEffect::StatusImmunity { status: blocked } if blocked == status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ItemEffect {
    HealHp { amount: u16 },
    HealPercent { percent: u8 },
    /// Cures the given status, or any status when `status` is absent.
    CureStatus {
        #[serde(default)]
        status: Option<StatusEffect>,
    },
    /// Restores PP to the move named by the action's `targetMoveId`.
    RestorePp { amount: u8 },
    StatBoost { stat: StatKind, stages: i8 },
    /// Capture device; `multiplier` scales the catch rate.
    Capture { multiplier: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub id: ItemId,
    pub name: String,
    pub effect: ItemEffect,
}

impl ItemData {
    pub fn is_capture_device(&self) -> bool {
        matches!(self.effect, ItemEffect::Capture { .. })
    }
}
