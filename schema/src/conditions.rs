use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Major and volatile afflictions. A monster carries at most one at a time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusEffect {
    Burn,
    BadlyBurn,
    Poison,
    BadlyPoisoned,
    Paralyze,
    Frostbite,
    Sleep,
    Confusion,
}

impl StatusEffect {
    /// Phrase appended to the monster's name when the status lands.
    pub fn applied_phrase(self) -> &'static str {
        match self {
            StatusEffect::Burn => "was burned!",
            StatusEffect::BadlyBurn => "was badly burned!",
            StatusEffect::Poison => "was poisoned!",
            StatusEffect::BadlyPoisoned => "was badly poisoned!",
            StatusEffect::Paralyze => "is paralyzed! It may be unable to move!",
            StatusEffect::Frostbite => "got frostbite!",
            StatusEffect::Sleep => "fell asleep!",
            StatusEffect::Confusion => "became confused!",
        }
    }

    /// Noun used when describing damage or cures ("hurt by its burn").
    pub fn noun(self) -> &'static str {
        match self {
            StatusEffect::Burn | StatusEffect::BadlyBurn => "burn",
            StatusEffect::Poison | StatusEffect::BadlyPoisoned => "poison",
            StatusEffect::Paralyze => "paralysis",
            StatusEffect::Frostbite => "frostbite",
            StatusEffect::Sleep => "sleep",
            StatusEffect::Confusion => "confusion",
        }
    }
}

/// Battle-wide weather.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Weather {
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    Clear,
    Sun,
    Rain,
    Sandstorm,
    Snow,
    Fog,
}
