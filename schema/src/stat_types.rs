use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A stat that can carry a battle stage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StatKind {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl StatKind {
    /// Human-readable name used in the battle log.
    pub fn label(self) -> &'static str {
        match self {
            StatKind::Attack => "Attack",
            StatKind::Defense => "Defense",
            StatKind::SpecialAttack => "Sp. Atk",
            StatKind::SpecialDefense => "Sp. Def",
            StatKind::Speed => "Speed",
            StatKind::Accuracy => "accuracy",
            StatKind::Evasion => "evasiveness",
        }
    }
}

/// The six permanent stats of a monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl BaseStats {
    /// Value of a stat; accuracy and evasion have no base value.
    pub fn get(&self, stat: StatKind) -> Option<u16> {
        match stat {
            StatKind::Attack => Some(self.attack),
            StatKind::Defense => Some(self.defense),
            StatKind::SpecialAttack => Some(self.special_attack),
            StatKind::SpecialDefense => Some(self.special_defense),
            StatKind::Speed => Some(self.speed),
            StatKind::Accuracy | StatKind::Evasion => None,
        }
    }
}
