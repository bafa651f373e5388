use crate::{BaseStats, MonsterType, MoveId, SpeciesId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnsetEntry {
    pub level: u8,
    pub move_id: MoveId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesData {
    pub id: SpeciesId,
    pub name: String,
    pub types: Vec<MonsterType>,
    pub base_stats: BaseStats,
    #[serde(default)]
    pub learnset: Vec<LearnsetEntry>,
    #[serde(default = "default_catch_rate")]
    pub catch_rate: u8,
    #[serde(default = "default_base_exp")]
    pub base_exp: u16,
}

fn default_catch_rate() -> u8 {
    45
}

fn default_base_exp() -> u16 {
    64
}

impl SpeciesData {
    /// Moves this species picks up on reaching exactly `level`, in table order.
    pub fn learns_at_level(&self, level: u8) -> impl Iterator<Item = &MoveId> {
        self.learnset
            .iter()
            .filter(move |entry| entry.level == level)
            .map(|entry| &entry.move_id)
    }

    /// Whether the move appears anywhere in the learnset at or below `level`.
    pub fn can_learn_by(&self, move_id: &str, level: u8) -> bool {
        self.learnset
            .iter()
            .any(|entry| entry.move_id == move_id && entry.level <= level)
    }

    pub fn has_type(&self, monster_type: MonsterType) -> bool {
        self.types.contains(&monster_type)
    }
}
