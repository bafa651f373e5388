//! Experience rewards and level-ups.

use crate::battle::events::{BattleEvent, BattleLog};
use crate::battle::state::BattleKind;
use crate::config::ProgressionConfig;
use crate::monster::{experience_for_level, MonsterInstance};
use schema::SpeciesData;

/// floor(base_exp * level / divisor), scaled up in trainer battles.
pub fn experience_reward(
    defeated: &SpeciesData,
    defeated_level: u8,
    kind: BattleKind,
    config: &ProgressionConfig,
) -> u32 {
    let base = defeated.base_exp as u32 * defeated_level as u32 / config.exp_divisor.max(1);
    match kind {
        BattleKind::Wild => base,
        BattleKind::Trainer => (base as f64 * config.trainer_exp_multiplier).floor() as u32,
    }
}

/// Add experience and apply every level it unlocks. Returns the levels reached,
/// lowest first.
pub fn award_experience(
    monster: &mut MonsterInstance,
    amount: u32,
    species: &SpeciesData,
    config: &ProgressionConfig,
    log: &mut BattleLog,
) -> Vec<u8> {
    if amount == 0 {
        return Vec::new();
    }
    monster.experience = monster.experience.saturating_add(amount);
    log.push(BattleEvent::ExperienceGained {
        name: monster.name.clone(),
        amount,
    });

    let mut reached = Vec::new();
    while monster.level < config.max_level && monster.experience >= experience_for_level(monster.level + 1) {
        let level = monster.level + 1;
        monster.set_level(level, species);
        log.push(BattleEvent::LevelUp {
            name: monster.name.clone(),
            level,
        });
        reached.push(level);
    }
    if !reached.is_empty() {
        tracing::debug!(monster = %monster.name, level = monster.level, "level up");
    }
    reached
}
