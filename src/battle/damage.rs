//! Hit, critical and damage rolls.
//!
//! Each damaging hit draws its rolls in a fixed order: accuracy (when the
//! move has one), then critical, then variance. Type-immune targets skip the
//! critical and variance rolls entirely.

use crate::battle::rng::TurnRng;
use crate::battle::stat_stages::{accuracy_stage_multiplier, apply_stage};
use crate::battle::status::stat_penalty;
use crate::battle::weather::WeatherCondition;
use crate::config::BattleConfig;
use crate::monster::MonsterInstance;
use schema::{MonsterType, MoveCategory, MoveData, StatKind};

/// Stat after its stage multiplier and any status penalty. Never below 1.
pub fn effective_stat(monster: &MonsterInstance, stat: StatKind, config: &BattleConfig) -> u16 {
    let Some(raw) = monster.stats.get(stat) else {
        return 1;
    };
    let staged = apply_stage(raw, monster.stat_modifiers.get(stat));
    let penalty = stat_penalty(monster.status.as_ref(), stat, &config.status);
    ((staged as f64 * penalty).floor() as u16).max(1)
}

/// Final hit threshold (1..=100) for a move with base `accuracy`.
pub fn accuracy_threshold(
    accuracy: u8,
    attacker: &MonsterInstance,
    defender: &MonsterInstance,
    weather: &WeatherCondition,
    config: &BattleConfig,
) -> u8 {
    let stage = attacker.stat_modifiers.get(StatKind::Accuracy) as i16
        - defender.stat_modifiers.get(StatKind::Evasion) as i16;
    let stage = stage.clamp(-6, 6) as i8;
    let threshold = accuracy as f64
        * accuracy_stage_multiplier(stage)
        * weather.accuracy_multiplier(&config.weather);
    threshold.round().clamp(1.0, 100.0) as u8
}

/// Roll to hit. Moves without an accuracy value never miss and draw no roll.
pub fn move_hits(
    move_data: &MoveData,
    attacker: &MonsterInstance,
    defender: &MonsterInstance,
    weather: &WeatherCondition,
    config: &BattleConfig,
    rng: &mut TurnRng,
) -> bool {
    let Some(accuracy) = move_data.accuracy else {
        return true;
    };
    let threshold = accuracy_threshold(accuracy, attacker, defender, weather, config);
    rng.roll_chance(threshold, "Accuracy Check")
}

/// floor(floor(floor(2L/5 + 2) * P * A / D) / 50) + 2
pub fn base_damage(level: u8, power: u16, attack: u16, defense: u16) -> u32 {
    let level_factor = 2 * level as u32 / 5 + 2;
    let scaled = level_factor * power as u32 * attack as u32 / defense.max(1) as u32;
    scaled / 50 + 2
}

/// Map a 1..=100 roll linearly onto `floor..=100`.
pub fn variance_percent(roll: u8, floor: u8) -> u32 {
    let floor = floor.min(100) as u32;
    let roll = roll.clamp(1, 100) as u32;
    floor + (roll - 1) * (100 - floor + 1) / 100
}

/// Everything about one hit that the damage roll reads.
#[derive(Debug, Clone, Copy)]
pub struct AttackProfile<'a> {
    pub attacker: &'a MonsterInstance,
    pub attacker_types: &'a [MonsterType],
    pub defender: &'a MonsterInstance,
    pub defender_types: &'a [MonsterType],
    pub move_data: &'a MoveData,
    pub weather: &'a WeatherCondition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u16,
    pub critical: bool,
    pub effectiveness: f64,
}

impl DamageOutcome {
    fn immune() -> Self {
        Self {
            damage: 0,
            critical: false,
            effectiveness: 0.0,
        }
    }
}

fn attacking_stats(category: MoveCategory) -> (StatKind, StatKind) {
    match category {
        MoveCategory::Special => (StatKind::SpecialAttack, StatKind::SpecialDefense),
        MoveCategory::Physical | MoveCategory::Status => (StatKind::Attack, StatKind::Defense),
    }
}

/// Roll critical and variance, then apply the full damage formula.
pub fn roll_damage(profile: &AttackProfile<'_>, config: &BattleConfig, rng: &mut TurnRng) -> DamageOutcome {
    let move_data = profile.move_data;
    let effectiveness = MonsterType::effectiveness_against(move_data.move_type, profile.defender_types);
    if effectiveness == 0.0 {
        return DamageOutcome::immune();
    }

    let critical = rng.roll_chance(config.damage.critical_chance, "Critical Hit Check");
    let variance = variance_percent(rng.next_outcome("Damage Variance"), config.damage.variance_floor);

    let (attack_stat, defense_stat) = attacking_stats(move_data.category);
    let attack = effective_stat(profile.attacker, attack_stat, config);
    let defense = effective_stat(profile.defender, defense_stat, config);
    let base = base_damage(profile.attacker.level, move_data.power, attack, defense);

    let stab = if move_data.move_type != MonsterType::Typeless
        && profile.attacker_types.contains(&move_data.move_type)
    {
        config.damage.stab_multiplier
    } else {
        1.0
    };
    let crit = if critical {
        config.damage.critical_multiplier
    } else {
        1.0
    };
    let weather = profile
        .weather
        .damage_multiplier(move_data.move_type, &config.weather);

    let total = base as f64 * (variance as f64 / 100.0) * stab * effectiveness * crit * weather;
    let damage = total.floor().clamp(0.0, u16::MAX as f64) as u16;
    tracing::debug!(
        move_id = %move_data.id,
        base,
        variance,
        critical,
        effectiveness,
        damage,
        "damage rolled"
    );
    DamageOutcome {
        damage,
        critical,
        effectiveness,
    }
}

/// Damage a confused monster deals to itself: a typeless physical hit with
/// no critical and no variance. Draws no rolls.
pub fn confusion_damage(monster: &MonsterInstance, config: &BattleConfig) -> u16 {
    let attack = effective_stat(monster, StatKind::Attack, config);
    let defense = effective_stat(monster, StatKind::Defense, config);
    let base = base_damage(monster.level, config.status.confusion_self_hit_power, attack, defense);
    base.min(u16::MAX as u32) as u16
}
