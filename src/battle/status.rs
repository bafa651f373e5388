//! Status conditions: application, turn-start prevention and end-of-turn damage.
//!
//! A monster holds at most one status. Applying a new one while another is
//! active is rejected; the existing condition is never replaced.

use crate::battle::events::{BattleEvent, BattleLog, PreventionReason};
use crate::battle::rng::TurnRng;
use crate::battle::weather::WeatherCondition;
use crate::config::StatusConfig;
use crate::monster::{MonsterInstance, StatusCondition};
use schema::{AbilityData, MonsterType, StatKind, StatusEffect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusApplication {
    Applied,
    AlreadyAfflicted,
    Immune,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prevention {
    Proceed,
    Skip(PreventionReason),
    /// Confusion turned the action against the user.
    HurtItself,
}

/// Types that can never carry the given status.
fn type_blocks_status(effect: StatusEffect, types: &[MonsterType]) -> bool {
    types.iter().any(|t| match effect {
        StatusEffect::Burn | StatusEffect::BadlyBurn => *t == MonsterType::Fire,
        StatusEffect::Poison | StatusEffect::BadlyPoisoned => {
            matches!(t, MonsterType::Poison | MonsterType::Steel)
        }
        StatusEffect::Paralyze => *t == MonsterType::Electric,
        StatusEffect::Frostbite => *t == MonsterType::Ice,
        StatusEffect::Sleep | StatusEffect::Confusion => false,
    })
}

pub fn try_apply_status(
    monster: &mut MonsterInstance,
    effect: StatusEffect,
    types: &[MonsterType],
    ability: Option<&AbilityData>,
    weather: &WeatherCondition,
    config: &StatusConfig,
    log: &mut BattleLog,
) -> StatusApplication {
    if monster.is_fainted() || monster.status.is_some() {
        return StatusApplication::AlreadyAfflicted;
    }
    if type_blocks_status(effect, types)
        || ability.is_some_and(|a| a.blocks_status(effect))
        || weather.prevents_status(effect)
    {
        return StatusApplication::Immune;
    }

    monster.status = Some(match effect {
        StatusEffect::Confusion => StatusCondition::with_duration(effect, config.confusion_turns),
        _ => StatusCondition::new(effect),
    });
    tracing::debug!(monster = %monster.name, status = %effect, "status applied");
    log.push(BattleEvent::StatusApplied {
        target: monster.name.clone(),
        status: effect,
    });
    StatusApplication::Applied
}

/// Cure the monster's status, or only `only` when given. Returns what was cured.
pub fn cure_status(
    monster: &mut MonsterInstance,
    only: Option<StatusEffect>,
    log: &mut BattleLog,
) -> Option<StatusEffect> {
    let current = monster.status?.effect;
    if only.is_some_and(|wanted| wanted != current) {
        return None;
    }
    monster.status = None;
    log.push(BattleEvent::StatusCured {
        target: monster.name.clone(),
        status: current,
    });
    Some(current)
}

/// Multiplier a status applies to one of the holder's stats.
pub fn stat_penalty(status: Option<&StatusCondition>, stat: StatKind, config: &StatusConfig) -> f64 {
    let Some(status) = status else {
        return 1.0;
    };
    let penalized = match status.effect {
        StatusEffect::Burn | StatusEffect::Poison | StatusEffect::BadlyPoisoned => {
            matches!(stat, StatKind::Attack | StatKind::SpecialAttack)
        }
        StatusEffect::BadlyBurn => matches!(stat, StatKind::Defense | StatKind::SpecialDefense),
        StatusEffect::Paralyze => stat == StatKind::Speed,
        StatusEffect::Frostbite | StatusEffect::Sleep | StatusEffect::Confusion => false,
    };
    if penalized {
        config.stat_penalty
    } else {
        1.0
    }
}

/// Turn-start check run before the monster acts.
pub fn check_prevention(
    monster: &mut MonsterInstance,
    rng: &mut TurnRng,
    config: &StatusConfig,
    log: &mut BattleLog,
) -> Prevention {
    let Some(status) = monster.status else {
        return Prevention::Proceed;
    };
    let actor = monster.name.clone();

    match status.effect {
        StatusEffect::Sleep => {
            if rng.roll_chance(config.sleep_wake_chance, "Wake Up Check") {
                cure_status(monster, None, log);
                Prevention::Proceed
            } else {
                log.push(BattleEvent::ActionPrevented {
                    actor,
                    reason: PreventionReason::Asleep,
                });
                Prevention::Skip(PreventionReason::Asleep)
            }
        }
        StatusEffect::Paralyze => {
            if rng.roll_chance(config.paralysis_skip_chance, "Immobilized by Paralysis Check") {
                log.push(BattleEvent::ActionPrevented {
                    actor,
                    reason: PreventionReason::Paralyzed,
                });
                Prevention::Skip(PreventionReason::Paralyzed)
            } else {
                Prevention::Proceed
            }
        }
        StatusEffect::Frostbite => {
            if rng.roll_chance(config.frostbite_skip_chance, "Frozen by Frostbite Check") {
                log.push(BattleEvent::ActionPrevented {
                    actor,
                    reason: PreventionReason::Frostbitten,
                });
                Prevention::Skip(PreventionReason::Frostbitten)
            } else {
                Prevention::Proceed
            }
        }
        StatusEffect::Confusion => {
            let remaining = status.duration.unwrap_or(0);
            if remaining == 0 {
                cure_status(monster, None, log);
                return Prevention::Proceed;
            }
            if let Some(current) = monster.status.as_mut() {
                current.duration = Some(remaining - 1);
            }
            log.push(BattleEvent::IsConfused { actor });
            if rng.roll_chance(config.confusion_self_hit_chance, "Hit Itself in Confusion Check") {
                Prevention::HurtItself
            } else {
                Prevention::Proceed
            }
        }
        StatusEffect::Burn
        | StatusEffect::BadlyBurn
        | StatusEffect::Poison
        | StatusEffect::BadlyPoisoned => Prevention::Proceed,
    }
}

fn damage_percent(effect: StatusEffect, config: &StatusConfig) -> u8 {
    match effect {
        StatusEffect::Burn => config.burn_damage_percent,
        StatusEffect::BadlyBurn => config.badly_burn_damage_percent,
        StatusEffect::Poison => config.poison_damage_percent,
        StatusEffect::BadlyPoisoned => config.badly_poisoned_damage_percent,
        StatusEffect::Frostbite => config.frostbite_damage_percent,
        StatusEffect::Paralyze | StatusEffect::Sleep | StatusEffect::Confusion => 0,
    }
}

/// Percentage of max HP, floored, at least 1 when max HP is positive.
pub fn percent_of_max_hp(max_hp: u16, percent: u8) -> u16 {
    if max_hp == 0 || percent == 0 {
        return 0;
    }
    ((max_hp as u32 * percent as u32 / 100) as u16).max(1)
}

/// End-of-turn tick: damaging statuses hurt, and every status ages a turn.
/// Returns the HP lost.
pub fn end_of_turn_tick(monster: &mut MonsterInstance, config: &StatusConfig, log: &mut BattleLog) -> u16 {
    if monster.is_fainted() {
        return 0;
    }
    let Some(status) = monster.status.as_mut() else {
        return 0;
    };
    status.turns_active = status.turns_active.saturating_add(1);
    let effect = status.effect;

    let damage = percent_of_max_hp(monster.max_hp, damage_percent(effect, config));
    if damage == 0 {
        return 0;
    }
    let dealt = monster.take_damage(damage);
    log.push(BattleEvent::StatusDamage {
        target: monster.name.clone(),
        status: effect,
        damage: dealt,
    });
    dealt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestMonsterBuilder;
    use rstest::rstest;
    use schema::Weather;

    fn apply(monster: &mut MonsterInstance, effect: StatusEffect, types: &[MonsterType]) -> StatusApplication {
        try_apply_status(
            monster,
            effect,
            types,
            None,
            &WeatherCondition::default(),
            &StatusConfig::default(),
            &mut BattleLog::new(),
        )
    }

    #[rstest]
    #[case("burn", StatusEffect::Burn, 5)]
    #[case("badly burn", StatusEffect::BadlyBurn, 10)]
    #[case("poison", StatusEffect::Poison, 5)]
    #[case("badly poisoned", StatusEffect::BadlyPoisoned, 10)]
    #[case("frostbite", StatusEffect::Frostbite, 5)]
    #[case("paralysis", StatusEffect::Paralyze, 0)]
    #[case("sleep", StatusEffect::Sleep, 0)]
    fn test_end_of_turn_damage(#[case] desc: &str, #[case] effect: StatusEffect, #[case] expected: u16) {
        let mut monster = TestMonsterBuilder::new("target").with_hp(100, 100).with_status(effect).build();
        let mut log = BattleLog::new();

        let dealt = end_of_turn_tick(&mut monster, &StatusConfig::default(), &mut log);

        assert_eq!(dealt, expected, "{}", desc);
        assert_eq!(monster.current_hp, 100 - expected, "{}", desc);
        assert_eq!(monster.status.map(|s| s.turns_active), Some(1));
    }

    #[test]
    fn test_status_damage_is_at_least_one() {
        let mut monster = TestMonsterBuilder::new("tiny").with_hp(10, 10).with_status(StatusEffect::Burn).build();
        let dealt = end_of_turn_tick(&mut monster, &StatusConfig::default(), &mut BattleLog::new());
        assert_eq!(dealt, 1);
    }

    #[test]
    fn test_second_status_is_rejected() {
        let mut monster = TestMonsterBuilder::new("target").with_status(StatusEffect::Poison).build();
        assert_eq!(
            apply(&mut monster, StatusEffect::Burn, &[MonsterType::Normal]),
            StatusApplication::AlreadyAfflicted
        );
        assert!(monster.has_status(StatusEffect::Poison));
    }

    #[rstest]
    #[case(StatusEffect::Burn, MonsterType::Fire)]
    #[case(StatusEffect::Poison, MonsterType::Steel)]
    #[case(StatusEffect::BadlyPoisoned, MonsterType::Poison)]
    #[case(StatusEffect::Paralyze, MonsterType::Electric)]
    #[case(StatusEffect::Frostbite, MonsterType::Ice)]
    fn test_type_immunities(#[case] effect: StatusEffect, #[case] immune_type: MonsterType) {
        let mut monster = TestMonsterBuilder::new("target").build();
        assert_eq!(
            apply(&mut monster, effect, &[MonsterType::Normal, immune_type]),
            StatusApplication::Immune
        );
        assert!(monster.status.is_none());
    }

    #[test]
    fn test_sun_prevents_frostbite() {
        let mut monster = TestMonsterBuilder::new("target").build();
        let mut weather = WeatherCondition::default();
        weather.set(Weather::Sun, Some(5));
        let outcome = try_apply_status(
            &mut monster,
            StatusEffect::Frostbite,
            &[MonsterType::Normal],
            None,
            &weather,
            &StatusConfig::default(),
            &mut BattleLog::new(),
        );
        assert_eq!(outcome, StatusApplication::Immune);
    }

    #[test]
    fn test_confusion_gets_a_duration() {
        let mut monster = TestMonsterBuilder::new("target").build();
        apply(&mut monster, StatusEffect::Confusion, &[MonsterType::Normal]);
        assert_eq!(monster.status.and_then(|s| s.duration), Some(3));
    }

    #[rstest]
    #[case("paralysis skips on low roll", StatusEffect::Paralyze, 40, Prevention::Skip(PreventionReason::Paralyzed))]
    #[case("paralysis acts on high roll", StatusEffect::Paralyze, 41, Prevention::Proceed)]
    #[case("frostbite skips on low roll", StatusEffect::Frostbite, 30, Prevention::Skip(PreventionReason::Frostbitten))]
    #[case("frostbite acts on high roll", StatusEffect::Frostbite, 31, Prevention::Proceed)]
    #[case("sleep wakes on low roll", StatusEffect::Sleep, 40, Prevention::Proceed)]
    #[case("sleep holds on high roll", StatusEffect::Sleep, 41, Prevention::Skip(PreventionReason::Asleep))]
    #[case("confusion self-hit on low roll", StatusEffect::Confusion, 30, Prevention::HurtItself)]
    #[case("confusion acts on high roll", StatusEffect::Confusion, 31, Prevention::Proceed)]
    #[case("burn never prevents", StatusEffect::Burn, 1, Prevention::Proceed)]
    fn test_prevention_thresholds(
        #[case] desc: &str,
        #[case] effect: StatusEffect,
        #[case] roll: u8,
        #[case] expected: Prevention,
    ) {
        let mut monster = TestMonsterBuilder::new("actor").with_status(effect).build();
        let mut rng = TurnRng::scripted(vec![roll]);
        let outcome = check_prevention(&mut monster, &mut rng, &StatusConfig::default(), &mut BattleLog::new());
        assert_eq!(outcome, expected, "{}", desc);
    }

    #[test]
    fn test_waking_up_clears_sleep() {
        let mut monster = TestMonsterBuilder::new("sleeper").with_status(StatusEffect::Sleep).build();
        let mut log = BattleLog::new();
        check_prevention(&mut monster, &mut TurnRng::scripted(vec![1]), &StatusConfig::default(), &mut log);
        assert!(monster.status.is_none());
        assert_eq!(log.messages(), vec!["Sleeper woke up!".to_string()]);
    }

    #[test]
    fn test_confusion_times_out() {
        let config = StatusConfig::default();
        let mut monster = TestMonsterBuilder::new("dizzy").build();
        monster.status = Some(StatusCondition::with_duration(StatusEffect::Confusion, 1));
        let mut rng = TurnRng::scripted(vec![90]);
        let mut log = BattleLog::new();

        // One confused turn left: rolls and stays confused
        assert_eq!(check_prevention(&mut monster, &mut rng, &config, &mut log), Prevention::Proceed);
        assert!(monster.has_status(StatusEffect::Confusion));

        // Next turn it snaps out without rolling
        assert_eq!(check_prevention(&mut monster, &mut rng, &config, &mut log), Prevention::Proceed);
        assert!(monster.status.is_none());
        assert_eq!(rng.remaining(), Some(0));
    }

    #[test]
    fn test_paralysis_skips_about_forty_percent() {
        let config = StatusConfig::default();
        let mut rng = TurnRng::seeded(2024);
        let mut skipped = 0;
        for _ in 0..10_000 {
            let mut monster = TestMonsterBuilder::new("para").with_status(StatusEffect::Paralyze).build();
            if check_prevention(&mut monster, &mut rng, &config, &mut BattleLog::new()) != Prevention::Proceed {
                skipped += 1;
            }
        }
        assert!((3_700..=4_300).contains(&skipped), "skipped {} of 10000", skipped);
    }

    #[test]
    fn test_stat_penalties() {
        let config = StatusConfig::default();
        let burn = StatusCondition::new(StatusEffect::Burn);
        let badly_burn = StatusCondition::new(StatusEffect::BadlyBurn);
        let paralysis = StatusCondition::new(StatusEffect::Paralyze);
        assert_eq!(stat_penalty(Some(&burn), StatKind::Attack, &config), 0.9);
        assert_eq!(stat_penalty(Some(&burn), StatKind::SpecialAttack, &config), 0.9);
        assert_eq!(stat_penalty(Some(&burn), StatKind::Defense, &config), 1.0);
        assert_eq!(stat_penalty(Some(&badly_burn), StatKind::SpecialDefense, &config), 0.9);
        assert_eq!(stat_penalty(Some(&paralysis), StatKind::Speed, &config), 0.9);
        assert_eq!(stat_penalty(None, StatKind::Speed, &config), 1.0);
    }

    #[test]
    fn test_cure_respects_filter() {
        let mut monster = TestMonsterBuilder::new("target").with_status(StatusEffect::Poison).build();
        let mut log = BattleLog::new();
        assert_eq!(cure_status(&mut monster, Some(StatusEffect::Burn), &mut log), None);
        assert_eq!(cure_status(&mut monster, Some(StatusEffect::Poison), &mut log), Some(StatusEffect::Poison));
        assert!(monster.status.is_none());
    }
}
