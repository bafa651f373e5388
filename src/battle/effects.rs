//! Secondary move effects and switch-in abilities.

use crate::battle::events::{BattleEvent, BattleLog};
use crate::battle::rng::TurnRng;
use crate::battle::stat_stages::{add_stages, StatModifiers};
use crate::battle::status::{cure_status, percent_of_max_hp, try_apply_status, StatusApplication};
use crate::battle::weather::WeatherCondition;
use crate::config::BattleConfig;
use crate::errors::LookupResult;
use crate::monster::{LockingMoveState, MonsterInstance, TrappedState};
use crate::tables::ReferenceTables;
use schema::{
    AbilityData, AbilityEffect, EffectKind, EffectTarget, MonsterType, MoveCategory, MoveData,
    MoveEffectEntry, MoveTarget, StatKind, Weather,
};

/// Shared battle resources an effect may read or change.
pub struct EffectScope<'a> {
    pub tables: &'a ReferenceTables,
    pub config: &'a BattleConfig,
    pub weather: &'a mut WeatherCondition,
    pub rng: &'a mut TurnRng,
    pub log: &'a mut BattleLog,
}

/// Types of a monster's species.
pub fn monster_types<'t>(tables: &'t ReferenceTables, monster: &MonsterInstance) -> LookupResult<&'t [MonsterType]> {
    Ok(&tables.species(&monster.species_id)?.types)
}

pub fn monster_ability<'t>(
    tables: &'t ReferenceTables,
    monster: &MonsterInstance,
) -> LookupResult<Option<&'t AbilityData>> {
    monster
        .ability_id
        .as_deref()
        .map(|id| tables.ability(id))
        .transpose()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recipient {
    User,
    Target,
}

fn recipient_of(entry: &MoveEffectEntry, move_data: &MoveData) -> Recipient {
    match (entry.target, move_data.target) {
        (EffectTarget::User, _) | (EffectTarget::Target, MoveTarget::User) => Recipient::User,
        (EffectTarget::Target, MoveTarget::Opponent) => Recipient::Target,
    }
}

fn pick<'m>(
    recipient: Recipient,
    user: &'m mut MonsterInstance,
    target: &'m mut MonsterInstance,
) -> &'m mut MonsterInstance {
    match recipient {
        Recipient::User => user,
        Recipient::Target => target,
    }
}

/// Shift one stat stage and log the result, or the limit it ran into.
pub fn change_stat_stage(monster: &mut MonsterInstance, stat: StatKind, delta: i8, log: &mut BattleLog) -> i8 {
    let before = monster.stat_modifiers.get(stat);
    monster.stat_modifiers = add_stages(&monster.stat_modifiers, &StatModifiers::new().with(stat, delta));
    let applied = monster.stat_modifiers.get(stat) - before;
    if applied == 0 {
        log.push(BattleEvent::StatStageAtLimit {
            target: monster.name.clone(),
            stat,
            rising: delta > 0,
        });
    } else {
        log.push(BattleEvent::StatStageChanged {
            target: monster.name.clone(),
            stat,
            delta: applied,
        });
    }
    applied
}

/// Replace the weather, logging the change.
pub fn set_weather(weather: &mut WeatherCondition, next: Weather, config: &BattleConfig, log: &mut BattleLog) {
    if next == Weather::Clear {
        if !weather.is_clear() {
            log.push(BattleEvent::WeatherEnded {
                weather: weather.weather,
            });
        }
        weather.set(Weather::Clear, None);
        return;
    }
    weather.set(next, Some(config.weather.default_turns));
    log.push(BattleEvent::WeatherStarted { weather: next });
}

fn share_of(amount: u16, percent: u8) -> u16 {
    ((amount as u32 * percent as u32 / 100) as u16).max(1)
}

/// Roll and apply every secondary effect of a move that just resolved.
///
/// Damaging moves only carry their effects when they dealt damage. Each effect
/// entry draws exactly one chance roll, in list order; a rampage that starts a
/// new lock draws one more roll for its length.
pub fn apply_move_effects(
    scope: &mut EffectScope<'_>,
    move_data: &MoveData,
    damage_dealt: u16,
    user: &mut MonsterInstance,
    target: &mut MonsterInstance,
) -> LookupResult<()> {
    let is_status_move = move_data.category == MoveCategory::Status;
    if !is_status_move && damage_dealt == 0 {
        return Ok(());
    }

    for entry in &move_data.effects {
        if !scope.rng.roll_chance(entry.chance, "Move Effect Check") {
            continue;
        }
        let recipient = recipient_of(entry, move_data);
        match entry.effect {
            EffectKind::InflictStatus(status) => {
                let monster = pick(recipient, user, target);
                let types = monster_types(scope.tables, monster)?;
                let ability = monster_ability(scope.tables, monster)?;
                let outcome = try_apply_status(
                    monster,
                    status,
                    types,
                    ability,
                    scope.weather,
                    &scope.config.status,
                    scope.log,
                );
                if is_status_move {
                    match outcome {
                        StatusApplication::Applied => {}
                        StatusApplication::Immune => scope.log.push(BattleEvent::StatusBlocked {
                            target: monster.name.clone(),
                        }),
                        StatusApplication::AlreadyAfflicted => scope.log.push(BattleEvent::MoveFailed),
                    }
                }
            }
            EffectKind::StatChange(stat, delta) => {
                let monster = pick(recipient, user, target);
                if !monster.is_fainted() {
                    change_stat_stage(monster, stat, delta, scope.log);
                }
            }
            EffectKind::SetWeather(weather) => {
                set_weather(scope.weather, weather, scope.config, scope.log);
            }
            EffectKind::Bind => {
                let monster = pick(recipient, user, target);
                if !monster.is_fainted() && monster.trapped_by.is_none() {
                    monster.trapped_by = Some(TrappedState {
                        move_id: move_data.id.clone(),
                        turns_remaining: scope.config.multi_turn.bind_turns,
                    });
                    scope.log.push(BattleEvent::Trapped {
                        target: monster.name.clone(),
                        move_name: move_data.name.clone(),
                    });
                }
            }
            EffectKind::Rampage => {
                if user.locking_move.is_none() {
                    let multi_turn = &scope.config.multi_turn;
                    let span = multi_turn.rampage_max_turns.saturating_sub(multi_turn.rampage_min_turns) as u32 + 1;
                    let roll = scope.rng.next_outcome("Rampage Duration") as u32;
                    let turns = multi_turn.rampage_min_turns as u32 + (roll.max(1) - 1) * span / 100;
                    user.locking_move = Some(LockingMoveState {
                        move_id: move_data.id.clone(),
                        turns_remaining: turns.saturating_sub(1) as u8,
                    });
                    scope.log.push(BattleEvent::LockedIn {
                        user: user.name.clone(),
                    });
                }
            }
            EffectKind::Recoil(percent) => {
                if damage_dealt > 0 && !user.is_fainted() {
                    let damage = user.take_damage(share_of(damage_dealt, percent));
                    scope.log.push(BattleEvent::RecoilDamage {
                        user: user.name.clone(),
                        damage,
                    });
                }
            }
            EffectKind::Drain(percent) => {
                if damage_dealt > 0 && !user.is_fainted() {
                    scope.log.push(BattleEvent::Drained {
                        target: target.name.clone(),
                    });
                    let amount = user.heal(share_of(damage_dealt, percent));
                    if amount > 0 {
                        scope.log.push(BattleEvent::Healed {
                            target: user.name.clone(),
                            amount,
                        });
                    }
                }
            }
            EffectKind::Heal(percent) => {
                let monster = pick(recipient, user, target);
                let amount = if monster.is_fainted() {
                    0
                } else {
                    monster.heal(percent_of_max_hp(monster.max_hp, percent))
                };
                if amount > 0 {
                    scope.log.push(BattleEvent::Healed {
                        target: monster.name.clone(),
                        amount,
                    });
                } else if is_status_move {
                    scope.log.push(BattleEvent::MoveFailed);
                }
            }
            EffectKind::CureStatus => {
                let monster = pick(recipient, user, target);
                if cure_status(monster, None, scope.log).is_none() && is_status_move {
                    scope.log.push(BattleEvent::MoveFailed);
                }
            }
        }
    }
    Ok(())
}

/// Trigger the ability of a monster entering the field.
pub fn apply_switch_in_ability(
    entering: &mut MonsterInstance,
    opponent: &mut MonsterInstance,
    weather: &mut WeatherCondition,
    tables: &ReferenceTables,
    config: &BattleConfig,
    log: &mut BattleLog,
) -> LookupResult<()> {
    let Some(ability) = monster_ability(tables, entering)? else {
        return Ok(());
    };
    match ability.effect {
        AbilityEffect::SetWeather { weather: next } => {
            log.push(BattleEvent::AbilityActivated {
                monster: entering.name.clone(),
                ability: ability.name.clone(),
            });
            set_weather(weather, next, config, log);
        }
        AbilityEffect::LowerOpponentStat { stat, stages } => {
            if opponent.is_fainted() {
                return Ok(());
            }
            log.push(BattleEvent::AbilityActivated {
                monster: entering.name.clone(),
                ability: ability.name.clone(),
            });
            change_stat_stage(opponent, stat, -stages.saturating_abs(), log);
        }
        AbilityEffect::StatusImmunity { .. } | AbilityEffect::None => {}
    }
    tracing::debug!(monster = %entering.name, ability = %ability.id, "switch-in ability");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{fixture_tables, TestMonsterBuilder};
    use crate::monster::StatusCondition;
    use pretty_assertions::assert_eq;
    use schema::StatusEffect;

    struct Harness {
        tables: ReferenceTables,
        config: BattleConfig,
        weather: WeatherCondition,
        log: BattleLog,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                tables: fixture_tables(),
                config: BattleConfig::default(),
                weather: WeatherCondition::default(),
                log: BattleLog::new(),
            }
        }

        fn apply(
            &mut self,
            move_id: &str,
            damage: u16,
            user: &mut MonsterInstance,
            target: &mut MonsterInstance,
            rolls: Vec<u8>,
        ) -> TurnRng {
            let mut rng = TurnRng::scripted(rolls);
            let move_data = self.tables.move_data(move_id).unwrap().clone();
            let mut scope = EffectScope {
                tables: &self.tables,
                config: &self.config,
                weather: &mut self.weather,
                rng: &mut rng,
                log: &mut self.log,
            };
            apply_move_effects(&mut scope, &move_data, damage, user, target).unwrap();
            rng
        }
    }

    #[test]
    fn test_secondary_status_respects_chance() {
        let mut harness = Harness::new();
        let mut user = TestMonsterBuilder::new("user").build();
        let mut target = TestMonsterBuilder::new("target").build();

        // ember: 10% burn. A roll of 11 misses, 10 lands.
        harness.apply("ember", 12, &mut user, &mut target, vec![11]);
        assert!(target.status.is_none());
        harness.apply("ember", 12, &mut user, &mut target, vec![10]);
        assert!(target.has_status(StatusEffect::Burn));
    }

    #[test]
    fn test_damaging_move_that_dealt_nothing_skips_effects() {
        let mut harness = Harness::new();
        let mut user = TestMonsterBuilder::new("user").build();
        let mut target = TestMonsterBuilder::new("target").build();
        let rng = harness.apply("ember", 0, &mut user, &mut target, vec![]);
        assert_eq!(rng.remaining(), Some(0));
        assert!(harness.log.is_empty());
    }

    #[test]
    fn test_status_move_on_afflicted_target_fails() {
        let mut harness = Harness::new();
        let mut user = TestMonsterBuilder::new("user").build();
        let mut target = TestMonsterBuilder::new("target").with_status(StatusEffect::Poison).build();
        harness.apply("sleep_powder", 0, &mut user, &mut target, vec![50]);
        assert!(target.has_status(StatusEffect::Poison));
        assert_eq!(harness.log.messages(), vec!["But it failed!".to_string()]);
    }

    #[test]
    fn test_stat_changes_target_and_self() {
        let mut harness = Harness::new();
        let mut user = TestMonsterBuilder::new("user").build();
        let mut target = TestMonsterBuilder::new("target").build();

        harness.apply("growl", 0, &mut user, &mut target, vec![1]);
        harness.apply("swords_dance", 0, &mut user, &mut target, vec![1]);

        assert_eq!(target.stat_modifiers.get(StatKind::Attack), -1);
        assert_eq!(user.stat_modifiers.get(StatKind::Attack), 2);
        assert_eq!(
            harness.log.messages(),
            vec!["Target's Attack fell!".to_string(), "User's Attack rose sharply!".to_string()]
        );
    }

    #[test]
    fn test_stat_change_at_limit_reports_it() {
        let mut harness = Harness::new();
        let mut user = TestMonsterBuilder::new("user").build();
        let mut target = TestMonsterBuilder::new("target").build();
        user.stat_modifiers = StatModifiers::new().with(StatKind::Attack, 6);
        harness.apply("swords_dance", 0, &mut user, &mut target, vec![1]);
        assert_eq!(user.stat_modifiers.get(StatKind::Attack), 6);
        assert_eq!(harness.log.messages(), vec!["User's Attack won't go any higher!".to_string()]);
    }

    #[test]
    fn test_weather_move_sets_default_duration() {
        let mut harness = Harness::new();
        let mut user = TestMonsterBuilder::new("user").build();
        let mut target = TestMonsterBuilder::new("target").build();
        harness.apply("rain_dance", 0, &mut user, &mut target, vec![1]);
        assert_eq!(harness.weather.weather, Weather::Rain);
        assert_eq!(harness.weather.turns_remaining, Some(5));
    }

    #[test]
    fn test_bind_traps_once() {
        let mut harness = Harness::new();
        let mut user = TestMonsterBuilder::new("user").build();
        let mut target = TestMonsterBuilder::new("target").build();
        harness.apply("wrap", 5, &mut user, &mut target, vec![1]);
        assert_eq!(target.trapped_by.as_ref().map(|t| t.turns_remaining), Some(4));

        target.trapped_by.as_mut().unwrap().turns_remaining = 2;
        harness.apply("wrap", 5, &mut user, &mut target, vec![1]);
        assert_eq!(target.trapped_by.as_ref().map(|t| t.turns_remaining), Some(2));
    }

    #[test]
    fn test_rampage_lock_length_follows_roll() {
        let mut harness = Harness::new();
        let mut target = TestMonsterBuilder::new("target").build();

        let mut short = TestMonsterBuilder::new("user").build();
        harness.apply("thrash", 10, &mut short, &mut target, vec![1, 50]);
        assert_eq!(short.locking_move.as_ref().map(|l| l.turns_remaining), Some(1));

        let mut long = TestMonsterBuilder::new("user").build();
        harness.apply("thrash", 10, &mut long, &mut target, vec![1, 51]);
        assert_eq!(long.locking_move.as_ref().map(|l| l.turns_remaining), Some(2));

        // An existing lock is not restarted and draws no length roll
        let rng = harness.apply("thrash", 10, &mut long, &mut target, vec![1]);
        assert_eq!(rng.remaining(), Some(0));

        // A zero roll reads as the shortest lock
        let mut floor = TestMonsterBuilder::new("user").build();
        harness.apply("thrash", 10, &mut floor, &mut target, vec![1, 0]);
        assert_eq!(floor.locking_move.as_ref().map(|l| l.turns_remaining), Some(1));
    }

    #[test]
    fn test_recoil_and_drain_scale_with_damage() {
        let mut harness = Harness::new();
        let mut user = TestMonsterBuilder::new("user").with_hp(50, 100).build();
        let mut target = TestMonsterBuilder::new("target").build();

        harness.apply("take_down", 40, &mut user, &mut target, vec![1]);
        assert_eq!(user.current_hp, 40);

        harness.apply("giga_drain", 30, &mut user, &mut target, vec![1]);
        assert_eq!(user.current_hp, 55);
    }

    #[test]
    fn test_heal_and_cure_fail_when_nothing_to_do() {
        let mut harness = Harness::new();
        let mut user = TestMonsterBuilder::new("user").build();
        let mut target = TestMonsterBuilder::new("target").build();
        harness.apply("recover", 0, &mut user, &mut target, vec![1]);
        harness.apply("refresh", 0, &mut user, &mut target, vec![1]);
        assert_eq!(
            harness.log.messages(),
            vec!["But it failed!".to_string(), "But it failed!".to_string()]
        );

        user.current_hp = 10;
        user.status = Some(StatusCondition::new(StatusEffect::Burn));
        harness.apply("recover", 0, &mut user, &mut target, vec![1]);
        harness.apply("refresh", 0, &mut user, &mut target, vec![1]);
        assert_eq!(user.current_hp, 60);
        assert!(user.status.is_none());
    }

    #[test]
    fn test_switch_in_abilities() {
        let tables = fixture_tables();
        let config = BattleConfig::default();
        let mut weather = WeatherCondition::default();
        let mut log = BattleLog::new();

        let mut drizzler = TestMonsterBuilder::new("drizzler").with_ability("drizzle").build();
        let mut scary = TestMonsterBuilder::new("scary").with_ability("intimidate").build();
        let mut foe = TestMonsterBuilder::new("foe").build();

        apply_switch_in_ability(&mut drizzler, &mut foe, &mut weather, &tables, &config, &mut log).unwrap();
        apply_switch_in_ability(&mut scary, &mut foe, &mut weather, &tables, &config, &mut log).unwrap();

        assert_eq!(weather.weather, Weather::Rain);
        assert_eq!(foe.stat_modifiers.get(StatKind::Attack), -1);
        assert_eq!(
            log.messages(),
            vec![
                "[Drizzler's Drizzle]".to_string(),
                "It started to rain!".to_string(),
                "[Scary's Intimidate]".to_string(),
                "Foe's Attack fell!".to_string(),
            ]
        );
    }

    #[test]
    fn test_extreme_stat_drop_ability_clamps_to_floor() {
        let tables = fixture_tables().with_ability(AbilityData {
            id: "dread".into(),
            name: "Dread".into(),
            effect: AbilityEffect::LowerOpponentStat {
                stat: StatKind::Attack,
                stages: i8::MIN,
            },
        });
        let config = BattleConfig::default();
        let mut weather = WeatherCondition::default();
        let mut log = BattleLog::new();

        let mut dreadful = TestMonsterBuilder::new("dreadful").with_ability("dread").build();
        let mut foe = TestMonsterBuilder::new("foe").build();
        apply_switch_in_ability(&mut dreadful, &mut foe, &mut weather, &tables, &config, &mut log).unwrap();

        assert_eq!(foe.stat_modifiers.get(StatKind::Attack), -6);
    }
}
