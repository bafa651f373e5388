use crate::battle::action::{BattleAction, PlannedAction};
use crate::battle::catch::{calculate_catch_rate, roll_catch_success};
use crate::battle::damage::{confusion_damage, move_hits, roll_damage, AttackProfile};
use crate::battle::effects::{
    apply_move_effects, apply_switch_in_ability, change_stat_stage, monster_ability, monster_types,
    EffectScope,
};
use crate::battle::events::{BattleEvent, BattleLog, PreventionReason};
use crate::battle::move_learning::{self, process_level_ups};
use crate::battle::progression::{award_experience, experience_reward};
use crate::battle::rng::TurnRng;
use crate::battle::state::{
    BattleContext, BattlePhase, BattleSetup, BattleSummary, InitResult, Side, SwitchOutcome,
    TurnOutcome, TurnResult,
};
use crate::battle::status::{
    check_prevention, cure_status, end_of_turn_tick, percent_of_max_hp, try_apply_status, Prevention,
};
use crate::battle::turn_order::{effective_speed, resolve_order, ActionPriority, PriorityClass, TurnOrder};
use crate::battle::two_turn;
use crate::config::BattleConfig;
use crate::errors::{
    ActionError, BattleEngineError, BattleResult, ResourceError, StateConflictError,
};
use crate::monster::{MonsterInstance, TrappedState, TwoTurnPhase};
use crate::tables::ReferenceTables;
use schema::{ItemEffect, MoveTarget, StatusEffect};
use tracing::{debug, info, warn};

const DEFAULT_CHARGE_MESSAGE: &str = "began charging power!";

const SIDES: [Side; 2] = [Side::Player, Side::Opponent];

fn side_slot(side: Side) -> usize {
    match side {
        Side::Player => 0,
        Side::Opponent => 1,
    }
}

fn log_rejection(err: &BattleEngineError) {
    warn!(kind = err.kind(), error = %err, "action rejected");
}

/// Running record of one turn, from the player's point of view.
#[derive(Debug, Default)]
struct TurnTally {
    result: TurnResult,
    /// The battle ended by catch or flight rather than by fainting.
    finished: bool,
    winner: Option<Side>,
    faint_logged: [bool; 2],
}

impl TurnTally {
    fn mark(&mut self, side: Side, success: bool) {
        if side == Side::Player {
            self.result.success = success;
        }
    }

    fn record_damage(&mut self, side: Side, damage: u16, critical: bool) {
        match side {
            Side::Player => {
                self.result.damage = Some(damage);
                self.result.is_critical = Some(critical);
            }
            Side::Opponent => self.result.opponent_damage = Some(damage),
        }
    }

    fn finish(&mut self, winner: Option<Side>) {
        self.finished = true;
        self.winner = winner;
    }

    fn announce_faints(&mut self, ctx: &BattleContext, log: &mut BattleLog) {
        for side in SIDES {
            let monster = ctx.monster(side);
            let logged = &mut self.faint_logged[side_slot(side)];
            if monster.is_fainted() && !*logged {
                debug!(monster = %monster.name, ?side, "fainted");
                log.push(BattleEvent::Fainted {
                    name: monster.name.clone(),
                });
                *logged = true;
            }
        }
    }
}

/// Working state for a turn being resolved. Discarded if resolution fails.
struct Turn {
    ctx: BattleContext,
    log: BattleLog,
    tally: TurnTally,
}

/// Resolves battles against a fixed set of reference tables and rules.
///
/// The engine holds no battle state of its own. Every operation takes the
/// current [`BattleContext`] by reference and returns an updated copy, so one
/// engine can serve any number of independent battles.
#[derive(Debug, Clone)]
pub struct BattleEngine {
    tables: ReferenceTables,
    config: BattleConfig,
}

impl BattleEngine {
    pub fn new(tables: ReferenceTables) -> Self {
        Self::with_config(tables, BattleConfig::default())
    }

    pub fn with_config(tables: ReferenceTables, config: BattleConfig) -> Self {
        Self { tables, config }
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Send both monsters out, trigger their switch-in abilities (faster
    /// monster first) and open the battle for actions.
    pub fn initialize_battle(&self, setup: BattleSetup) -> BattleResult<InitResult> {
        self.validate_setup(&setup).inspect_err(log_rejection)?;

        let mut ctx = BattleContext {
            phase: BattlePhase::Initializing,
            kind: setup.kind,
            turn: 0,
            weather: Default::default(),
            player_monster: setup.player_monster,
            opponent_monster: setup.opponent_monster,
            player_bench: setup.player_bench,
            inventory: setup.inventory,
        };
        let mut log = BattleLog::new();
        let wild = ctx.is_wild();
        log.push(BattleEvent::SentOut {
            side: Side::Opponent,
            name: ctx.opponent_monster.name.clone(),
            wild,
        });
        log.push(BattleEvent::SentOut {
            side: Side::Player,
            name: ctx.player_monster.name.clone(),
            wild,
        });

        let order = self.speed_order(&ctx);
        for side in order.sides() {
            let (entering, other, weather) = ctx.split_mut(side);
            apply_switch_in_ability(entering, other, weather, &self.tables, &self.config, &mut log)?;
        }
        ctx.phase = BattlePhase::AwaitingActions;
        info!(
            kind = ?ctx.kind,
            player = %ctx.player_monster.name,
            opponent = %ctx.opponent_monster.name,
            "battle initialized"
        );

        Ok(InitResult {
            effects: log.messages(),
            player_goes_first: order.player_goes_first(),
            updated_player_monster: ctx.player_monster.clone(),
            updated_opponent_monster: ctx.opponent_monster.clone(),
            battle_context: ctx,
        })
    }

    /// Resolve one full turn.
    ///
    /// Both actions are validated before anything changes; a rejected action
    /// returns an error and leaves `context` as it was. Otherwise the turn runs
    /// to completion on a copy of the context, which is returned with the result.
    pub fn resolve_turn(
        &self,
        player_action: &BattleAction,
        opponent_action: &BattleAction,
        context: &BattleContext,
        rng: &mut TurnRng,
    ) -> BattleResult<TurnOutcome> {
        let (player_plan, opponent_plan) = self
            .check_ready(context)
            .and_then(|()| {
                let player = self.plan_action(context, Side::Player, player_action)?;
                let opponent = self.plan_action(context, Side::Opponent, opponent_action)?;
                Ok((player, opponent))
            })
            .inspect_err(log_rejection)?;

        let mut turn = Turn {
            ctx: context.clone(),
            log: BattleLog::new(),
            tally: TurnTally::default(),
        };
        turn.ctx.phase = BattlePhase::ResolvingTurn;
        turn.ctx.turn += 1;
        turn.log.push(BattleEvent::TurnStarted { turn: turn.ctx.turn });

        let order = self.action_order(&turn.ctx, &player_plan, &opponent_plan)?;
        debug!(turn = turn.ctx.turn, first = ?order.first, reason = %order.reason, "resolving turn");

        for side in order.sides() {
            if turn.tally.finished {
                break;
            }
            if turn.ctx.monster(side).is_fainted() {
                continue;
            }
            let plan = match side {
                Side::Player => &player_plan,
                Side::Opponent => &opponent_plan,
            };
            self.execute(&mut turn, side, plan, rng)?;
            turn.tally.announce_faints(&turn.ctx, &mut turn.log);
        }

        if !turn.tally.finished && !turn.ctx.opponent_monster.is_fainted() {
            self.end_of_turn(&mut turn)?;
            turn.tally.announce_faints(&turn.ctx, &mut turn.log);
        }

        self.finish_turn(turn, order.player_goes_first())
    }

    /// Replace a fainted active monster without spending a turn.
    pub fn auto_switch(&self, context: &BattleContext, new_monster_id: &str) -> BattleResult<SwitchOutcome> {
        let index = self
            .validate_auto_switch(context, new_monster_id)
            .inspect_err(log_rejection)?;

        let mut ctx = context.clone();
        let mut log = BattleLog::new();
        self.swap_in(&mut ctx, index, &mut log)?;
        ctx.phase = BattlePhase::AwaitingActions;
        debug!(monster = %ctx.player_monster.name, "auto-switch");

        Ok(SwitchOutcome {
            effects: log.messages(),
            updated_player_monster: ctx.player_monster.clone(),
            battle_context: ctx,
        })
    }

    /// Close the battle and hand back monsters ready to persist: stat stages,
    /// multi-turn states and status conditions are cleared.
    pub fn end_battle(&self, context: &BattleContext) -> BattleSummary {
        let mut ctx = context.clone();
        let monsters = std::iter::once(&mut ctx.player_monster)
            .chain(std::iter::once(&mut ctx.opponent_monster))
            .chain(ctx.player_bench.iter_mut());
        for monster in monsters {
            monster.clear_volatile_state();
            monster.status = None;
        }
        ctx.phase = BattlePhase::BattleEnded;
        info!(turns = ctx.turn, "battle closed");

        BattleSummary {
            player_monster: ctx.player_monster.clone(),
            player_bench: ctx.player_bench.clone(),
            opponent_monster: ctx.opponent_monster.clone(),
            inventory: ctx.inventory.clone(),
            battle_context: ctx,
        }
    }

    /// Settle a pending move-learn choice.
    pub fn learn_move(
        &self,
        monster: &MonsterInstance,
        move_id: &str,
        replace: Option<&str>,
    ) -> BattleResult<MonsterInstance> {
        move_learning::learn_move(monster, move_id, replace, &self.tables, self.config.progression.max_moves)
            .inspect_err(log_rejection)
    }

    fn validate_setup(&self, setup: &BattleSetup) -> BattleResult<()> {
        for monster in [&setup.player_monster, &setup.opponent_monster] {
            if monster.is_fainted() {
                return Err(StateConflictError::ActorFainted {
                    name: monster.name.clone(),
                }
                .into());
            }
        }
        let everyone = [&setup.player_monster, &setup.opponent_monster]
            .into_iter()
            .chain(setup.player_bench.iter());
        for monster in everyone {
            self.tables.species(&monster.species_id)?;
            monster_ability(&self.tables, monster)?;
            for slot in &monster.moves {
                self.tables.move_data(&slot.move_id)?;
            }
        }
        Ok(())
    }

    fn check_ready(&self, context: &BattleContext) -> BattleResult<()> {
        match context.phase {
            BattlePhase::AwaitingActions => {}
            BattlePhase::Initializing => return Err(StateConflictError::NotInitialized.into()),
            BattlePhase::ResolvingTurn => return Err(StateConflictError::TurnInProgress.into()),
            BattlePhase::AwaitingReplacement => {
                return Err(StateConflictError::AwaitingReplacement.into())
            }
            BattlePhase::BattleEnded => return Err(StateConflictError::BattleEnded.into()),
        }
        for side in SIDES {
            let monster = context.monster(side);
            if monster.is_fainted() {
                return Err(StateConflictError::ActorFainted {
                    name: monster.name.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Validate a submitted action, or replace it with the one a multi-turn
    /// move forces.
    fn plan_action(&self, ctx: &BattleContext, side: Side, action: &BattleAction) -> BattleResult<PlannedAction> {
        let monster = ctx.monster(side);
        match two_turn::pending_turn(monster) {
            two_turn::PendingTurn::Execute(move_id) => {
                return Ok(PlannedAction::Attack { move_id, forced: true })
            }
            two_turn::PendingTurn::Recharge => return Ok(PlannedAction::Recharge),
            two_turn::PendingTurn::Free => {}
        }
        if let Some(lock) = &monster.locking_move {
            return Ok(PlannedAction::Attack {
                move_id: lock.move_id.clone(),
                forced: true,
            });
        }
        if side == Side::Opponent && !matches!(action, BattleAction::Attack { .. } | BattleAction::Flee) {
            return Err(ActionError::NotAllowedForOpponent {
                action: action.label(),
            }
            .into());
        }

        match action {
            BattleAction::Attack { move_id } => {
                let slot = monster.move_slot(move_id).ok_or_else(|| ActionError::MoveNotKnown {
                    monster: monster.name.clone(),
                    move_id: move_id.clone(),
                })?;
                let data = self.tables.move_data(move_id)?;
                if slot.pp == 0 {
                    return Err(ResourceError::NoPpRemaining {
                        move_name: data.name.clone(),
                    }
                    .into());
                }
                Ok(PlannedAction::Attack {
                    move_id: move_id.clone(),
                    forced: false,
                })
            }
            BattleAction::Catch { item_id } => {
                if !ctx.is_wild() {
                    return Err(ActionError::WildBattleOnly { action: "catch" }.into());
                }
                let item = self.tables.item(item_id)?;
                if !item.is_capture_device() {
                    return Err(ActionError::NotACaptureDevice {
                        item_id: item_id.clone(),
                    }
                    .into());
                }
                self.require_in_bag(ctx, item_id)?;
                Ok(PlannedAction::Catch {
                    item_id: item_id.clone(),
                })
            }
            BattleAction::Item {
                item_id,
                target_id,
                target_move_id,
            } => {
                let item = self.tables.item(item_id)?;
                if item.is_capture_device() {
                    return Err(ActionError::CaptureDeviceMisused {
                        item_id: item_id.clone(),
                    }
                    .into());
                }
                self.require_in_bag(ctx, item_id)?;
                let bench_index = match target_id.as_deref() {
                    None => None,
                    Some(id) if id == ctx.player_monster.id => None,
                    Some(id) => Some(ctx.bench_index(id).ok_or_else(|| ActionError::UnknownPartyMember {
                        monster_id: id.to_string(),
                    })?),
                };
                if let ItemEffect::RestorePp { .. } = item.effect {
                    let Some(move_id) = target_move_id else {
                        return Err(ActionError::MissingTargetMove {
                            item_id: item_id.clone(),
                        }
                        .into());
                    };
                    let target = bench_index.map_or(&ctx.player_monster, |i| &ctx.player_bench[i]);
                    if !target.knows_move(move_id) {
                        return Err(ActionError::MoveNotKnown {
                            monster: target.name.clone(),
                            move_id: move_id.clone(),
                        }
                        .into());
                    }
                }
                Ok(PlannedAction::Item {
                    item_id: item_id.clone(),
                    bench_index,
                    target_move_id: target_move_id.clone(),
                })
            }
            BattleAction::Switch { new_monster_id } => {
                if monster.trapped_by.is_some() {
                    return Err(ActionError::Trapped {
                        name: monster.name.clone(),
                    }
                    .into());
                }
                let bench_index = self.switch_target(ctx, new_monster_id)?;
                Ok(PlannedAction::Switch { bench_index })
            }
            BattleAction::Flee => {
                if !ctx.is_wild() {
                    return Err(ActionError::WildBattleOnly { action: "flee" }.into());
                }
                if monster.trapped_by.is_some() {
                    return Err(ActionError::Trapped {
                        name: monster.name.clone(),
                    }
                    .into());
                }
                Ok(PlannedAction::Flee)
            }
        }
    }

    fn require_in_bag(&self, ctx: &BattleContext, item_id: &str) -> BattleResult<()> {
        if ctx.item_count(item_id) == 0 {
            return Err(ResourceError::ItemNotInInventory {
                item_id: item_id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn switch_target(&self, ctx: &BattleContext, monster_id: &str) -> BattleResult<usize> {
        if ctx.player_monster.id == monster_id {
            return Err(ActionError::SwitchTargetActive {
                name: ctx.player_monster.name.clone(),
            }
            .into());
        }
        let index = ctx
            .bench_index(monster_id)
            .ok_or_else(|| ActionError::UnknownPartyMember {
                monster_id: monster_id.to_string(),
            })?;
        let candidate = &ctx.player_bench[index];
        if candidate.is_fainted() {
            return Err(ActionError::SwitchTargetFainted {
                name: candidate.name.clone(),
            }
            .into());
        }
        Ok(index)
    }

    fn validate_auto_switch(&self, ctx: &BattleContext, monster_id: &str) -> BattleResult<usize> {
        match ctx.phase {
            BattlePhase::AwaitingReplacement => {}
            BattlePhase::BattleEnded => return Err(StateConflictError::BattleEnded.into()),
            _ => return Err(StateConflictError::NoReplacementPending.into()),
        }
        self.switch_target(ctx, monster_id)
    }

    fn speed_order(&self, ctx: &BattleContext) -> TurnOrder {
        let priority = |side: Side| ActionPriority {
            class: PriorityClass::Standard,
            move_priority: 0,
            speed: effective_speed(ctx.monster(side), &self.config.status),
        };
        resolve_order(
            priority(Side::Player),
            priority(Side::Opponent),
            &ctx.player_monster.name,
            &ctx.opponent_monster.name,
        )
    }

    fn action_order(
        &self,
        ctx: &BattleContext,
        player: &PlannedAction,
        opponent: &PlannedAction,
    ) -> BattleResult<TurnOrder> {
        let priority = |side: Side, plan: &PlannedAction| -> BattleResult<ActionPriority> {
            let class = match plan {
                PlannedAction::Catch { .. } | PlannedAction::Item { .. } => PriorityClass::Item,
                _ => PriorityClass::Standard,
            };
            let move_priority = match plan {
                PlannedAction::Attack { move_id, .. } => self.tables.move_data(move_id)?.priority,
                _ => 0,
            };
            Ok(ActionPriority {
                class,
                move_priority,
                speed: effective_speed(ctx.monster(side), &self.config.status),
            })
        };
        Ok(resolve_order(
            priority(Side::Player, player)?,
            priority(Side::Opponent, opponent)?,
            &ctx.player_monster.name,
            &ctx.opponent_monster.name,
        ))
    }

    fn execute(&self, turn: &mut Turn, side: Side, plan: &PlannedAction, rng: &mut TurnRng) -> BattleResult<()> {
        match plan {
            PlannedAction::Attack { move_id, forced } => self.execute_attack(turn, side, move_id, *forced, rng),
            PlannedAction::Recharge => {
                let monster = turn.ctx.monster_mut(side);
                two_turn::begin_action(monster);
                turn.log.push(BattleEvent::ActionPrevented {
                    actor: monster.name.clone(),
                    reason: PreventionReason::MustRecharge,
                });
                Ok(())
            }
            PlannedAction::Catch { item_id } => self.execute_catch(turn, item_id, rng),
            PlannedAction::Item {
                item_id,
                bench_index,
                target_move_id,
            } => self.execute_item(turn, item_id, *bench_index, target_move_id.as_deref()),
            PlannedAction::Switch { bench_index } => {
                self.swap_in(&mut turn.ctx, *bench_index, &mut turn.log)?;
                turn.tally.faint_logged[side_slot(Side::Player)] = false;
                turn.tally.result.monster_switched = Some(true);
                turn.tally.mark(side, true);
                Ok(())
            }
            PlannedAction::Flee => {
                turn.log.push(BattleEvent::Fled {
                    side,
                    name: turn.ctx.monster(side).name.clone(),
                });
                turn.tally.result.fled = Some(true);
                turn.tally.finish(None);
                turn.tally.mark(side, true);
                Ok(())
            }
        }
    }

    fn execute_attack(
        &self,
        turn: &mut Turn,
        side: Side,
        move_id: &str,
        forced: bool,
        rng: &mut TurnRng,
    ) -> BattleResult<()> {
        let config = &self.config;
        let move_data = self.tables.move_data(move_id)?;
        let Turn { ctx, log, tally } = turn;
        let (attacker, defender, weather) = ctx.split_mut(side);

        two_turn::begin_action(attacker);
        let locked = forced
            && attacker
                .locking_move
                .as_ref()
                .is_some_and(|lock| lock.move_id == move_id);

        match check_prevention(attacker, rng, &config.status, log) {
            Prevention::Proceed => {}
            Prevention::Skip(reason) => {
                debug!(monster = %attacker.name, ?reason, "action prevented");
                two_turn::interrupt(attacker);
                attacker.locking_move = None;
                return Ok(());
            }
            Prevention::HurtItself => {
                let damage = attacker.take_damage(confusion_damage(attacker, config));
                log.push(BattleEvent::HurtItself {
                    actor: attacker.name.clone(),
                    damage,
                });
                two_turn::interrupt(attacker);
                attacker.locking_move = None;
                return Ok(());
            }
        }

        if !forced {
            if let Some(slot) = attacker.move_slot_mut(move_id) {
                slot.use_pp();
            }
        }
        log.push(BattleEvent::MoveUsed {
            user: attacker.name.clone(),
            move_name: move_data.name.clone(),
        });

        let charged = attacker.two_turn_move.as_ref().is_some_and(|state| {
            state.phase == TwoTurnPhase::Charging && state.move_id == move_id
        });
        if move_data.charges_first() && !charged {
            two_turn::start_charging(attacker, move_data);
            let message = move_data
                .two_turn_move
                .as_ref()
                .and_then(|two_turn| two_turn.charge_message.clone())
                .unwrap_or_else(|| DEFAULT_CHARGE_MESSAGE.to_string());
            log.push(BattleEvent::ChargingStarted {
                user: attacker.name.clone(),
                message,
            });
            tally.mark(side, true);
            return Ok(());
        }

        let mut landed = true;
        let mut dealt = 0;
        if move_data.target == MoveTarget::Opponent {
            if defender.is_fainted() {
                log.push(BattleEvent::MoveFailed);
                landed = false;
            } else if !two_turn::can_target(defender, move_id, &self.tables)? {
                log.push(BattleEvent::AttackAvoided {
                    target: defender.name.clone(),
                });
                landed = false;
            } else if !move_hits(move_data, attacker, defender, weather, config, rng) {
                log.push(BattleEvent::MoveMissed {
                    user: attacker.name.clone(),
                });
                landed = false;
            } else if move_data.is_damaging() {
                let profile = AttackProfile {
                    attacker: &*attacker,
                    attacker_types: monster_types(&self.tables, attacker)?,
                    defender: &*defender,
                    defender_types: monster_types(&self.tables, defender)?,
                    move_data,
                    weather: &*weather,
                };
                let outcome = roll_damage(&profile, config, rng);
                if outcome.effectiveness == 0.0 {
                    log.push(BattleEvent::Effectiveness { multiplier: 0.0 });
                    landed = false;
                } else {
                    if outcome.critical {
                        log.push(BattleEvent::CriticalHit);
                    }
                    log.push(BattleEvent::Effectiveness {
                        multiplier: outcome.effectiveness,
                    });
                    dealt = defender.take_damage(outcome.damage);
                    log.push(BattleEvent::DamageDealt {
                        target: defender.name.clone(),
                        damage: dealt,
                        remaining_hp: defender.current_hp,
                    });
                    tally.record_damage(side, dealt, outcome.critical);
                }
            }
        }

        if landed {
            let mut scope = EffectScope {
                tables: &self.tables,
                config,
                weather: &mut *weather,
                rng: &mut *rng,
                log: &mut *log,
            };
            apply_move_effects(&mut scope, move_data, dealt, attacker, defender)?;
        }
        tally.mark(side, landed);

        if move_data.two_turn_move.is_some() {
            two_turn::finish_execution(attacker, move_data);
        }

        if locked {
            let finished = match attacker.locking_move.as_mut() {
                Some(lock) => {
                    lock.turns_remaining = lock.turns_remaining.saturating_sub(1);
                    lock.turns_remaining == 0
                }
                None => false,
            };
            if finished {
                attacker.locking_move = None;
                debug!(monster = %attacker.name, "rampage over");
                if !attacker.is_fainted() {
                    let types = monster_types(&self.tables, attacker)?;
                    let ability = monster_ability(&self.tables, attacker)?;
                    try_apply_status(
                        attacker,
                        StatusEffect::Confusion,
                        types,
                        ability,
                        weather,
                        &config.status,
                        log,
                    );
                }
            }
        }
        Ok(())
    }

    fn execute_catch(&self, turn: &mut Turn, item_id: &str, rng: &mut TurnRng) -> BattleResult<()> {
        let item = self.tables.item(item_id)?;
        let ItemEffect::Capture { multiplier } = item.effect else {
            return Ok(());
        };
        turn.ctx.consume_item(item_id);
        turn.tally.result.items_used.push(item_id.to_string());
        turn.log.push(BattleEvent::CaptureDeviceThrown {
            item: item.name.clone(),
        });

        let target = &turn.ctx.opponent_monster;
        let species = self.tables.species(&target.species_id)?;
        let rate = calculate_catch_rate(target, species, multiplier);
        let caught = roll_catch_success(rate, rng);
        debug!(target = %target.name, rate, caught, "capture attempt");

        turn.tally.result.monster_caught = Some(caught);
        if caught {
            turn.log.push(BattleEvent::Caught {
                name: target.name.clone(),
            });
            turn.tally.finish(Some(Side::Player));
        } else {
            turn.log.push(BattleEvent::BrokeFree {
                name: target.name.clone(),
            });
        }
        turn.tally.mark(Side::Player, caught);
        Ok(())
    }

    fn execute_item(
        &self,
        turn: &mut Turn,
        item_id: &str,
        bench_index: Option<usize>,
        target_move_id: Option<&str>,
    ) -> BattleResult<()> {
        let item = self.tables.item(item_id)?;
        let Turn { ctx, log, tally } = turn;

        let applies = {
            let target = bench_index.map_or(Some(&ctx.player_monster), |i| ctx.player_bench.get(i));
            target.is_some_and(|target| item_applies(item.effect, target, target_move_id))
        };
        if !applies {
            log.push(BattleEvent::ItemHadNoEffect);
            return Ok(());
        }

        ctx.consume_item(item_id);
        tally.result.items_used.push(item_id.to_string());
        let target = match bench_index {
            Some(i) => &mut ctx.player_bench[i],
            None => &mut ctx.player_monster,
        };
        log.push(BattleEvent::ItemUsed {
            item: item.name.clone(),
            target: target.name.clone(),
        });

        match item.effect {
            ItemEffect::HealHp { amount } => heal_with_item(target, amount, log),
            ItemEffect::HealPercent { percent } => {
                let amount = percent_of_max_hp(target.max_hp, percent);
                heal_with_item(target, amount, log);
            }
            ItemEffect::CureStatus { status } => {
                cure_status(target, status, log);
            }
            ItemEffect::RestorePp { amount } => {
                if let Some(move_id) = target_move_id {
                    let name = target.name.clone();
                    if let Some(slot) = target.move_slot_mut(move_id) {
                        let restored = slot.restore_pp(amount);
                        log.push(BattleEvent::PpRestored {
                            target: name,
                            move_name: self.tables.move_name(move_id).to_string(),
                            amount: restored,
                        });
                    }
                }
            }
            ItemEffect::StatBoost { stat, stages } => {
                change_stat_stage(target, stat, stages, log);
            }
            ItemEffect::Capture { .. } => {}
        }
        debug!(item = %item.id, "item used");
        tally.mark(Side::Player, true);
        Ok(())
    }

    /// Recall the player's active monster and send in a bench member.
    fn swap_in(&self, ctx: &mut BattleContext, bench_index: usize, log: &mut BattleLog) -> BattleResult<()> {
        if bench_index >= ctx.player_bench.len() {
            return Err(ActionError::BenchSlotEmpty { index: bench_index }.into());
        }
        let outgoing = &mut ctx.player_monster;
        outgoing.clear_volatile_state();
        if !outgoing.is_fainted() {
            log.push(BattleEvent::Recalled {
                name: outgoing.name.clone(),
            });
        }
        std::mem::swap(&mut ctx.player_monster, &mut ctx.player_bench[bench_index]);
        // Any bind on the opponent came from the monster that just left.
        ctx.opponent_monster.trapped_by = None;
        log.push(BattleEvent::SentOut {
            side: Side::Player,
            name: ctx.player_monster.name.clone(),
            wild: ctx.is_wild(),
        });

        let (entering, other, weather) = ctx.split_mut(Side::Player);
        apply_switch_in_ability(entering, other, weather, &self.tables, &self.config, log)?;
        Ok(())
    }

    fn end_of_turn(&self, turn: &mut Turn) -> BattleResult<()> {
        let Turn { ctx, log, .. } = turn;
        let weather = ctx.weather;
        for side in SIDES {
            let monster = ctx.monster_mut(side);
            if monster.is_fainted() {
                continue;
            }
            end_of_turn_tick(monster, &self.config.status, log);
            self.tick_bind(monster, log);

            if monster.is_fainted() {
                continue;
            }
            let types = monster_types(&self.tables, monster)?;
            if let Some(chip) = weather.chip_damage(types, monster.max_hp, &self.config.weather) {
                let damage = monster.take_damage(chip);
                log.push(BattleEvent::WeatherDamage {
                    target: monster.name.clone(),
                    weather: weather.weather,
                    damage,
                });
            }
        }
        if let Some(ended) = ctx.weather.tick() {
            log.push(BattleEvent::WeatherEnded { weather: ended });
        }
        Ok(())
    }

    fn tick_bind(&self, monster: &mut MonsterInstance, log: &mut BattleLog) {
        let Some(trap) = monster.trapped_by.clone() else {
            return;
        };
        let move_name = self.tables.move_name(&trap.move_id).to_string();
        if !monster.is_fainted() {
            let chip = (monster.max_hp / self.config.multi_turn.bind_chip_divisor.max(1)).max(1);
            let damage = monster.take_damage(chip);
            log.push(BattleEvent::BindDamage {
                target: monster.name.clone(),
                move_name: move_name.clone(),
                damage,
            });
        }
        let turns_remaining = trap.turns_remaining.saturating_sub(1);
        if turns_remaining == 0 {
            monster.trapped_by = None;
            log.push(BattleEvent::BindEnded {
                target: monster.name.clone(),
                move_name,
            });
        } else {
            monster.trapped_by = Some(TrappedState {
                turns_remaining,
                ..trap
            });
        }
    }

    fn grant_experience(&self, ctx: &mut BattleContext, result: &mut TurnResult, log: &mut BattleLog) -> BattleResult<()> {
        let progression = &self.config.progression;
        let defeated = self.tables.species(&ctx.opponent_monster.species_id)?;
        let amount = experience_reward(defeated, ctx.opponent_monster.level, ctx.kind, progression);
        let species = self.tables.species(&ctx.player_monster.species_id)?;

        let levels = award_experience(&mut ctx.player_monster, amount, species, progression, log);
        let report = process_level_ups(
            &mut ctx.player_monster,
            species,
            &levels,
            &self.tables,
            progression.max_moves,
            log,
        )?;
        result.experience_gained = Some(amount);
        result.move_learn_events = report.events;
        result.auto_learned_moves = report.auto_learned;
        Ok(())
    }

    /// Faint, win and loss checks, then package the turn.
    fn finish_turn(&self, turn: Turn, player_goes_first: bool) -> BattleResult<TurnOutcome> {
        let Turn {
            mut ctx,
            mut log,
            tally,
        } = turn;
        let mut result = tally.result;
        let mut team_wipe = false;
        let mut requires_auto_switch = false;
        let mut ended = tally.finished;
        let mut winner = tally.winner;

        if !tally.finished {
            let opponent_down = ctx.opponent_monster.is_fainted();
            let player_down = ctx.player_monster.is_fainted();
            let bench_ready = ctx.has_healthy_bench();

            if opponent_down {
                ended = true;
                if player_down && !bench_ready {
                    team_wipe = true;
                    winner = None;
                } else {
                    winner = Some(Side::Player);
                }
                if !player_down {
                    self.grant_experience(&mut ctx, &mut result, &mut log)?;
                }
            } else if player_down {
                if bench_ready {
                    requires_auto_switch = true;
                } else {
                    ended = true;
                    team_wipe = true;
                    winner = Some(Side::Opponent);
                }
            }
        }

        for side in SIDES {
            let monster = ctx.monster_mut(side);
            if monster.is_fainted() {
                monster.clear_volatile_state();
            }
        }

        ctx.phase = if ended {
            BattlePhase::BattleEnded
        } else if requires_auto_switch {
            BattlePhase::AwaitingReplacement
        } else {
            BattlePhase::AwaitingActions
        };
        if ended {
            log.push(BattleEvent::BattleEnded { winner });
            info!(turn = ctx.turn, ?winner, team_wipe, "battle ended");
        } else if requires_auto_switch {
            debug!(monster = %ctx.player_monster.name, "replacement required");
        }

        result.battle_ended = ended;
        result.winner = winner;
        result.effects = log.messages();

        Ok(TurnOutcome {
            result,
            updated_player_monster: ctx.player_monster.clone(),
            updated_opponent_monster: ctx.opponent_monster.clone(),
            team_wipe,
            requires_auto_switch,
            player_goes_first,
            battle_context: ctx,
        })
    }
}

/// Whether an item would do anything to `target`. Items that would not are
/// kept in the bag.
fn item_applies(effect: ItemEffect, target: &MonsterInstance, target_move_id: Option<&str>) -> bool {
    if target.is_fainted() {
        return false;
    }
    match effect {
        ItemEffect::HealHp { .. } | ItemEffect::HealPercent { .. } => target.current_hp < target.max_hp,
        ItemEffect::CureStatus { status } => target
            .status
            .is_some_and(|current| status.is_none() || status == Some(current.effect)),
        ItemEffect::RestorePp { .. } => target_move_id
            .and_then(|id| target.move_slot(id))
            .is_some_and(|slot| slot.pp < slot.max_pp),
        ItemEffect::StatBoost { .. } => true,
        ItemEffect::Capture { .. } => false,
    }
}

fn heal_with_item(target: &mut MonsterInstance, amount: u16, log: &mut BattleLog) {
    let healed = target.heal(amount);
    log.push(BattleEvent::Healed {
        target: target.name.clone(),
        amount: healed,
    });
}
