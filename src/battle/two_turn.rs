//! Charge / execute / recharge state machine for multi-turn moves.
//!
//! `none -> charging -> executing -> (recharging | none)`. The executing
//! phase stays visible on the monster until its next action begins.

use crate::errors::LookupResult;
use crate::monster::{MonsterInstance, TwoTurnMoveState, TwoTurnPhase};
use crate::tables::ReferenceTables;
use schema::{MoveData, MoveId};

/// What the two-turn state demands of the monster's next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingTurn {
    /// The player's chosen action stands.
    Free,
    /// The stored move fires, ignoring any chosen action.
    Execute(MoveId),
    /// The monster loses this turn.
    Recharge,
}

/// Peek at what the next action must be, without changing state.
pub fn pending_turn(monster: &MonsterInstance) -> PendingTurn {
    match &monster.two_turn_move {
        Some(TwoTurnMoveState {
            phase: TwoTurnPhase::Charging,
            move_id,
            ..
        }) => PendingTurn::Execute(move_id.clone()),
        Some(TwoTurnMoveState {
            phase: TwoTurnPhase::Recharging,
            ..
        }) => PendingTurn::Recharge,
        _ => PendingTurn::Free,
    }
}

/// Called as the monster's action begins. Executing and recharging states
/// have run their course and are cleared here; a charging state is left in
/// place until the stored move resolves.
pub fn begin_action(monster: &mut MonsterInstance) -> PendingTurn {
    let pending = pending_turn(monster);
    if matches!(
        monster.two_turn_move.as_ref().map(|state| state.phase),
        Some(TwoTurnPhase::Executing | TwoTurnPhase::Recharging)
    ) {
        tracing::debug!(monster = %monster.name, "two-turn state cleared");
        monster.two_turn_move = None;
    }
    pending
}

/// Enter the charging phase for a freshly selected charging move.
pub fn start_charging(monster: &mut MonsterInstance, data: &MoveData) {
    let semi_invulnerable_state = data
        .two_turn_move
        .as_ref()
        .and_then(|two_turn| two_turn.semi_invulnerable_state);
    tracing::debug!(monster = %monster.name, move_id = %data.id, "charging");
    monster.two_turn_move = Some(TwoTurnMoveState {
        move_id: data.id.clone(),
        phase: TwoTurnPhase::Charging,
        semi_invulnerable_state,
    });
}

/// Record that a multi-turn move has just resolved.
pub fn finish_execution(monster: &mut MonsterInstance, data: &MoveData) {
    if data.two_turn_move.is_none() {
        return;
    }
    let phase = if data.requires_recharge() {
        TwoTurnPhase::Recharging
    } else {
        TwoTurnPhase::Executing
    };
    monster.two_turn_move = Some(TwoTurnMoveState {
        move_id: data.id.clone(),
        phase,
        semi_invulnerable_state: None,
    });
}

/// Drop any two-turn state. PP already spent is not refunded.
pub fn interrupt(monster: &mut MonsterInstance) {
    if monster.two_turn_move.take().is_some() {
        tracing::debug!(monster = %monster.name, "two-turn move interrupted");
    }
}

/// Whether `incoming` can reach `defender`, given any semi-invulnerable charge.
pub fn can_target(
    defender: &MonsterInstance,
    incoming: &str,
    tables: &ReferenceTables,
) -> LookupResult<bool> {
    if defender.semi_invulnerable().is_none() {
        return Ok(true);
    }
    let Some(state) = defender.two_turn_move.as_ref() else {
        return Ok(true);
    };
    let charging = tables.move_data(&state.move_id)?;
    Ok(charging
        .two_turn_move
        .as_ref()
        .is_some_and(|two_turn| two_turn.counter_moves.iter().any(|id| id == incoming)))
}
