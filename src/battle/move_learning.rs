//! Moves unlocked by level-ups.
//!
//! A move unlocked while the monster has a free slot is learned on the spot.
//! When every slot is taken the choice goes back to the caller as a
//! [`MoveLearnEvent`], to be settled later through `learn_move`.

use crate::battle::events::{BattleEvent, BattleLog};
use crate::errors::{ActionError, BattleResult};
use crate::monster::{MonsterInstance, MoveSlot};
use crate::tables::ReferenceTables;
use schema::{MoveId, SpeciesData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveLearnEvent {
    pub monster_id: String,
    pub new_move: MoveId,
    pub level: u8,
    /// True when the move fit into a free slot and was learned already.
    pub can_learn: bool,
    /// The moves to choose a replacement from, when no slot was free.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_moves: Option<Vec<MoveId>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveLearnReport {
    pub events: Vec<MoveLearnEvent>,
    pub auto_learned: Vec<MoveId>,
}

/// Process every move unlocked at `levels`, in order.
pub fn process_level_ups(
    monster: &mut MonsterInstance,
    species: &SpeciesData,
    levels: &[u8],
    tables: &ReferenceTables,
    max_moves: usize,
    log: &mut BattleLog,
) -> BattleResult<MoveLearnReport> {
    let mut report = MoveLearnReport::default();
    for &level in levels {
        for move_id in species.learns_at_level(level) {
            if monster.knows_move(move_id) {
                continue;
            }
            let data = tables.move_data(move_id)?;
            if monster.moves.len() < max_moves {
                monster.moves.push(MoveSlot::new(data));
                log.push(BattleEvent::MoveLearned {
                    name: monster.name.clone(),
                    move_name: data.name.clone(),
                });
                report.auto_learned.push(move_id.clone());
                report.events.push(MoveLearnEvent {
                    monster_id: monster.id.clone(),
                    new_move: move_id.clone(),
                    level,
                    can_learn: true,
                    current_moves: None,
                });
            } else {
                log.push(BattleEvent::MoveLearnPending {
                    name: monster.name.clone(),
                    move_name: data.name.clone(),
                });
                report.events.push(MoveLearnEvent {
                    monster_id: monster.id.clone(),
                    new_move: move_id.clone(),
                    level,
                    can_learn: false,
                    current_moves: Some(monster.moves.iter().map(|slot| slot.move_id.clone()).collect()),
                });
            }
        }
    }
    Ok(report)
}

/// Teach `move_id`, either into a free slot or over `replace`.
pub fn learn_move(
    monster: &MonsterInstance,
    move_id: &str,
    replace: Option<&str>,
    tables: &ReferenceTables,
    max_moves: usize,
) -> BattleResult<MonsterInstance> {
    let species = tables.species(&monster.species_id)?;
    if !species.can_learn_by(move_id, monster.level) {
        return Err(ActionError::CannotLearnMove {
            name: monster.name.clone(),
            move_id: move_id.to_string(),
        }
        .into());
    }
    if monster.knows_move(move_id) {
        return Err(ActionError::AlreadyKnowsMove {
            name: monster.name.clone(),
            move_id: move_id.to_string(),
        }
        .into());
    }
    let slot = MoveSlot::new(tables.move_data(move_id)?);

    let mut updated = monster.clone();
    match replace {
        Some(old) => {
            let Some(index) = updated.moves.iter().position(|s| s.move_id == old) else {
                return Err(ActionError::MoveNotKnown {
                    monster: monster.name.clone(),
                    move_id: old.to_string(),
                }
                .into());
            };
            updated.moves[index] = slot;
        }
        None => {
            if updated.moves.len() >= max_moves {
                return Err(ActionError::NoFreeMoveSlot {
                    name: monster.name.clone(),
                }
                .into());
            }
            updated.moves.push(slot);
        }
    }
    tracing::debug!(monster = %monster.name, move_id, replaced = ?replace, "move learned");
    Ok(updated)
}
