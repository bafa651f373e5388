use crate::battle::stat_stages::StatModifiers;
use crate::errors::LookupResult;
use crate::tables::ReferenceTables;
use schema::{
    AbilityId, BaseStats, MoveData, MoveId, SemiInvulnerableState, SpeciesData, SpeciesId,
    StatusEffect,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSlot {
    pub move_id: MoveId,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveSlot {
    /// Create a new move slot with full PP
    pub fn new(data: &MoveData) -> Self {
        Self {
            move_id: data.id.clone(),
            pp: data.pp,
            max_pp: data.pp,
        }
    }

    /// Use the move (decrease PP)
    pub fn use_pp(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }

    /// Restore PP, returning how much was actually restored
    pub fn restore_pp(&mut self, amount: u8) -> u8 {
        let before = self.pp;
        self.pp = self.pp.saturating_add(amount).min(self.max_pp);
        self.pp - before
    }
}

/// The single affliction a monster can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCondition {
    pub effect: StatusEffect,
    /// Turns left before the condition wears off by itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u8>,
    #[serde(default)]
    pub turns_active: u8,
}

impl StatusCondition {
    pub fn new(effect: StatusEffect) -> Self {
        Self {
            effect,
            duration: None,
            turns_active: 0,
        }
    }

    pub fn with_duration(effect: StatusEffect, turns: u8) -> Self {
        Self {
            duration: Some(turns),
            ..Self::new(effect)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwoTurnPhase {
    Charging,
    Executing,
    Recharging,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoTurnMoveState {
    pub move_id: MoveId,
    pub phase: TwoTurnPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semi_invulnerable_state: Option<SemiInvulnerableState>,
}

/// A move the monster keeps repeating without being asked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockingMoveState {
    pub move_id: MoveId,
    pub turns_remaining: u8,
}

/// A bind holding this monster in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrappedState {
    pub move_id: MoveId,
    pub turns_remaining: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterInstance {
    pub id: String,
    pub species_id: SpeciesId,
    pub name: String,
    pub level: u8,
    pub current_hp: u16,
    pub max_hp: u16,
    /// Computed stats for the current level; `stats.hp` equals `max_hp`.
    pub stats: BaseStats,
    pub moves: Vec<MoveSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_id: Option<AbilityId>,
    #[serde(default)]
    pub experience: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_turn_move: Option<TwoTurnMoveState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locking_move: Option<LockingMoveState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trapped_by: Option<TrappedState>,
    #[serde(default, skip_serializing_if = "StatModifiers::is_neutral")]
    pub stat_modifiers: StatModifiers,
}

/// Total experience needed to reach `level`.
pub fn experience_for_level(level: u8) -> u32 {
    (level as u32).pow(3)
}

/// HP = (2 * base * level) / 100 + level + 10, others = (2 * base * level) / 100 + 5
pub fn calculate_stats(base: &BaseStats, level: u8) -> BaseStats {
    let level = level as u32;
    let scale = |base_stat: u16| (2 * base_stat as u32 * level) / 100;
    let other = |base_stat: u16| (scale(base_stat) + 5).min(u16::MAX as u32) as u16;
    BaseStats {
        hp: (scale(base.hp) + level + 10).min(u16::MAX as u32) as u16,
        attack: other(base.attack),
        defense: other(base.defense),
        special_attack: other(base.special_attack),
        special_defense: other(base.special_defense),
        speed: other(base.speed),
    }
}

impl MonsterInstance {
    /// Create a new monster at full HP from species data.
    pub fn new(id: impl Into<String>, species: &SpeciesData, level: u8, moves: Vec<MoveSlot>) -> Self {
        let stats = calculate_stats(&species.base_stats, level);
        Self {
            id: id.into(),
            species_id: species.id.clone(),
            name: species.name.clone(),
            level,
            current_hp: stats.hp,
            max_hp: stats.hp,
            stats,
            moves,
            ability_id: None,
            experience: experience_for_level(level),
            status: None,
            two_turn_move: None,
            locking_move: None,
            trapped_by: None,
            stat_modifiers: StatModifiers::new(),
        }
    }

    /// Create a monster knowing the most recent moves of its learnset.
    pub fn from_learnset(
        id: impl Into<String>,
        species: &SpeciesData,
        level: u8,
        tables: &ReferenceTables,
        max_moves: usize,
    ) -> LookupResult<Self> {
        let mut learned: Vec<&MoveId> = Vec::new();
        for entry in species.learnset.iter().filter(|entry| entry.level <= level) {
            if !learned.contains(&&entry.move_id) {
                learned.push(&entry.move_id);
            }
        }
        let skip = learned.len().saturating_sub(max_moves);
        let moves = learned
            .into_iter()
            .skip(skip)
            .map(|move_id| tables.move_data(move_id).map(MoveSlot::new))
            .collect::<LookupResult<Vec<_>>>()?;
        Ok(Self::new(id, species, level, moves))
    }

    pub fn with_ability(mut self, ability_id: impl Into<AbilityId>) -> Self {
        self.ability_id = Some(ability_id.into());
        self
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Apply damage, returning the HP actually lost.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Restore HP, returning the HP actually gained.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let healed = amount.min(self.max_hp.saturating_sub(self.current_hp));
        self.current_hp += healed;
        healed
    }

    pub fn knows_move(&self, move_id: &str) -> bool {
        self.move_slot(move_id).is_some()
    }

    pub fn move_slot(&self, move_id: &str) -> Option<&MoveSlot> {
        self.moves.iter().find(|slot| slot.move_id == move_id)
    }

    pub fn move_slot_mut(&mut self, move_id: &str) -> Option<&mut MoveSlot> {
        self.moves.iter_mut().find(|slot| slot.move_id == move_id)
    }

    pub fn has_status(&self, effect: StatusEffect) -> bool {
        self.status.is_some_and(|status| status.effect == effect)
    }

    /// The hiding state, while this monster is charging a semi-invulnerable move.
    pub fn semi_invulnerable(&self) -> Option<SemiInvulnerableState> {
        self.two_turn_move
            .as_ref()
            .filter(|state| state.phase == TwoTurnPhase::Charging)
            .and_then(|state| state.semi_invulnerable_state)
    }

    /// Drop everything that only lasts while the monster is on the field.
    pub fn clear_volatile_state(&mut self) {
        self.stat_modifiers = StatModifiers::new();
        self.two_turn_move = None;
        self.locking_move = None;
        self.trapped_by = None;
        if self.has_status(StatusEffect::Confusion) {
            self.status = None;
        }
    }

    /// Recompute stats for a new level; current HP rises by the max-HP gain.
    pub fn set_level(&mut self, level: u8, species: &SpeciesData) {
        let stats = calculate_stats(&species.base_stats, level);
        let hp_gain = stats.hp.saturating_sub(self.max_hp);
        self.level = level;
        self.max_hp = stats.hp;
        self.stats = stats;
        if !self.is_fainted() {
            self.current_hp = (self.current_hp + hp_gain).min(self.max_hp);
        }
    }
}
