use crate::battle::move_learning::MoveLearnEvent;
use crate::battle::weather::WeatherCondition;
use crate::monster::MonsterInstance;
use schema::{ItemId, MoveId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleKind {
    Wild,
    Trainer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    Initializing,
    AwaitingActions,
    ResolvingTurn,
    /// The player's active monster fainted and a teammate must be sent in.
    AwaitingReplacement,
    BattleEnded,
}

/// Everything the engine needs to resolve the next turn of one battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleContext {
    pub phase: BattlePhase,
    pub kind: BattleKind,
    pub turn: u32,
    #[serde(default)]
    pub weather: WeatherCondition,
    pub player_monster: MonsterInstance,
    pub opponent_monster: MonsterInstance,
    /// The player's other party members.
    #[serde(default)]
    pub player_bench: Vec<MonsterInstance>,
    /// Bag contents available during this battle, by item id.
    #[serde(default)]
    pub inventory: BTreeMap<ItemId, u32>,
}

impl BattleContext {
    pub fn monster(&self, side: Side) -> &MonsterInstance {
        match side {
            Side::Player => &self.player_monster,
            Side::Opponent => &self.opponent_monster,
        }
    }

    pub fn monster_mut(&mut self, side: Side) -> &mut MonsterInstance {
        match side {
            Side::Player => &mut self.player_monster,
            Side::Opponent => &mut self.opponent_monster,
        }
    }

    /// The acting monster, its opponent and the weather, all borrowed at once.
    pub fn split_mut(
        &mut self,
        side: Side,
    ) -> (&mut MonsterInstance, &mut MonsterInstance, &mut WeatherCondition) {
        let BattleContext {
            player_monster,
            opponent_monster,
            weather,
            ..
        } = self;
        match side {
            Side::Player => (player_monster, opponent_monster, weather),
            Side::Opponent => (opponent_monster, player_monster, weather),
        }
    }

    pub fn bench_index(&self, monster_id: &str) -> Option<usize> {
        self.player_bench.iter().position(|m| m.id == monster_id)
    }

    pub fn has_healthy_bench(&self) -> bool {
        self.player_bench.iter().any(|m| !m.is_fainted())
    }

    pub fn item_count(&self, item_id: &str) -> u32 {
        self.inventory.get(item_id).copied().unwrap_or(0)
    }

    /// Remove one item from the bag. Callers validate the count first.
    pub fn consume_item(&mut self, item_id: &str) {
        if let Some(count) = self.inventory.get_mut(item_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.inventory.remove(item_id);
            }
        }
    }

    pub fn is_wild(&self) -> bool {
        self.kind == BattleKind::Wild
    }
}

/// Input to `BattleEngine::initialize_battle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSetup {
    pub player_monster: MonsterInstance,
    pub opponent_monster: MonsterInstance,
    #[serde(default)]
    pub player_bench: Vec<MonsterInstance>,
    pub kind: BattleKind,
    #[serde(default)]
    pub inventory: BTreeMap<ItemId, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResult {
    pub effects: Vec<String>,
    pub player_goes_first: bool,
    pub updated_player_monster: MonsterInstance,
    pub updated_opponent_monster: MonsterInstance,
    pub battle_context: BattleContext,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// What happened during one turn, from the player's point of view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResult {
    /// The player's action took effect: not prevented, not missed, and a
    /// thrown capture device caught its target.
    pub success: bool,
    /// Damage dealt by the player's attack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_critical: Option<bool>,
    /// Damage dealt by the opponent's attack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_damage: Option<u16>,
    pub effects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monster_caught: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monster_switched: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_gained: Option<u32>,
    pub battle_ended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub move_learn_events: Vec<MoveLearnEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auto_learned_moves: Vec<MoveId>,
    /// Items taken from the bag this turn, for the caller to persist.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items_used: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub result: TurnResult,
    pub updated_player_monster: MonsterInstance,
    pub updated_opponent_monster: MonsterInstance,
    /// Every monster the player has left is down.
    #[serde(default, skip_serializing_if = "is_false")]
    pub team_wipe: bool,
    /// The player's active monster fainted with healthy teammates left.
    #[serde(default, skip_serializing_if = "is_false")]
    pub requires_auto_switch: bool,
    pub player_goes_first: bool,
    pub battle_context: BattleContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchOutcome {
    pub effects: Vec<String>,
    pub updated_player_monster: MonsterInstance,
    pub battle_context: BattleContext,
}

/// Monsters as they leave the battle, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSummary {
    pub player_monster: MonsterInstance,
    pub player_bench: Vec<MonsterInstance>,
    pub opponent_monster: MonsterInstance,
    pub inventory: BTreeMap<ItemId, u32>,
    pub battle_context: BattleContext,
}
