use crate::battle::stat_stages::apply_stage;
use crate::battle::state::Side;
use crate::battle::status::stat_penalty;
use crate::config::StatusConfig;
use crate::monster::MonsterInstance;
use schema::StatKind;
use std::cmp::Ordering;

/// Action classes, lowest first. Items and capture devices always go first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriorityClass {
    Standard,
    Item,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPriority {
    pub class: PriorityClass,
    pub move_priority: i8,
    pub speed: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOrder {
    pub first: Side,
    pub second: Side,
    pub reason: String,
}

impl TurnOrder {
    fn new(first: Side, reason: String) -> Self {
        Self {
            first,
            second: first.opponent(),
            reason,
        }
    }

    pub fn sides(&self) -> [Side; 2] {
        [self.first, self.second]
    }

    pub fn player_goes_first(&self) -> bool {
        self.first == Side::Player
    }
}

/// Speed after stat stages and any status penalty.
pub fn effective_speed(monster: &MonsterInstance, config: &StatusConfig) -> u16 {
    let staged = apply_stage(monster.stats.speed, monster.stat_modifiers.get(StatKind::Speed));
    let penalty = stat_penalty(monster.status.as_ref(), StatKind::Speed, config);
    (staged as f64 * penalty).floor() as u16
}

/// Decide who acts first. Ties at every level go to the player.
pub fn resolve_order(
    player: ActionPriority,
    opponent: ActionPriority,
    player_name: &str,
    opponent_name: &str,
) -> TurnOrder {
    let name = |side: Side| match side {
        Side::Player => player_name,
        Side::Opponent => opponent_name,
    };
    let winner = |ordering: Ordering| {
        if ordering == Ordering::Less {
            Side::Opponent
        } else {
            Side::Player
        }
    };

    let order = match player.class.cmp(&opponent.class) {
        Ordering::Equal => match player.move_priority.cmp(&opponent.move_priority) {
            Ordering::Equal => match player.speed.cmp(&opponent.speed) {
                Ordering::Equal => {
                    TurnOrder::new(Side::Player, "Speed tie: player acts first".to_string())
                }
                ordering => {
                    let first = winner(ordering);
                    TurnOrder::new(first, format!("{} is faster", name(first)))
                }
            },
            ordering => {
                let first = winner(ordering);
                TurnOrder::new(first, format!("{}'s move has priority", name(first)))
            }
        },
        ordering => TurnOrder::new(winner(ordering), "Items are used with priority".to_string()),
    };
    tracing::debug!(first = ?order.first, reason = %order.reason, "turn order");
    order
}
