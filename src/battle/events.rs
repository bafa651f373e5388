use crate::battle::state::Side;
use schema::{StatKind, StatusEffect, Weather};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreventionReason {
    Asleep,
    Paralyzed,
    Frostbitten,
    MustRecharge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum BattleEvent {
    TurnStarted { turn: u32 },
    SentOut { side: Side, name: String, wild: bool },
    Recalled { name: String },

    MoveUsed { user: String, move_name: String },
    ChargingStarted { user: String, message: String },
    MoveMissed { user: String },
    AttackAvoided { target: String },
    MoveFailed,
    CriticalHit,
    Effectiveness { multiplier: f64 },
    DamageDealt { target: String, damage: u16, remaining_hp: u16 },
    Healed { target: String, amount: u16 },
    Fainted { name: String },

    ActionPrevented { actor: String, reason: PreventionReason },
    IsConfused { actor: String },
    HurtItself { actor: String, damage: u16 },

    StatusApplied { target: String, status: StatusEffect },
    StatusBlocked { target: String },
    StatusCured { target: String, status: StatusEffect },
    StatusDamage { target: String, status: StatusEffect, damage: u16 },

    StatStageChanged { target: String, stat: StatKind, delta: i8 },
    StatStageAtLimit { target: String, stat: StatKind, rising: bool },

    WeatherStarted { weather: Weather },
    WeatherEnded { weather: Weather },
    WeatherDamage { target: String, weather: Weather, damage: u16 },

    Trapped { target: String, move_name: String },
    BindDamage { target: String, move_name: String, damage: u16 },
    BindEnded { target: String, move_name: String },
    LockedIn { user: String },
    RecoilDamage { user: String, damage: u16 },
    Drained { target: String },

    AbilityActivated { monster: String, ability: String },
    ItemUsed { item: String, target: String },
    ItemHadNoEffect,
    PpRestored { target: String, move_name: String, amount: u8 },

    CaptureDeviceThrown { item: String },
    Caught { name: String },
    BrokeFree { name: String },
    Fled { side: Side, name: String },

    ExperienceGained { name: String, amount: u32 },
    LevelUp { name: String, level: u8 },
    MoveLearned { name: String, move_name: String },
    MoveLearnPending { name: String, move_name: String },

    BattleEnded { winner: Option<Side> },
}

impl BattleEvent {
    /// Human-readable text for the battle log.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        let text = match self {
            BattleEvent::TurnStarted { .. } => return None,
            BattleEvent::SentOut { side, name, wild } => match (side, wild) {
                (Side::Player, _) => format!("Go! {}!", name),
                (Side::Opponent, true) => format!("A wild {} appeared!", name),
                (Side::Opponent, false) => format!("The opponent sent out {}!", name),
            },
            BattleEvent::Recalled { name } => format!("{}, come back!", name),

            BattleEvent::MoveUsed { user, move_name } => format!("{} used {}!", user, move_name),
            BattleEvent::ChargingStarted { user, message } => format!("{} {}", user, message),
            BattleEvent::MoveMissed { user } => format!("{}'s attack missed!", user),
            BattleEvent::AttackAvoided { target } => format!("{} avoided the attack!", target),
            BattleEvent::MoveFailed => "But it failed!".to_string(),
            BattleEvent::CriticalHit => "A critical hit!".to_string(),
            BattleEvent::Effectiveness { multiplier } => match *multiplier {
                m if m == 0.0 => "It had no effect!".to_string(),
                m if m > 1.0 => "It's super effective!".to_string(),
                m if m < 1.0 => "It's not very effective...".to_string(),
                _ => return None,
            },
            BattleEvent::DamageDealt { target, damage, .. } => {
                format!("{} took {} damage!", target, damage)
            }
            BattleEvent::Healed { target, amount } => format!("{} recovered {} HP!", target, amount),
            BattleEvent::Fainted { name } => format!("{} fainted!", name),

            BattleEvent::ActionPrevented { actor, reason } => match reason {
                PreventionReason::Asleep => format!("{} is fast asleep.", actor),
                PreventionReason::Paralyzed => format!("{} is fully paralyzed!", actor),
                PreventionReason::Frostbitten => format!("{} is too frostbitten to move!", actor),
                PreventionReason::MustRecharge => format!("{} must recharge!", actor),
            },
            BattleEvent::IsConfused { actor } => format!("{} is confused!", actor),
            BattleEvent::HurtItself { .. } => "It hurt itself in its confusion!".to_string(),

            BattleEvent::StatusApplied { target, status } => {
                format!("{} {}", target, status.applied_phrase())
            }
            BattleEvent::StatusBlocked { target } => format!("It doesn't affect {}...", target),
            BattleEvent::StatusCured { target, status } => match status {
                StatusEffect::Sleep => format!("{} woke up!", target),
                StatusEffect::Confusion => format!("{} snapped out of its confusion!", target),
                other => format!("{} was cured of its {}!", target, other.noun()),
            },
            BattleEvent::StatusDamage { target, status, .. } => {
                format!("{} is hurt by its {}!", target, status.noun())
            }

            BattleEvent::StatStageChanged { target, stat, delta } => {
                let change = match *delta {
                    d if d >= 3 => "rose drastically!",
                    2 => "rose sharply!",
                    1 => "rose!",
                    -1 => "fell!",
                    -2 => "harshly fell!",
                    _ => "severely fell!",
                };
                format!("{}'s {} {}", target, stat.label(), change)
            }
            BattleEvent::StatStageAtLimit { target, stat, rising } => format!(
                "{}'s {} won't go any {}!",
                target,
                stat.label(),
                if *rising { "higher" } else { "lower" }
            ),

            BattleEvent::WeatherStarted { weather } => match weather {
                Weather::Sun => "The sunlight turned harsh!".to_string(),
                Weather::Rain => "It started to rain!".to_string(),
                Weather::Sandstorm => "A sandstorm kicked up!".to_string(),
                Weather::Snow => "It started to snow!".to_string(),
                Weather::Fog => "The fog is deep...".to_string(),
                Weather::Clear => "The weather cleared up.".to_string(),
            },
            BattleEvent::WeatherEnded { weather } => match weather {
                Weather::Sun => "The harsh sunlight faded.".to_string(),
                Weather::Rain => "The rain stopped.".to_string(),
                Weather::Sandstorm => "The sandstorm subsided.".to_string(),
                Weather::Snow => "The snow stopped.".to_string(),
                Weather::Fog => "The fog lifted.".to_string(),
                Weather::Clear => return None,
            },
            BattleEvent::WeatherDamage { target, weather, .. } => match weather {
                Weather::Snow => format!("{} is buffeted by the snow!", target),
                _ => format!("{} is buffeted by the sandstorm!", target),
            },

            BattleEvent::Trapped { target, move_name } => {
                format!("{} was trapped by {}!", target, move_name)
            }
            BattleEvent::BindDamage {
                target, move_name, ..
            } => format!("{} is hurt by {}!", target, move_name),
            BattleEvent::BindEnded { target, move_name } => {
                format!("{} was freed from {}!", target, move_name)
            }
            BattleEvent::LockedIn { .. } => return None,
            BattleEvent::RecoilDamage { user, .. } => format!("{} is damaged by recoil!", user),
            BattleEvent::Drained { target } => format!("{} had its energy drained!", target),

            BattleEvent::AbilityActivated { monster, ability } => {
                format!("[{}'s {}]", monster, ability)
            }
            BattleEvent::ItemUsed { item, target } => format!("Used {} on {}!", item, target),
            BattleEvent::ItemHadNoEffect => "It won't have any effect.".to_string(),
            BattleEvent::PpRestored {
                target, move_name, ..
            } => format!("{}'s {} PP was restored.", target, move_name),

            BattleEvent::CaptureDeviceThrown { item } => format!("You threw a {}!", item),
            BattleEvent::Caught { name } => format!("Gotcha! {} was caught!", name),
            BattleEvent::BrokeFree { name } => format!("Oh no! {} broke free!", name),
            BattleEvent::Fled { side, name } => match side {
                Side::Player => "Got away safely!".to_string(),
                Side::Opponent => format!("The wild {} fled!", name),
            },

            BattleEvent::ExperienceGained { name, amount } => {
                format!("{} gained {} Exp. Points!", name, amount)
            }
            BattleEvent::LevelUp { name, level } => format!("{} grew to level {}!", name, level),
            BattleEvent::MoveLearned { name, move_name } => {
                format!("{} learned {}!", name, move_name)
            }
            BattleEvent::MoveLearnPending { name, move_name } => {
                format!("{} wants to learn {}!", name, move_name)
            }

            BattleEvent::BattleEnded { winner } => match winner {
                Some(Side::Player) => "You won the battle!".to_string(),
                Some(Side::Opponent) => "You lost the battle...".to_string(),
                None => return None,
            },
        };
        Some(text)
    }
}

/// Collects the events of one engine call, in order.
#[derive(Debug, Clone, Default)]
pub struct BattleLog {
    events: Vec<BattleEvent>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        tracing::trace!(?event, "battle event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Formatted lines for every event that has text.
    pub fn messages(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }
}

impl std::fmt::Display for BattleLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.messages() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
