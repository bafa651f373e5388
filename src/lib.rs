//! Monster Battle Engine
//!
//! Deterministic, turn-by-turn resolution of one-on-one monster battles.
//! The engine is stateless: callers hand in a [`BattleContext`] and the
//! actions for the turn, and get back the updated context together with the
//! log of what happened. All randomness flows through a [`TurnRng`], so a
//! seeded or scripted source replays a battle exactly.

pub mod battle;
pub mod config;
pub mod errors;
pub mod monster;
pub mod tables;

// Reference data definitions.
pub use schema::{
    AbilityData, AbilityEffect, BaseStats, EffectKind, ItemData, ItemEffect, MonsterType,
    MoveCategory, MoveData, SpeciesData, StatKind, StatusEffect, Weather,
};

// Engine entry points and the state they exchange.
pub use battle::action::BattleAction;
pub use battle::engine::BattleEngine;
pub use battle::events::{BattleEvent, BattleLog};
pub use battle::move_learning::MoveLearnEvent;
pub use battle::rng::TurnRng;
pub use battle::state::{
    BattleContext, BattleKind, BattlePhase, BattleSetup, BattleSummary, InitResult, Side,
    SwitchOutcome, TurnOutcome, TurnResult,
};
pub use battle::weather::WeatherCondition;

pub use config::{BattleConfig, ConfigError};
pub use errors::{
    ActionError, BattleEngineError, BattleResult, ConfigurationError, ResourceError,
    StateConflictError,
};
pub use monster::{MonsterInstance, MoveSlot, StatusCondition};
pub use tables::ReferenceTables;
