//! Battle resolution: turn ordering, attacks, statuses, multi-turn moves,
//! items, captures and progression, driven by [`engine::BattleEngine`].

pub mod action;
pub mod catch;
pub mod damage;
pub mod effects;
pub mod engine;
pub mod events;
pub mod move_learning;
pub mod progression;
pub mod rng;
pub mod stat_stages;
pub mod state;
pub mod status;
pub mod turn_order;
pub mod two_turn;
pub mod weather;

#[cfg(test)]
pub(crate) mod tests;
