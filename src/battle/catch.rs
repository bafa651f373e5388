use crate::battle::rng::TurnRng;
use crate::monster::{MonsterInstance, StatusCondition};
use schema::{SpeciesData, StatusEffect};

/// min(255, catch_rate * status * device * (3 * max_hp - 2 * current_hp) / (3 * max_hp) / 3)
pub fn calculate_catch_rate(target: &MonsterInstance, species: &SpeciesData, device_multiplier: f64) -> f64 {
    let status_multiplier = status_multiplier(target.status.as_ref());
    let max_hp = target.max_hp.max(1) as f64;
    let current_hp = target.current_hp as f64;
    let hp_multiplier = (max_hp * 3.0 - current_hp * 2.0) / (max_hp * 3.0);

    let rate = species.catch_rate as f64 * status_multiplier * device_multiplier * hp_multiplier / 3.0;
    rate.clamp(0.0, 255.0)
}

fn status_multiplier(status: Option<&StatusCondition>) -> f64 {
    match status.map(|s| s.effect) {
        Some(StatusEffect::Sleep | StatusEffect::Frostbite) => 2.0,
        Some(
            StatusEffect::Paralyze
            | StatusEffect::Burn
            | StatusEffect::BadlyBurn
            | StatusEffect::Poison
            | StatusEffect::BadlyPoisoned,
        ) => 1.5,
        Some(StatusEffect::Confusion) | None => 1.0,
    }
}

/// One percent roll against the catch rate.
pub fn roll_catch_success(catch_rate: f64, rng: &mut TurnRng) -> bool {
    let roll = rng.next_outcome("Catch Roll") as f64;
    roll < catch_rate
}
